//! Currency definitions for The Spotter
//!
//! - `Currency`: a compact 3-letter ISO 4217 code, used as graph node and
//!   matrix key
//! - A static registry of known currencies with liquidity tiers and the
//!   typical spreads the single-leg reality check compares against

use lazy_static::lazy_static;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A 3-letter ISO 4217 currency code, stored inline so it is `Copy` and
/// cheap to pass around as a map key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Currency([u8; 3]);

impl Currency {
    /// The code as a string slice, e.g. `"USD"`.
    pub fn code(&self) -> &str {
        // Always valid: construction only accepts ASCII letters
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for Currency {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 3 || !s.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(eyre::eyre!(
                "invalid currency code {:?} (expected 3 letters)",
                s
            ));
        }
        let mut code = [0u8; 3];
        for (i, b) in s.bytes().enumerate() {
            code[i] = b.to_ascii_uppercase();
        }
        Ok(Self(code))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Liquidity tiers for spread estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LiquidityTier {
    /// G10 pairs quoted everywhere (EUR, USD, JPY, ...)
    Major,

    /// Liquid but wider (SEK, NOK, PLN, ...)
    Minor,

    /// Emerging-market and thinly quoted currencies
    Exotic,
}

impl LiquidityTier {
    /// Typical retail spread for a pair in this tier, in percent.
    pub fn typical_retail_spread_pct(&self) -> f64 {
        match self {
            LiquidityTier::Major => 0.010,
            LiquidityTier::Minor => 0.030,
            LiquidityTier::Exotic => 0.080,
        }
    }

    /// Typical institutional spread for a pair in this tier, in percent.
    pub fn typical_institutional_spread_pct(&self) -> f64 {
        match self {
            LiquidityTier::Major => 0.003,
            LiquidityTier::Minor => 0.015,
            LiquidityTier::Exotic => 0.050,
        }
    }
}

/// Metadata for a currency we know about
#[derive(Debug, Clone, Copy)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub tier: LiquidityTier,
}

// ============================================
// KNOWN CURRENCY REGISTRY
// ============================================

const KNOWN_CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo { code: "USD", name: "US Dollar", tier: LiquidityTier::Major },
    CurrencyInfo { code: "EUR", name: "Euro", tier: LiquidityTier::Major },
    CurrencyInfo { code: "GBP", name: "British Pound", tier: LiquidityTier::Major },
    CurrencyInfo { code: "JPY", name: "Japanese Yen", tier: LiquidityTier::Major },
    CurrencyInfo { code: "CHF", name: "Swiss Franc", tier: LiquidityTier::Major },
    CurrencyInfo { code: "CAD", name: "Canadian Dollar", tier: LiquidityTier::Major },
    CurrencyInfo { code: "AUD", name: "Australian Dollar", tier: LiquidityTier::Major },
    CurrencyInfo { code: "NZD", name: "New Zealand Dollar", tier: LiquidityTier::Minor },
    CurrencyInfo { code: "SEK", name: "Swedish Krona", tier: LiquidityTier::Minor },
    CurrencyInfo { code: "NOK", name: "Norwegian Krone", tier: LiquidityTier::Minor },
    CurrencyInfo { code: "DKK", name: "Danish Krone", tier: LiquidityTier::Minor },
    CurrencyInfo { code: "PLN", name: "Polish Zloty", tier: LiquidityTier::Minor },
    CurrencyInfo { code: "SGD", name: "Singapore Dollar", tier: LiquidityTier::Minor },
    CurrencyInfo { code: "MXN", name: "Mexican Peso", tier: LiquidityTier::Exotic },
    CurrencyInfo { code: "ZAR", name: "South African Rand", tier: LiquidityTier::Exotic },
    CurrencyInfo { code: "TRY", name: "Turkish Lira", tier: LiquidityTier::Exotic },
];

lazy_static! {
    static ref REGISTRY: HashMap<&'static str, &'static CurrencyInfo> = {
        let mut map = HashMap::new();
        for info in KNOWN_CURRENCIES {
            map.insert(info.code, info);
        }
        map
    };
}

/// Look up metadata for a currency. Unknown codes return `None`.
pub fn info(currency: Currency) -> Option<&'static CurrencyInfo> {
    REGISTRY.get(currency.code()).copied()
}

/// Liquidity tier for a currency; anything we don't know is treated as exotic.
pub fn tier(currency: Currency) -> LiquidityTier {
    info(currency).map(|i| i.tier).unwrap_or(LiquidityTier::Exotic)
}

/// Tier for a pair is the worse leg's tier.
pub fn pair_tier(a: Currency, b: Currency) -> LiquidityTier {
    tier(a).max(tier(b))
}

/// The default analysis universe.
pub fn default_universe() -> Vec<Currency> {
    ["USD", "EUR", "GBP", "MXN", "JPY", "CHF", "CAD", "AUD"]
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect()
}

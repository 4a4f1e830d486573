//! Routes a rate's code to the page that lists its kind of instrument.

const CURRENCY_CODES: &[&str] = &[
    "UsdDollar",
    "Euro",
    "Pound",
    "Dirham",
    "Lira",
    "Yuan",
    "CanadianDollar",
    "AustralianDollar",
];

const COIN_CODES: &[&str] = &["SekeEmaami", "SekeBahar", "NimSeke", "RobSeke", "SekeGerami"];

const GOLD_CODES: &[&str] = &["GoldGram18", "GoldGram24", "GoldMesghal", "GoldOunce"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyBucket {
    Currency,
    Coin,
    Gold,
    Unknown,
}

impl CurrencyBucket {
    pub fn route(&self) -> &'static str {
        match self {
            CurrencyBucket::Currency => "/rates/currency",
            CurrencyBucket::Coin => "/rates/coin",
            CurrencyBucket::Gold => "/rates/gold",
            CurrencyBucket::Unknown => "/rates",
        }
    }
}

/// A missing code and an unlisted code both land in [`CurrencyBucket::Unknown`].
pub fn classify(code: Option<&str>) -> CurrencyBucket {
    match code {
        Some(c) if CURRENCY_CODES.contains(&c) => CurrencyBucket::Currency,
        Some(c) if COIN_CODES.contains(&c) => CurrencyBucket::Coin,
        Some(c) if GOLD_CODES.contains(&c) => CurrencyBucket::Gold,
        _ => CurrencyBucket::Unknown,
    }
}

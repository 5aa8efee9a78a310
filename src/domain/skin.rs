use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Supported market currencies.
/// Prices are never converted here; every item in one pool shares one currency.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Debug,
    Serialize,
    Deserialize,
    strum_macros::EnumIter,
    strum_macros::EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(ascii_case_insensitive)]
pub enum Currency {
    #[default]
    #[strum(serialize = "USD")]
    Usd,
    #[strum(serialize = "EUR")]
    Eur,
    #[strum(serialize = "GBP")]
    Gbp,
    #[strum(serialize = "CNY")]
    Cny,
    #[strum(serialize = "RUB")]
    Rub,
    #[strum(serialize = "UAH")]
    Uah,
}

/// A priced, wear-tagged candidate item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InputSkin {
    /// Market name, for display only
    #[serde(default)]
    pub name: String,
    pub wear: f64,
    pub price: f64,
    #[serde(default)]
    pub currency: Currency,
}

impl InputSkin {
    pub fn new(name: impl Into<String>, wear: f64, price: f64, currency: Currency) -> Self {
        Self {
            name: name.into(),
            wear,
            price,
            currency,
        }
    }

    /// Orders by wear ascending. Use with a stable sort so equal-wear items keep input order.
    pub fn cmp_by_wear(&self, other: &InputSkin) -> Ordering {
        self.wear.total_cmp(&other.wear)
    }
}

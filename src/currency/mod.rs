//! Diaspora pricing: conversion through a GHS-based rate table and display
//! formatting for the primary and alternate currencies.

pub mod rates;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub use rates::{load_rates, HttpRateSource, RateSource, StaticRateSource};

/// Currencies the marketplace can display prices in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Ghs,
    Usd,
    Gbp,
    Eur,
    Cad,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Ghs,
        Currency::Usd,
        Currency::Gbp,
        Currency::Eur,
        Currency::Cad,
    ];

    /// Rate-table base; every rate is expressed per one unit of it
    pub const BASE: Currency = Currency::Ghs;

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Ghs => "GHS",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Eur => "EUR",
            Currency::Cad => "CAD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Ghs => "₵",
            Currency::Usd => "$",
            Currency::Gbp => "£",
            Currency::Eur => "€",
            Currency::Cad => "CA$",
        }
    }

    /// Built-in rate used when no fetched rate is usable
    pub fn default_rate(&self) -> f64 {
        match self {
            Currency::Ghs => 1.0,
            Currency::Usd => 0.083,
            Currency::Gbp => 0.066,
            Currency::Eur => 0.077,
            Currency::Cad => 0.114,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|currency| currency.code() == code)
            .ok_or_else(|| format!("unsupported currency '{}'", s))
    }
}

/// Units of each currency per one GHS
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<Currency, f64>,
}

impl RateTable {
    /// Empty table; every lookup falls back to the built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defaults() -> Self {
        Self {
            rates: Currency::ALL
                .into_iter()
                .map(|currency| (currency, currency.default_rate()))
                .collect(),
        }
    }

    pub fn with_rate(mut self, currency: Currency, rate: f64) -> Self {
        self.insert(currency, rate);
        self
    }

    pub fn insert(&mut self, currency: Currency, rate: f64) {
        self.rates.insert(currency, rate);
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Rate for `currency`, falling back to the default when the table has
    /// no usable entry
    pub fn rate(&self, currency: Currency) -> f64 {
        if currency == Currency::BASE {
            return 1.0;
        }
        match self.rates.get(&currency) {
            Some(rate) if rate.is_finite() && *rate > 0.0 => *rate,
            Some(rate) => {
                debug!("Ignoring unusable {} rate {}, using default", currency, rate);
                currency.default_rate()
            }
            None => currency.default_rate(),
        }
    }

    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        if from == to {
            return amount;
        }
        amount / self.rate(from) * self.rate(to)
    }
}

/// Primary price string plus converted equivalents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedPrice {
    pub primary: String,
    pub alternates: Vec<String>,
}

/// Format `amount` in `currency`: symbol, whole units, comma grouping.
pub fn format_amount(amount: f64, currency: Currency) -> String {
    let whole = if amount.is_finite() && amount > 0.0 {
        amount.round() as u64
    } else {
        0
    };
    format!("{}{}", currency.symbol(), group_thousands(whole))
}

/// Format a listing price for display in `target`, with `alternates` as
/// converted equivalents. The listing's own currency is listed first among
/// the alternates whenever it differs from the target.
pub fn format_price(
    amount: f64,
    from: Currency,
    target: Currency,
    rates: &RateTable,
    alternates: &[Currency],
) -> FormattedPrice {
    let primary = format_amount(rates.convert(amount, from, target), target);

    let mut others: Vec<Currency> = Vec::with_capacity(alternates.len() + 1);
    if from != target && !alternates.contains(&from) {
        others.push(from);
    }
    for currency in alternates {
        if *currency != target && !others.contains(currency) {
            others.push(*currency);
        }
    }

    FormattedPrice {
        primary,
        alternates: others
            .into_iter()
            .map(|currency| format_amount(rates.convert(amount, from, currency), currency))
            .collect(),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

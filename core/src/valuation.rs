//! Listing valuation — reward display strings and USD-equivalent math.
//!
//! A listing's USD value is derived exactly once, from the token price at a
//! fixed reference instant: publish time for `fixed`/`range` compensation,
//! winner-selection time for `variable`.  The result is cached on the
//! listing and never recomputed, so historic listings keep the valuation
//! they were published with.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValuationError {
    #[error("unknown compensation type: {0}")]
    UnknownCompensationType(String),

    #[error("missing {0} for the given compensation type")]
    MissingAmount(&'static str),

    #[error("invalid reward range: min {min} exceeds max {max}")]
    InvalidRange { min: f64, max: f64 },
}

/// Compensation structure of a listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Compensation {
    /// A single fixed reward amount.
    Fixed { amount: f64 },
    /// A min/max ask range; valued at its midpoint when published.
    Range { min: f64, max: f64 },
    /// Decided per-winner; valued only once a winner is selected.
    Variable,
}

impl Compensation {
    /// Build a [`Compensation`] from the flat column values a listing row
    /// carries.  Enforces `min ≤ max` for ranges.
    pub fn from_parts(
        compensation_type: &str,
        reward_amount: Option<f64>,
        min_reward_ask: Option<f64>,
        max_reward_ask: Option<f64>,
    ) -> Result<Self, ValuationError> {
        match compensation_type {
            "fixed" => {
                let amount =
                    reward_amount.ok_or(ValuationError::MissingAmount("rewardAmount"))?;
                Ok(Self::Fixed { amount })
            }
            "range" => {
                let min =
                    min_reward_ask.ok_or(ValuationError::MissingAmount("minRewardAsk"))?;
                let max =
                    max_reward_ask.ok_or(ValuationError::MissingAmount("maxRewardAsk"))?;
                if min > max {
                    return Err(ValuationError::InvalidRange { min, max });
                }
                Ok(Self::Range { min, max })
            }
            "variable" => Ok(Self::Variable),
            other => Err(ValuationError::UnknownCompensationType(other.to_string())),
        }
    }

    /// Identifier string stored in the `compensation_type` column.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fixed { .. } => "fixed",
            Self::Range { .. } => "range",
            Self::Variable => "variable",
        }
    }

    /// The amount to value at publish time.
    ///
    /// `Variable` listings have no publish-time amount; their valuation is
    /// deferred until a winner is marked.
    pub fn publish_amount(&self) -> Option<f64> {
        match *self {
            Self::Fixed { amount } => Some(amount),
            Self::Range { min, max } => Some((min + max) / 2.0),
            Self::Variable => None,
        }
    }
}

/// USD-equivalent of `amount` units of a token priced at `token_price`.
pub fn usd_value(amount: f64, token_price: f64) -> f64 {
    token_price * amount
}

/// Format a number with a human magnitude suffix: `1500` → `"1.5K"`,
/// `1000` → `"1K"`, `2_500_000` → `"2.5M"`, `999` → `"999"`.
pub fn format_number_with_suffix(n: f64) -> String {
    if n >= 1_000_000.0 {
        with_suffix(n / 1_000_000.0, "M")
    } else if n >= 1_000.0 {
        with_suffix(n / 1_000.0, "K")
    } else {
        with_suffix(n, "")
    }
}

fn with_suffix(scaled: f64, suffix: &str) -> String {
    let mut s = format!("{scaled:.1}");
    if let Some(stripped) = s.strip_suffix(".0") {
        s = stripped.to_string();
    }
    format!("{s}{suffix}")
}

/// Human-readable reward range for a grant card.
///
/// With a positive `min_reward` the result is `"<min>-<max>"`, otherwise
/// `"Upto <max>"`.  `max_reward` is always required; the signature makes
/// the caller supply it.
pub fn reward_range_display(min_reward: Option<f64>, max_reward: f64) -> String {
    match min_reward {
        Some(min) if min > 0.0 => format!(
            "{}-{}",
            format_number_with_suffix(min),
            format_number_with_suffix(max_reward)
        ),
        _ => format!("Upto {}", format_number_with_suffix(max_reward)),
    }
}

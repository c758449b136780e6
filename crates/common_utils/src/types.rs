//! Types that can be used in other crates

use std::fmt::Display;

use common_enums::Currency;
use serde::{Deserialize, Serialize};

use crate::consts;

/// This Unit struct represents MinorUnit in which core amount works
///
/// Pence for GBP, cents for USD, yen for JPY. Every amount crossing an
/// interface boundary uses this type; there is no floating point currency value
/// anywhere in the workspace.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MinorUnit(i64);

impl MinorUnit {
    /// gets amount as i64 value
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }

    /// forms a new minor unit from amount
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Zero amount
    pub fn zero() -> Self {
        Self(0)
    }

    /// forms a minor unit, mapping negative values to zero
    pub fn new_non_negative(value: i64) -> Self {
        Self(value.max(0))
    }

    /// checks if the amount is zero
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// checks if the amount is strictly positive
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Addition clamped at `i64::MAX`
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtraction clamped at `i64::MIN`
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Render in major units with the currency's exponent, e.g. `46.20`.
    ///
    /// Pure integer formatting, so the result never shows float artefacts.
    pub fn to_major_unit_string(self, currency: Currency) -> String {
        let exponent = currency.minor_unit_exponent();
        let sign = if self.0 < 0 { "-" } else { "" };
        let absolute = self.0.unsigned_abs();
        if exponent == 0 {
            return format!("{sign}{absolute}");
        }
        let divisor = 10_u64.pow(exponent);
        let width = usize::try_from(exponent).unwrap_or(2);
        format!(
            "{sign}{}.{:0width$}",
            absolute / divisor,
            absolute % divisor,
            width = width
        )
    }
}

impl Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Percentage held in basis points (hundredths of a percent).
///
/// `12.5%` is `1250`. Keeping the value integral lets percentage tips be
/// computed without floating point drift.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(i64);

impl Percentage {
    /// Whole percent, negative values clamp to zero
    pub fn from_whole(percent: i64) -> Self {
        Self::from_basis_points(percent.saturating_mul(consts::BASIS_POINTS_PER_PERCENT))
    }

    /// Basis points, negative values clamp to zero
    pub fn from_basis_points(basis_points: i64) -> Self {
        Self(basis_points.max(0))
    }

    /// Value in basis points
    pub fn basis_points(self) -> i64 {
        self.0
    }

    /// Apply the percentage to `amount`, rounding half away from zero.
    ///
    /// The intermediate product is widened to `i128`, results beyond `i64`
    /// saturate.
    pub fn apply_and_round(self, amount: MinorUnit) -> MinorUnit {
        let whole = i128::from(consts::BASIS_POINTS_PER_WHOLE);
        let product = i128::from(amount.get_amount_as_i64()) * i128::from(self.0);
        let half = whole / 2;
        let rounded = if product >= 0 {
            (product + half) / whole
        } else {
            (product - half) / whole
        };
        MinorUnit::new(i64::try_from(rounded).unwrap_or(if rounded > 0 {
            i64::MAX
        } else {
            i64::MIN
        }))
    }
}

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let per_percent = consts::BASIS_POINTS_PER_PERCENT;
        let fraction = self.0 % per_percent;
        if fraction == 0 {
            write!(f, "{}%", self.0 / per_percent)
        } else {
            let rendered = format!("{:02}", fraction);
            write!(
                f,
                "{}.{}%",
                self.0 / per_percent,
                rendered.trim_end_matches('0')
            )
        }
    }
}

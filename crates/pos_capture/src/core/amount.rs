use common_enums::Currency;
use common_utils::{consts::BASIS_POINTS_PER_PERCENT, types::{MinorUnit, Percentage}};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TipSelection {
    #[default]
    None,
    Percentage(Percentage),
    FixedAmount(MinorUnit),
}

/// Base, tip and total of the charge being prepared.
///
/// Every setter keeps the invariant `total == base + tip` with both parts
/// non-negative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountCalculator {
    base: MinorUnit,
    tip_selection: TipSelection,
    tip: MinorUnit,
}

impl AmountCalculator {
    pub fn new(base: MinorUnit) -> Self {
        let mut calculator = Self::default();
        calculator.set_base(base);
        calculator
    }

    pub fn base(&self) -> MinorUnit {
        self.base
    }

    pub fn tip(&self) -> MinorUnit {
        self.tip
    }

    pub fn tip_selection(&self) -> TipSelection {
        self.tip_selection
    }

    pub fn total(&self) -> MinorUnit {
        self.base.saturating_add(self.tip)
    }

    /// Percentage tips follow the new base; fixed tips stay as entered.
    pub fn set_base(&mut self, amount: MinorUnit) {
        self.base = MinorUnit::new_non_negative(amount.get_amount_as_i64());
        self.recompute_tip();
    }

    pub fn set_tip_percentage(&mut self, percentage: Percentage) {
        self.tip_selection = TipSelection::Percentage(percentage);
        self.recompute_tip();
    }

    pub fn set_tip_fixed(&mut self, amount: MinorUnit) {
        self.tip_selection =
            TipSelection::FixedAmount(MinorUnit::new_non_negative(amount.get_amount_as_i64()));
        self.recompute_tip();
    }

    pub fn clear_tip(&mut self) {
        self.tip_selection = TipSelection::None;
        self.recompute_tip();
    }

    fn recompute_tip(&mut self) {
        self.tip = match self.tip_selection {
            TipSelection::None => MinorUnit::zero(),
            TipSelection::Percentage(percentage) => percentage.apply_and_round(self.base),
            TipSelection::FixedAmount(amount) => amount,
        };
    }
}

/// Parse staff-entered money text into minor units of `currency`.
///
/// Accepts a leading currency symbol, thousands separators and up to the
/// currency's number of decimals; one extra decimal rounds half up. Anything
/// else, including negative amounts, yields zero.
pub fn parse_minor_units(text: &str, currency: Currency) -> MinorUnit {
    let exponent = currency.minor_unit_exponent();
    let digits = strip_decoration(text, currency.symbol());
    let Some(digits) = digits else {
        return MinorUnit::zero();
    };

    parse_scaled(&digits, exponent)
        .map(MinorUnit::new_non_negative)
        .unwrap_or_default()
}

/// Parse a percentage such as `15`, `12.5` or `12.5%`. Malformed or negative
/// input yields zero.
pub fn parse_percentage(text: &str) -> Percentage {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    // Two decimals of a percent are basis points.
    let exponent = BASIS_POINTS_PER_PERCENT.ilog10();

    if trimmed.contains(',') {
        return Percentage::default();
    }
    parse_scaled(trimmed, exponent)
        .map(Percentage::from_basis_points)
        .unwrap_or_default()
}

fn strip_decoration(text: &str, symbol: &str) -> Option<String> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix(symbol).unwrap_or(trimmed).trim_start();

    let (integer, fraction) = match trimmed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (trimmed, None),
    };
    if !valid_grouping(integer) {
        return None;
    }

    let mut digits: String = integer.chars().filter(|c| *c != ',').collect();
    if let Some(fraction) = fraction {
        digits.push('.');
        digits.push_str(fraction);
    }
    Some(digits)
}

/// Thousands separators are only accepted between groups of three digits.
fn valid_grouping(integer: &str) -> bool {
    if !integer.contains(',') {
        return true;
    }
    let mut groups = integer.split(',');
    let first_ok = groups
        .next()
        .is_some_and(|group| (1..=3).contains(&group.len()));
    first_ok && groups.all(|group| group.len() == 3)
}

/// `"42.5"` with exponent 2 is `4250`. Returns `None` for malformed input
/// or overflow.
fn parse_scaled(text: &str, exponent: u32) -> Option<i64> {
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (text, ""),
    };

    let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !is_digits(integer) || !is_digits(fraction)
    {
        return None;
    }

    let scale = 10_i64.checked_pow(exponent)?;
    let whole = if integer.is_empty() {
        0
    } else {
        integer.parse::<i64>().ok()?
    };

    let width = usize::try_from(exponent).ok()?;
    let mut fraction_digits = fraction.chars();
    let mut minor = 0_i64;
    for _ in 0..width {
        let digit = fraction_digits.next().map_or(0, digit_value);
        minor = minor * 10 + digit;
    }
    let round_up = fraction_digits.next().is_some_and(|c| digit_value(c) >= 5);

    whole
        .checked_mul(scale)?
        .checked_add(minor)?
        .checked_add(i64::from(round_up))
}

fn digit_value(c: char) -> i64 {
    c.to_digit(10).map(i64::from).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_tip_follows_base_and_selection() {
        let mut calculator = AmountCalculator::new(MinorUnit::new(4200));
        calculator.set_tip_percentage(Percentage::from_whole(10));
        assert_eq!(calculator.tip(), MinorUnit::new(420));
        assert_eq!(calculator.total(), MinorUnit::new(4620));

        calculator.set_tip_percentage(Percentage::from_whole(15));
        assert_eq!(calculator.base(), MinorUnit::new(4200));
        assert_eq!(calculator.tip(), MinorUnit::new(630));
        assert_eq!(calculator.total(), MinorUnit::new(4830));

        calculator.set_base(MinorUnit::new(5000));
        assert_eq!(calculator.tip(), MinorUnit::new(750));
    }

    #[test]
    fn percentage_tip_rounds_half_away_from_zero() {
        let mut calculator = AmountCalculator::new(MinorUnit::new(1005));
        calculator.set_tip_percentage(Percentage::from_whole(10));
        // 100.5 rounds to 101
        assert_eq!(calculator.tip(), MinorUnit::new(101));
        assert_eq!(calculator.total(), MinorUnit::new(1106));
    }

    #[test]
    fn fixed_tip_is_kept_when_base_changes() {
        let mut calculator = AmountCalculator::new(MinorUnit::new(4200));
        calculator.set_tip_fixed(MinorUnit::new(500));
        calculator.set_base(MinorUnit::new(3000));
        assert_eq!(calculator.tip(), MinorUnit::new(500));
        assert_eq!(calculator.total(), MinorUnit::new(3500));

        calculator.clear_tip();
        assert_eq!(calculator.tip_selection(), TipSelection::None);
        assert_eq!(calculator.total(), MinorUnit::new(3000));
    }

    #[test]
    fn negative_inputs_clamp_to_zero() {
        let mut calculator = AmountCalculator::new(MinorUnit::new(-100));
        assert_eq!(calculator.base(), MinorUnit::zero());

        calculator.set_base(MinorUnit::new(1000));
        calculator.set_tip_fixed(MinorUnit::new(-250));
        assert_eq!(calculator.tip(), MinorUnit::zero());
        assert_eq!(calculator.total(), MinorUnit::new(1000));

        calculator.set_tip_percentage(Percentage::from_whole(-20));
        assert_eq!(calculator.tip(), MinorUnit::zero());
    }

    #[test]
    fn parses_money_without_floating_point() {
        let gbp = Currency::Gbp;
        assert_eq!(parse_minor_units("42", gbp), MinorUnit::new(4200));
        assert_eq!(parse_minor_units("42.5", gbp), MinorUnit::new(4250));
        assert_eq!(parse_minor_units("42.50", gbp), MinorUnit::new(4250));
        assert_eq!(parse_minor_units(" £42.50 ", gbp), MinorUnit::new(4250));
        assert_eq!(parse_minor_units("1,042.50", gbp), MinorUnit::new(104_250));
        assert_eq!(parse_minor_units(".99", gbp), MinorUnit::new(99));
        assert_eq!(parse_minor_units("0.29", gbp), MinorUnit::new(29));
        assert_eq!(parse_minor_units("10.005", gbp), MinorUnit::new(1001));
        assert_eq!(parse_minor_units("500", Currency::Jpy), MinorUnit::new(500));
        assert_eq!(parse_minor_units("1.250", Currency::Kwd), MinorUnit::new(1250));
    }

    #[test]
    fn malformed_money_is_zero() {
        let gbp = Currency::Gbp;
        for text in ["", "abc", "-5", "4.2.1", "1,00", "12a", "$12", ".", "99999999999999999999"] {
            assert_eq!(parse_minor_units(text, gbp), MinorUnit::zero(), "{text:?}");
        }
    }

    #[test]
    fn parses_percentages() {
        assert_eq!(parse_percentage("15").basis_points(), 1500);
        assert_eq!(parse_percentage("12.5%").basis_points(), 1250);
        assert_eq!(parse_percentage(" 20 % ").basis_points(), 2000);
        assert_eq!(parse_percentage("ten").basis_points(), 0);
        assert_eq!(parse_percentage("-10").basis_points(), 0);
    }
}

// Tax module - regressive income tax (IR) on fixed-income gains

use rust_decimal::Decimal;

/// Holding-period bracket of the regressive fixed-income table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldingBracket {
    /// Up to 180 days
    UpTo180,
    /// 181 to 360 days
    UpTo360,
    /// 361 to 720 days
    UpTo720,
    /// More than 720 days
    Over720,
}

impl HoldingBracket {
    /// Bracket for a holding period in calendar days (upper bounds inclusive).
    pub fn for_days(days: i64) -> Self {
        match days {
            d if d <= 180 => HoldingBracket::UpTo180,
            d if d <= 360 => HoldingBracket::UpTo360,
            d if d <= 720 => HoldingBracket::UpTo720,
            _ => HoldingBracket::Over720,
        }
    }

    /// Tax rate in percent
    pub fn rate_percent(&self) -> Decimal {
        match self {
            HoldingBracket::UpTo180 => Decimal::new(225, 1),
            HoldingBracket::UpTo360 => Decimal::new(200, 1),
            HoldingBracket::UpTo720 => Decimal::new(175, 1),
            HoldingBracket::Over720 => Decimal::new(150, 1),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HoldingBracket::UpTo180 => "até 180 dias",
            HoldingBracket::UpTo360 => "181 a 360 dias",
            HoldingBracket::UpTo720 => "361 a 720 dias",
            HoldingBracket::Over720 => "acima de 720 dias",
        }
    }
}

/// IR rate in percent for a holding period in days
pub fn income_tax_rate(days: i64) -> Decimal {
    HoldingBracket::for_days(days).rate_percent()
}

/// Tax owed on `gain` held for `days`.
///
/// Proportional netting: a negative gain produces a negative tax.
pub fn income_tax(gain: Decimal, days: i64) -> Decimal {
    gain / Decimal::ONE_HUNDRED * income_tax_rate(days)
}

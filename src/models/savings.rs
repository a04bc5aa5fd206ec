use rust_decimal::Decimal;

use super::MonthKey;

/// Amount put aside in a month. At most one record per month.
#[derive(Debug, Clone, PartialEq)]
pub struct Savings {
    pub id: Option<i64>,
    pub month: MonthKey,
    pub amount: Option<Decimal>,
}

impl Savings {
    pub fn new(month: MonthKey, amount: Option<Decimal>) -> Self {
        Self {
            id: None,
            month,
            amount,
        }
    }
}

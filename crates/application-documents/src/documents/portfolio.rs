use rust_decimal::Decimal;

use super::domain::{Application, Fund};

/// Every fund held across the application's products, in product order.
pub fn portfolio_funds(application: &Application) -> Vec<Fund> {
    application
        .products
        .iter()
        .flat_map(|product| product.funds.iter().cloned())
        .collect()
}

/// Sum of `(amount - fees) * tax_rate` taken per fund.
///
/// The rate is applied to each fund before summing; taxing the aggregate once
/// can round differently.
pub fn portfolio_total<'a, I>(funds: I, tax_rate: Decimal) -> Decimal
where
    I: IntoIterator<Item = &'a Fund>,
{
    funds
        .into_iter()
        .map(|fund| (fund.amount - fund.fees) * tax_rate)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fund(amount: Decimal, fees: Decimal) -> Fund {
        Fund {
            fund_id: String::new(),
            name: String::new(),
            amount,
            fees,
        }
    }

    #[test]
    fn total_is_zero_without_funds() {
        assert_eq!(portfolio_total(&Vec::<Fund>::new(), dec!(0.15)), Decimal::ZERO);
    }

    #[test]
    fn total_applies_rate_per_fund() {
        let funds = [fund(dec!(1000), dec!(50)), fund(dec!(2000), dec!(100))];
        assert_eq!(portfolio_total(&funds, dec!(0.15)), dec!(427.5));
    }

    #[test]
    fn total_keeps_decimal_precision() {
        let funds = [
            fund(dec!(0.10), dec!(0)),
            fund(dec!(0.20), dec!(0)),
            fund(dec!(0.30), dec!(0.30)),
        ];
        assert_eq!(portfolio_total(&funds, dec!(1)), dec!(0.3));
    }

    #[test]
    fn fees_above_amount_reduce_total() {
        let funds = [fund(dec!(100), dec!(150)), fund(dec!(400), dec!(0))];
        assert_eq!(portfolio_total(&funds, dec!(0.5)), dec!(175));
    }
}

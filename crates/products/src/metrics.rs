//! Derived per-product figures and catalog-wide aggregates.
//!
//! Nothing here is stored. Amounts stay in integer cents so that
//! `total_value - total_cost == margin * stock` holds exactly; only the margin
//! percentage is a float, rounded to two decimals.

use serde::Serialize;

use stockledger_core::Money;

use crate::product::Product;

/// Derived figures for one product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProductMetrics {
    /// `stock * price`
    pub total_value: Money,
    /// `stock * cost`
    pub total_cost: Money,
    /// `price - cost`
    pub margin: Money,
    /// `margin / price * 100`, rounded to two decimals; `0.0` when the price is zero.
    pub margin_percent: f64,
}

/// A product together with its derived figures, as listed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    #[serde(flatten)]
    pub metrics: ProductMetrics,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let metrics = product_metrics(&product);
        Self { product, metrics }
    }
}

/// Catalog-wide aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InventorySummary {
    pub count: usize,
    pub total_value: Money,
    pub total_cost: Money,
    /// Mean of the per-product margin percentages, rounded to two decimals.
    pub avg_margin_percent: f64,
}

pub fn product_metrics(product: &Product) -> ProductMetrics {
    let margin = product.price - product.cost;
    ProductMetrics {
        total_value: product.price.times(product.stock),
        total_cost: product.cost.times(product.stock),
        margin,
        margin_percent: basis_points_to_percent(margin_basis_points(margin, product.price)),
    }
}

/// Aggregate over the given products. An empty slice yields all zeros.
pub fn summarize(products: &[Product]) -> InventorySummary {
    if products.is_empty() {
        return InventorySummary::default();
    }

    let mut total_value = Money::zero();
    let mut total_cost = Money::zero();
    let mut basis_points_sum: i128 = 0;

    for product in products {
        let metrics = product_metrics(product);
        total_value = total_value + metrics.total_value;
        total_cost = total_cost + metrics.total_cost;
        basis_points_sum += margin_basis_points(metrics.margin, product.price);
    }

    let mean = round_div(basis_points_sum, products.len() as i128);

    InventorySummary {
        count: products.len(),
        total_value,
        total_cost,
        avg_margin_percent: basis_points_to_percent(mean),
    }
}

/// Margin over price in hundredths of a percent.
fn margin_basis_points(margin: Money, price: Money) -> i128 {
    if price.is_zero() {
        return 0;
    }
    round_div(margin.cents() as i128 * 10_000, price.cents() as i128)
}

fn basis_points_to_percent(basis_points: i128) -> f64 {
    basis_points as f64 / 100.0
}

/// Integer division rounding half away from zero.
fn round_div(numerator: i128, denominator: i128) -> i128 {
    let (n, d) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };
    if n >= 0 { (n + d / 2) / d } else { (n - d / 2) / d }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use stockledger_core::ProductId;

    use crate::validation::{MAX_AMOUNT, MAX_STOCK};

    fn product(name: &str, stock: i64, price: i64, cost: i64) -> Product {
        Product {
            id: ProductId::new(),
            name: name.to_string(),
            stock,
            price: Money::from_cents(price),
            cost: Money::from_cents(cost),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn largest_admissible_product_does_not_saturate() {
        let m = product_metrics(&product("p", MAX_STOCK, MAX_AMOUNT.cents(), 1));
        assert_eq!(
            i128::from(m.total_value.cents()),
            i128::from(MAX_STOCK) * i128::from(MAX_AMOUNT.cents())
        );
        assert_eq!(m.total_value - m.total_cost, m.margin.times(MAX_STOCK));
    }

    #[test]
    fn widget_metrics() {
        let m = product_metrics(&product("Widget", 10, 500, 300));
        assert_eq!(m.total_value, Money::from_cents(5_000));
        assert_eq!(m.total_cost, Money::from_cents(3_000));
        assert_eq!(m.margin, Money::from_cents(200));
        assert_eq!(m.margin_percent, 40.0);
    }

    #[test]
    fn margin_percent_rounds_to_two_decimals() {
        // 100 / 300 = 33.333...%
        let m = product_metrics(&product("Third", 1, 300, 200));
        assert_eq!(m.margin_percent, 33.33);

        // 200 / 300 = 66.666...%
        let m = product_metrics(&product("TwoThirds", 1, 300, 100));
        assert_eq!(m.margin_percent, 66.67);
    }

    #[test]
    fn zero_price_has_zero_margin_percent() {
        let m = product_metrics(&product("Free", 4, 0, 0));
        assert_eq!(m.margin_percent, 0.0);
        assert_eq!(m.total_value, Money::zero());
    }

    #[test]
    fn negative_margin_is_reported_not_clamped() {
        let m = product_metrics(&product("Loss", 2, 300, 400));
        assert_eq!(m.margin, Money::from_cents(-100));
        assert_eq!(m.margin_percent, -33.33);
    }

    #[test]
    fn empty_summary_is_all_zero() {
        let s = summarize(&[]);
        assert_eq!(s.count, 0);
        assert_eq!(s.total_value, Money::zero());
        assert_eq!(s.total_cost, Money::zero());
        assert_eq!(s.avg_margin_percent, 0.0);
    }

    #[test]
    fn summary_sums_and_averages() {
        let products = vec![
            product("Widget", 10, 500, 300), // 40%
            product("Gadget", 2, 1_000, 750), // 25%
        ];
        let s = summarize(&products);
        assert_eq!(s.count, 2);
        assert_eq!(s.total_value, Money::from_cents(5_000 + 2_000));
        assert_eq!(s.total_cost, Money::from_cents(3_000 + 1_500));
        assert_eq!(s.avg_margin_percent, 32.5);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_div(5, 2), 3);
        assert_eq!(round_div(-5, 2), -3);
        assert_eq!(round_div(4, 3), 1);
        assert_eq!(round_div(-4, 3), -1);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: value minus cost equals margin times stock, exactly, up to the
        /// largest stock and amounts validation admits.
        #[test]
        fn value_minus_cost_is_stock_times_margin(
            stock in 0i64..=MAX_STOCK,
            price in 0i64..=MAX_AMOUNT.cents(),
            cost in 0i64..=MAX_AMOUNT.cents(),
        ) {
            let m = product_metrics(&product("p", stock, price, cost));
            prop_assert_eq!(m.total_value - m.total_cost, m.margin.times(stock));

            let exact = i128::from(stock) * i128::from(price - cost);
            prop_assert_eq!(i128::from((m.total_value - m.total_cost).cents()), exact);
        }

        /// Property: summary totals equal the sum of the per-product totals.
        #[test]
        fn summary_totals_match_rows(
            rows in prop::collection::vec((0i64..10_000, 1i64..100_000, 0i64..100_000), 1..20)
        ) {
            let products: Vec<Product> = rows
                .iter()
                .map(|(stock, price, cost)| product("p", *stock, *price, *cost))
                .collect();
            let s = summarize(&products);
            let value: Money = products.iter().map(|p| product_metrics(p).total_value).sum();
            let cost: Money = products.iter().map(|p| product_metrics(p).total_cost).sum();
            prop_assert_eq!(s.count, products.len());
            prop_assert_eq!(s.total_value, value);
            prop_assert_eq!(s.total_cost, cost);
        }
    }
}

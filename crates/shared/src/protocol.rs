use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::OrderId;

/// Message the listing page shows after an order has been placed.
pub const ORDER_PLACED_NOTICE: &str = "Order placed successfully";

pub fn product_route() -> &'static str {
    "/product"
}

pub fn listing_route() -> &'static str {
    "/"
}

/// Navigation target after a successful submission. The notice travels
/// unencoded, matching what the listing page expects.
pub fn order_placed_redirect() -> String {
    format!("{}?warning={ORDER_PLACED_NOTICE}", listing_route())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub product: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    #[serde(default)]
    pub price: Option<f64>,
}

impl PriceQuote {
    /// Missing, negative and non-finite prices all read as zero.
    pub fn unit_price(&self) -> f64 {
        match self.price {
            Some(price) if price.is_finite() && price > 0.0 => price,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryQuery {
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductQuery {
    pub product: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOrderQuery {
    pub order_id: OrderId,
}

/// Body of `POST /product`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub product_date: NaiveDate,
    pub customer_name: String,
    pub product_name: String,
    pub product_amount: u32,
    pub product_total: i64,
    pub product_status: String,
    pub product_note: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_uses_backend_field_names() {
        let submission = OrderSubmission {
            product_date: NaiveDate::from_ymd_opt(2024, 3, 9).expect("date"),
            customer_name: "Ada".to_string(),
            product_name: "Cola".to_string(),
            product_amount: 3,
            product_total: 75,
            product_status: "unpaid".to_string(),
            product_note: String::new(),
        };

        let value = serde_json::to_value(&submission).expect("json");
        assert_eq!(value["product_date"], "2024-03-09");
        assert_eq!(value["product_amount"], 3);
        assert_eq!(value["product_total"], 75);
        assert_eq!(value["product_status"], "unpaid");
    }

    #[test]
    fn price_quote_treats_missing_and_negative_prices_as_zero() {
        let missing: PriceQuote = serde_json::from_str("{}").expect("json");
        assert_eq!(missing.unit_price(), 0.0);

        let null: PriceQuote = serde_json::from_str(r#"{"price":null}"#).expect("json");
        assert_eq!(null.unit_price(), 0.0);

        let negative = PriceQuote { price: Some(-4.0) };
        assert_eq!(negative.unit_price(), 0.0);

        let quoted: PriceQuote = serde_json::from_str(r#"{"price":25}"#).expect("json");
        assert_eq!(quoted.unit_price(), 25.0);
    }

    #[test]
    fn order_placed_redirect_targets_listing_with_notice() {
        assert_eq!(
            order_placed_redirect(),
            "/?warning=Order placed successfully"
        );
    }
}

//! Order form value object and the pure operations on it.

use chrono::{NaiveDate, Utc};
use shared::{domain::DEFAULT_ORDER_STATUS, protocol::OrderSubmission};

use crate::error::{InvalidField, ValidationError};

/// Fields of the order-entry modal while it is open.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub date: NaiveDate,
    pub customer_name: String,
    pub category: String,
    pub product_name: String,
    /// Always at least 1 once [`FormState::recompute_total`] has run.
    pub amount: u32,
    pub unit_price: f64,
    pub total: i64,
    pub status: String,
    pub note: String,
    pub submitting: bool,
}

impl FormState {
    /// Fresh form for the given calendar day.
    pub fn initialized(date: NaiveDate) -> Self {
        Self {
            date,
            customer_name: String::new(),
            category: String::new(),
            product_name: String::new(),
            amount: 1,
            unit_price: 0.0,
            total: 0,
            status: DEFAULT_ORDER_STATUS.to_string(),
            note: String::new(),
            submitting: false,
        }
    }

    pub fn today() -> Self {
        Self::initialized(Utc::now().date_naive())
    }

    pub fn recompute_total(&mut self) {
        if self.amount == 0 {
            self.amount = 1;
        }
        self.total = line_total(self.unit_price, self.amount);
    }

    /// Applies raw amount text from the user and recomputes the total.
    pub fn apply_amount_input(&mut self, raw: &str) {
        self.amount = parse_amount(raw);
        self.recompute_total();
    }

    /// Applies raw price text from the user and recomputes the total.
    pub fn apply_price_input(&mut self, raw: &str) {
        self.unit_price = parse_price(raw);
        self.recompute_total();
    }

    pub fn set_unit_price(&mut self, price: f64) {
        self.unit_price = sanitize_price(price);
        self.recompute_total();
    }

    pub fn reset_pricing(&mut self) {
        self.set_unit_price(0.0);
    }

    /// Total as the form displays it: no decimal places.
    pub fn total_display(&self) -> String {
        self.total.to_string()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();
        if self.customer_name.is_empty() {
            fields.push(InvalidField::CustomerName);
        }
        if self.product_name.is_empty() {
            fields.push(InvalidField::ProductName);
        }
        if self.amount == 0 {
            fields.push(InvalidField::Amount);
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields })
        }
    }

    /// Validates the form and builds the payload for `POST /product`.
    pub fn to_submission(&self) -> Result<OrderSubmission, ValidationError> {
        self.validate()?;
        Ok(OrderSubmission {
            product_date: self.date,
            customer_name: self.customer_name.clone(),
            product_name: self.product_name.clone(),
            product_amount: self.amount,
            product_total: line_total(self.unit_price, self.amount),
            product_status: self.status.clone(),
            product_note: self.note.clone(),
        })
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::today()
    }
}

pub fn compute_total(mut state: FormState) -> FormState {
    state.recompute_total();
    state
}

pub fn line_total(unit_price: f64, amount: u32) -> i64 {
    (sanitize_price(unit_price) * f64::from(amount.max(1))).round() as i64
}

/// Parses amount text. Anything that is not a number of at least one
/// (empty, garbage, zero, negative, NaN) becomes 1; fractions are truncated.
pub fn parse_amount(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 1.0 => {
            value.trunc().min(f64::from(u32::MAX)) as u32
        }
        _ => 1,
    }
}

pub fn parse_price(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(sanitize_price).unwrap_or(0.0)
}

fn sanitize_price(price: f64) -> f64 {
    if price.is_finite() && price > 0.0 {
        price
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;

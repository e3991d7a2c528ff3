//! Terminal rendering of controller events and outcomes.

use client_core::{DeleteOutcome, FormEvent, FormState, SubmitOutcome};
use shared::domain::ProductOption;

pub fn describe_event(event: &FormEvent) -> String {
    match event {
        FormEvent::ModalOpened => "[form] opened".to_string(),
        FormEvent::ModalClosed => "[form] closed".to_string(),
        FormEvent::ProductOptionsReplaced(options) => {
            let products = options.iter().filter(|option| !option.is_placeholder()).count();
            format!("[form] product list updated ({products} products)")
        }
        FormEvent::PricingUpdated {
            unit_price,
            amount,
            total,
        } => format!("[form] {unit_price} x {amount} = {total}"),
        FormEvent::NavigationRequested(target) => format!("[nav] go to {target}"),
        FormEvent::ReloadRequested(target) => format!("[nav] reload {target}"),
    }
}

pub fn product_lines(options: &[ProductOption]) -> Vec<String> {
    options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            if option.is_placeholder() {
                format!("  -  {}", option.label)
            } else {
                format!("{index:>3}  {}", option.label)
            }
        })
        .collect()
}

pub fn pricing_line(form: &FormState) -> String {
    format!(
        "{product}: unit price {price}, amount {amount}, total {total}",
        product = form.product_name,
        price = form.unit_price,
        amount = form.amount,
        total = form.total_display()
    )
}

pub fn submit_summary(outcome: &SubmitOutcome) -> String {
    let notice = outcome
        .server_message
        .warning
        .as_deref()
        .or(outcome.server_message.message.as_deref())
        .unwrap_or("order accepted");
    format!(
        "{notice}: {} x {} for {} (total {})",
        outcome.submission.product_amount,
        outcome.submission.product_name,
        outcome.submission.customer_name,
        outcome.submission.product_total
    )
}

pub fn delete_summary(outcome: &DeleteOutcome) -> String {
    let notice = outcome
        .server_message
        .message
        .as_deref()
        .unwrap_or("order deleted");
    format!("{notice}: {}", outcome.order_id)
}

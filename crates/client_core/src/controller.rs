//! Order-entry modal controller.
//!
//! Holds one [`FormState`] behind a mutex and never keeps the lock across a
//! network call. Catalog lookups are tagged with a per-field generation so a
//! response that arrives after a newer request was issued is dropped.

use std::sync::Arc;

use shared::{
    domain::{OrderId, ProductOption},
    error::ServerMessage,
    protocol::{listing_route, order_placed_redirect, OrderSubmission},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::{
    error::OrderError,
    form::FormState,
    service::{HttpProductService, ProductService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    ModalOpened,
    ModalClosed,
    ProductOptionsReplaced(Vec<ProductOption>),
    PricingUpdated {
        unit_price: f64,
        amount: u32,
        total: i64,
    },
    /// The host should navigate to this target.
    NavigationRequested(String),
    /// The host should reload the listing at this target.
    ReloadRequested(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormSnapshot {
    pub modal: ModalState,
    pub form: FormState,
    pub product_options: Vec<ProductOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub submission: OrderSubmission,
    pub redirect: String,
    pub server_message: ServerMessage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub order_id: OrderId,
    pub reload: String,
    pub server_message: ServerMessage,
}

/// Outcome of a catalog lookup as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Applied,
    Cleared,
    Stale,
    Failed,
}

struct ControllerState {
    modal: ModalState,
    form: FormState,
    product_options: Vec<ProductOption>,
    category_generation: u64,
    product_generation: u64,
    /// Bumped by every `open_form`.
    session: u64,
    /// Outlives the form so a reopened modal cannot post a second order.
    submit_in_flight: bool,
}

impl ControllerState {
    fn new() -> Self {
        Self {
            modal: ModalState::Closed,
            form: FormState::today(),
            product_options: vec![ProductOption::placeholder()],
            category_generation: 0,
            product_generation: 0,
            session: 0,
            submit_in_flight: false,
        }
    }

    fn pricing_event(&self) -> FormEvent {
        FormEvent::PricingUpdated {
            unit_price: self.form.unit_price,
            amount: self.form.amount,
            total: self.form.total,
        }
    }
}

pub struct OrderFormController {
    service: Arc<dyn ProductService>,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<FormEvent>,
}

impl OrderFormController {
    pub fn new(service: Arc<dyn ProductService>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            service,
            inner: Mutex::new(ControllerState::new()),
            events,
        })
    }

    pub fn connect(server_url: &str) -> Result<Arc<Self>, OrderError> {
        Ok(Self::new(Arc::new(HttpProductService::new(server_url)?)))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let inner = self.inner.lock().await;
        FormSnapshot {
            modal: inner.modal,
            form: inner.form.clone(),
            product_options: inner.product_options.clone(),
        }
    }

    pub async fn form(&self) -> FormState {
        self.inner.lock().await.form.clone()
    }

    pub async fn modal_state(&self) -> ModalState {
        self.inner.lock().await.modal
    }

    pub async fn product_options(&self) -> Vec<ProductOption> {
        self.inner.lock().await.product_options.clone()
    }

    /// Shows the modal with a fresh form dated today.
    pub async fn open_form(&self) -> FormState {
        let mut inner = self.inner.lock().await;
        inner.modal = ModalState::Open;
        inner.session += 1;
        inner.form = FormState::today();
        inner.form.submitting = inner.submit_in_flight;
        inner.form.recompute_total();
        inner.product_options = vec![ProductOption::placeholder()];
        // Lookups from the previous session must not land in the new form.
        inner.category_generation += 1;
        inner.product_generation += 1;

        self.emit(FormEvent::ModalOpened);
        self.emit(FormEvent::ProductOptionsReplaced(inner.product_options.clone()));
        self.emit(inner.pricing_event());
        inner.form.clone()
    }

    pub async fn close_form(&self) {
        let mut inner = self.inner.lock().await;
        self.close_locked(&mut inner);
    }

    pub async fn compute_total(&self) -> FormState {
        let mut inner = self.inner.lock().await;
        inner.form.recompute_total();
        self.emit(inner.pricing_event());
        inner.form.clone()
    }

    pub async fn set_date(&self, date: chrono::NaiveDate) {
        self.inner.lock().await.form.date = date;
    }

    pub async fn set_customer_name(&self, customer_name: impl Into<String>) {
        self.inner.lock().await.form.customer_name = customer_name.into();
    }

    pub async fn set_status(&self, status: impl Into<String>) {
        self.inner.lock().await.form.status = status.into();
    }

    pub async fn set_note(&self, note: impl Into<String>) {
        self.inner.lock().await.form.note = note.into();
    }

    pub async fn set_amount_input(&self, raw: &str) -> FormState {
        let mut inner = self.inner.lock().await;
        inner.form.apply_amount_input(raw);
        self.emit(inner.pricing_event());
        inner.form.clone()
    }

    pub async fn set_price_input(&self, raw: &str) -> FormState {
        let mut inner = self.inner.lock().await;
        inner.form.apply_price_input(raw);
        self.emit(inner.pricing_event());
        inner.form.clone()
    }

    /// Resets the product selector and pricing, then loads the products of
    /// `category`. Failures are logged and leave the selector as reset.
    pub async fn on_category_changed(&self, category: &str) -> LookupOutcome {
        let token = {
            let mut inner = self.inner.lock().await;
            inner.form.category = category.to_string();
            inner.form.product_name.clear();
            inner.form.reset_pricing();
            inner.product_options = vec![ProductOption::placeholder()];
            inner.category_generation += 1;
            inner.product_generation += 1;

            self.emit(FormEvent::ProductOptionsReplaced(inner.product_options.clone()));
            self.emit(inner.pricing_event());
            inner.category_generation
        };

        if category.is_empty() {
            return LookupOutcome::Cleared;
        }

        let products = match self.service.list_products(category).await {
            Ok(products) => products,
            Err(error) => {
                warn!(%error, category, "failed to load products for category");
                return LookupOutcome::Failed;
            }
        };

        let mut inner = self.inner.lock().await;
        if inner.category_generation != token {
            debug!(category, token, "discarding stale product list");
            return LookupOutcome::Stale;
        }

        let mut options = Vec::with_capacity(products.len() + 1);
        options.push(ProductOption::placeholder());
        options.extend(
            products
                .into_iter()
                .map(|entry| ProductOption::product(entry.product)),
        );
        inner.product_options = options;
        self.emit(FormEvent::ProductOptionsReplaced(inner.product_options.clone()));
        LookupOutcome::Applied
    }

    /// Resets pricing, then looks up the unit price of `product`. Failures
    /// are logged and leave the price at zero.
    pub async fn on_product_changed(&self, product: &str) -> LookupOutcome {
        let token = {
            let mut inner = self.inner.lock().await;
            inner.form.product_name = product.to_string();
            inner.form.reset_pricing();
            inner.product_generation += 1;

            self.emit(inner.pricing_event());
            inner.product_generation
        };

        if product.is_empty() {
            return LookupOutcome::Cleared;
        }

        let quote = match self.service.product_price(product).await {
            Ok(quote) => quote,
            Err(error) => {
                warn!(%error, product, "failed to load product price");
                return LookupOutcome::Failed;
            }
        };

        let mut inner = self.inner.lock().await;
        if inner.product_generation != token {
            debug!(product, token, "discarding stale product price");
            return LookupOutcome::Stale;
        }

        inner.form.set_unit_price(quote.unit_price());
        self.emit(inner.pricing_event());
        LookupOutcome::Applied
    }

    /// Validates and posts the current form. On success the modal closes and
    /// a navigation to the listing is requested; on failure it stays open.
    pub async fn submit_order(&self) -> Result<SubmitOutcome, OrderError> {
        let (submission, session) = {
            let mut inner = self.inner.lock().await;
            if inner.submit_in_flight {
                return Err(OrderError::SubmissionInFlight);
            }
            let submission = inner.form.to_submission()?;
            inner.submit_in_flight = true;
            inner.form.submitting = true;
            (submission, inner.session)
        };

        let result = self.service.create_order(&submission).await;

        let mut inner = self.inner.lock().await;
        inner.submit_in_flight = false;
        inner.form.submitting = false;
        match result {
            Ok(server_message) => {
                info!(
                    customer = %submission.customer_name,
                    product = %submission.product_name,
                    amount = submission.product_amount,
                    total = submission.product_total,
                    "order placed"
                );
                if inner.session == session {
                    self.close_locked(&mut inner);
                } else {
                    debug!(session, "form was reopened while the order was in flight");
                }
                let redirect = order_placed_redirect();
                self.emit(FormEvent::NavigationRequested(redirect.clone()));
                Ok(SubmitOutcome {
                    submission,
                    redirect,
                    server_message,
                })
            }
            Err(err) => {
                log_action_failure("submit order", &err);
                Err(err)
            }
        }
    }

    pub async fn delete_order(&self, order_id: &OrderId) -> Result<DeleteOutcome, OrderError> {
        let result = self.service.delete_order(order_id).await;
        match result {
            Ok(server_message) => {
                info!(%order_id, "order deleted");
                let mut inner = self.inner.lock().await;
                self.close_locked(&mut inner);
                let reload = listing_route().to_string();
                self.emit(FormEvent::ReloadRequested(reload.clone()));
                Ok(DeleteOutcome {
                    order_id: order_id.clone(),
                    reload,
                    server_message,
                })
            }
            Err(err) => {
                log_action_failure("delete order", &err);
                Err(err)
            }
        }
    }

    fn close_locked(&self, inner: &mut ControllerState) {
        if inner.modal == ModalState::Open {
            inner.modal = ModalState::Closed;
            self.emit(FormEvent::ModalClosed);
        }
    }

    fn emit(&self, event: FormEvent) {
        // No subscribers is fine; the snapshot is the source of truth.
        let _ = self.events.send(event);
    }
}

fn log_action_failure(action: &str, err: &OrderError) {
    if err.is_transport_failure() {
        error!(action, error = %err, "request failed without a response");
    } else {
        warn!(action, error = %err, "request rejected");
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

use std::fmt;

use thiserror::Error;

/// Fallback shown when a rejection carries no readable message.
pub const UNKNOWN_SERVER_ERROR: &str = "unknown error";

/// Which user action a failure belongs to, so the adapter can phrase it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    SubmitOrder,
    DeleteOrder,
}

/// Field that failed client-side validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidField {
    CustomerName,
    ProductName,
    Amount,
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CustomerName => "customer name",
            Self::ProductName => "product name",
            Self::Amount => "amount",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order fields: {}", join_fields(.fields))]
pub struct ValidationError {
    pub fields: Vec<InvalidField>,
}

impl ValidationError {
    pub fn contains(&self, field: InvalidField) -> bool {
        self.fields.contains(&field)
    }
}

fn join_fields(fields: &[InvalidField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("server rejected request with status {status}: {message}")]
    ServerRejection { status: u16, message: String },
    #[error("no response from server: {0}")]
    TransportFailure(String),
    #[error("an order submission is already in flight")]
    SubmissionInFlight,
    #[error("failed to decode server response: {0}")]
    Decode(String),
    #[error("invalid server url {0}")]
    InvalidServerUrl(String),
}

impl OrderError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_server_rejection(&self) -> bool {
        matches!(self, Self::ServerRejection { .. })
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::TransportFailure(_))
    }

    /// Message the adapter shows the user for a failed action.
    pub fn alert_text(&self, action: UserAction) -> String {
        match (self, action) {
            (Self::Validation(_), _) => {
                "Please check: customer name and product name are required, and the amount must be greater than zero."
                    .to_string()
            }
            (Self::ServerRejection { message, .. }, UserAction::SubmitOrder) => {
                format!("Failed to place order: {message}")
            }
            (Self::ServerRejection { message, .. }, UserAction::DeleteOrder) => {
                format!("Failed to delete order: {message}")
            }
            (Self::TransportFailure(_), UserAction::SubmitOrder) => {
                "Network error or no response from server; the order could not be sent.".to_string()
            }
            (Self::TransportFailure(_), UserAction::DeleteOrder) => {
                "Network error or no response from server; the order could not be deleted."
                    .to_string()
            }
            (Self::SubmissionInFlight, _) => {
                "The order is still being submitted; please wait.".to_string()
            }
            (Self::Decode(detail), _) => format!("Unexpected server response: {detail}"),
            (Self::InvalidServerUrl(detail), _) => format!("Invalid server address: {detail}"),
        }
    }
}

impl From<reqwest::Error> for OrderError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::TransportFailure(value.to_string())
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status every new order starts with.
pub const DEFAULT_ORDER_STATUS: &str = "unpaid";

/// Server-issued order identifier, e.g. `OD202401311200001234`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the product selector. The placeholder has an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub value: String,
    pub label: String,
}

impl ProductOption {
    pub const PLACEHOLDER_LABEL: &'static str = "Select a product";

    pub fn placeholder() -> Self {
        Self {
            value: String::new(),
            label: Self::PLACEHOLDER_LABEL.to_string(),
        }
    }

    pub fn product(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: name.clone(),
            label: name,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

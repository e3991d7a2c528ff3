use serde::{Deserialize, Serialize};

/// JSON body the backend attaches to write responses.
///
/// Successful writes usually carry `warning` (used as a flash message) or
/// `message`; rejections carry `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServerMessage {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            warning: Some(message.into()),
            ..Self::default()
        }
    }

    /// Text to show for a rejected order submission: `warning` wins over `error`.
    pub fn submission_text(&self) -> Option<&str> {
        non_blank(self.warning.as_deref()).or_else(|| non_blank(self.error.as_deref()))
    }

    /// Text to show for a rejected deletion. Only `error` is meaningful there.
    pub fn deletion_text(&self) -> Option<&str> {
        non_blank(self.error.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

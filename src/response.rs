use serde::Serialize;
use utoipa::ToSchema;

/// Plain acknowledgement body used by mutations that return no entity.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

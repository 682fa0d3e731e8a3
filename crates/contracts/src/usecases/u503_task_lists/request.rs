use serde::{Deserialize, Serialize};

/// Тело `POST /hideTask`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HideTaskRequest {
    pub nazvanie_zdaniya: String,
}

//! Data models for proxy API requests.

use serde::Deserialize;

/// Body of the single-printer operation endpoints; the address is the sole
/// addressing key.
#[derive(Debug, Deserialize)]
pub struct OperationRequest {
    pub ip: String,
}

//! Response Envelope
//!
//! Every server response, success or failure, is wrapped as `{ data, message }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::error::ApiError;

/// `{ data, message }` wrapper around every response body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T = Value> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<Value> {
    /// Decode `data` into a concrete type
    pub fn decode<T: DeserializeOwned>(self) -> Result<Envelope<T>, ApiError> {
        let data = match self.data {
            Some(Value::Null) | None => None,
            Some(value) => Some(serde_json::from_value(value)?),
        };
        Ok(Envelope {
            data,
            message: self.message,
        })
    }

    /// Decode `data`, treating its absence as a malformed response
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        self.decode::<T>()?
            .data
            .ok_or_else(|| ApiError::decode("response envelope has no data"))
    }
}

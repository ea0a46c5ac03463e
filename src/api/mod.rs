//! Category records and the remote API they live behind.
//!
//! The server speaks a small PHP-style protocol: every call is a POST whose
//! JSON body carries `deviceType` and `username`, plus whichever of
//! `cat_name`, `main_cat_id` and `deleted_flg` the action needs. Every reply
//! is `{"status": ..., "message": ...}` and only `status == "success"` counts.

pub mod http;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Server-assigned category identifier. Opaque to us.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// MAIN_CAT_ID shows up as either "12" or 12 depending on the backend build
impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => CategoryId(s),
            RawId::Number(n) => CategoryId(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "MAIN_CAT_ID")]
    pub id: CategoryId,
    #[serde(rename = "MAIN_CAT_NAME")]
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.into(),
        }
    }
}

/// The `deleted_flg` sent with `update`: rename or soft-delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordFlag {
    #[serde(rename = "U")]
    Update,
    #[serde(rename = "D")]
    Delete,
}

impl RecordFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordFlag::Update => "U",
            RecordFlag::Delete => "D",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("server rejected request: {0}")]
    Rejected(String),
}

/// Remote category store.
#[async_trait]
pub trait CategoryApi: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Category>, ApiError>;

    async fn insert(&self, name: &str) -> Result<(), ApiError>;

    /// Rename (`RecordFlag::Update`) or soft-delete (`RecordFlag::Delete`).
    async fn update(&self, id: &CategoryId, name: &str, flag: RecordFlag) -> Result<(), ApiError>;
}

/// Request body shared by every action.
#[derive(Debug, Serialize)]
pub struct RequestBody<'a> {
    #[serde(rename = "deviceType")]
    pub device_type: &'a str,
    pub username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_cat_id: Option<&'a CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_flg: Option<RecordFlag>,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: serde_json::Value,
}

impl ApiResponse {
    /// The `message` payload when `status` is "success", else `Rejected`.
    pub fn into_message(self) -> Result<serde_json::Value, ApiError> {
        if self.status == "success" {
            return Ok(self.message);
        }

        let reason = match self.message {
            serde_json::Value::String(s) if !s.is_empty() => s,
            _ if self.status.is_empty() => "missing status".to_string(),
            _ => format!("status {}", self.status),
        };
        Err(ApiError::Rejected(reason))
    }

    pub fn into_categories(self) -> Result<Vec<Category>, ApiError> {
        let message = self.into_message()?;
        Ok(serde_json::from_value(message)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_id_accepts_string_and_number() {
        let body = r#"{"status":"success","message":[
            {"MAIN_CAT_ID":"1","MAIN_CAT_NAME":"Food"},
            {"MAIN_CAT_ID":2,"MAIN_CAT_NAME":"Toys"}
        ]}"#;
        let response: ApiResponse = serde_json::from_str(body).unwrap();
        let categories = response.into_categories().unwrap();

        assert_eq!(categories, vec![Category::new("1", "Food"), Category::new("2", "Toys")]);
    }

    #[test]
    fn test_non_success_status_is_rejected() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"status":"error","message":"duplicate name"}"#).unwrap();

        match response.into_message() {
            Err(ApiError::Rejected(reason)) => assert_eq!(reason, "duplicate name"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_status_is_rejected() {
        let response: ApiResponse = serde_json::from_str(r#"{"message":[]}"#).unwrap();

        match response.into_message() {
            Err(ApiError::Rejected(reason)) => assert_eq!(reason, "missing status"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_request_body_omits_unused_fields() {
        let body = RequestBody {
            device_type: "web",
            username: "anvar",
            cat_name: None,
            main_cat_id: None,
            deleted_flg: None,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json, serde_json::json!({"deviceType": "web", "username": "anvar"}));
    }

    #[test]
    fn test_request_body_soft_delete() {
        let id = CategoryId::new("7");
        let body = RequestBody {
            device_type: "web",
            username: "anvar",
            cat_name: Some("Toys"),
            main_cat_id: Some(&id),
            deleted_flg: Some(RecordFlag::Delete),
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["main_cat_id"], "7");
        assert_eq!(json["deleted_flg"], "D");
        assert_eq!(json["cat_name"], "Toys");
    }
}

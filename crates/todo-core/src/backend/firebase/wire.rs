//! REST Wire Types
//!
//! Request and response bodies for Identity Toolkit, Secure Token and
//! Firestore.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Identity, Item, ItemPatch, NewItem, StoreError, StoreResult, UserId};

// ========================
// Identity Toolkit
// ========================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdpRequest {
    pub post_body: String,
    pub request_uri: &'static str,
    pub return_idp_credential: bool,
    pub return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest<'a> {
    pub id_token: &'a str,
    pub display_name: &'a str,
    pub return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest<'a> {
    pub id_token: &'a str,
}

/// Response of signInWithPassword / signUp / signInWithIdp
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
}

impl SignInResponse {
    pub fn identity(&self) -> Identity {
        Identity::new(
            self.local_id.clone(),
            non_empty(self.email.clone()),
            non_empty(self.display_name.clone()),
        )
    }
}

/// Response of accounts:update; tokens are only present when they rotated
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupUser {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl LookupUser {
    pub fn identity(&self) -> Identity {
        Identity::new(
            self.local_id.clone(),
            non_empty(self.email.clone()),
            non_empty(self.display_name.clone()),
        )
    }
}

/// Secure Token refresh response (snake_case, unlike Identity Toolkit)
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub user_id: String,
}

/// Error body shared by all Google REST APIs
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ========================
// Firestore
// ========================

/// Firestore typed value, e.g. `{"stringValue": "x"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    StringValue(String),
    BooleanValue(bool),
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    NullValue(()),
    /// Resource name of another document
    ReferenceValue(String),
    /// Base64 encoded
    BytesValue(String),
    GeoPointValue(serde_json::Value),
    MapValue(serde_json::Value),
    ArrayValue(serde_json::Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

/// One element of a runQuery response stream
#[derive(Debug, Deserialize)]
pub struct RunQueryResult {
    #[serde(default)]
    pub document: Option<Document>,
}

impl Document {
    pub fn from_new_item(item: &NewItem) -> Self {
        let mut fields = HashMap::new();
        fields.insert("owner".to_string(), Value::StringValue(item.owner.as_str().to_string()));
        fields.insert("content".to_string(), Value::StringValue(item.content.clone()));
        fields.insert("completed".to_string(), Value::BooleanValue(item.completed));
        Self {
            name: String::new(),
            fields,
        }
    }

    pub fn from_patch(patch: &ItemPatch) -> Self {
        let mut fields = HashMap::new();
        if let Some(content) = &patch.content {
            fields.insert("content".to_string(), Value::StringValue(content.clone()));
        }
        if let Some(completed) = patch.completed {
            fields.insert("completed".to_string(), Value::BooleanValue(completed));
        }
        Self {
            name: String::new(),
            fields,
        }
    }

    /// Last path segment of the resource name
    pub fn id(&self) -> StoreResult<&str> {
        self.name
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| StoreError::Decode(format!("document without id: {:?}", self.name)))
    }

    pub fn into_item(self) -> StoreResult<Item> {
        let id = self.id()?.to_string();
        let owner = match self.fields.get("owner") {
            Some(Value::StringValue(owner)) => owner.clone(),
            other => return Err(StoreError::Decode(format!("document {id}: bad owner {other:?}"))),
        };
        let content = match self.fields.get("content") {
            Some(Value::StringValue(content)) => content.clone(),
            None | Some(Value::NullValue(())) => String::new(),
            other => return Err(StoreError::Decode(format!("document {id}: bad content {other:?}"))),
        };
        let completed = match self.fields.get("completed") {
            Some(Value::BooleanValue(completed)) => *completed,
            None | Some(Value::NullValue(())) => false,
            other => return Err(StoreError::Decode(format!("document {id}: bad completed {other:?}"))),
        };
        Ok(Item {
            id,
            owner: UserId::new(owner),
            content,
            completed,
        })
    }
}

/// structuredQuery selecting `collection` documents whose owner is `owner`
pub fn owner_query(collection: &str, owner: &UserId) -> serde_json::Value {
    serde_json::json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "owner" },
                    "op": "EQUAL",
                    "value": { "stringValue": owner.as_str() }
                }
            }
        }
    })
}

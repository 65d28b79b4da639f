//! Backend Configuration
//!
//! Firebase project settings. Loaded from JSON or from variables baked in at
//! compile time, since the wasm app has no runtime environment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_DATABASE: &str = "(default)";
const DEFAULT_COLLECTION: &str = "todos";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("missing config value: {0}")]
    Missing(&'static str),
}

/// Base URLs of the Google APIs; override to point at the local emulators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Endpoints {
    pub identity_toolkit: String,
    pub secure_token: String,
    pub firestore: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            identity_toolkit: "https://identitytoolkit.googleapis.com/v1".to_string(),
            secure_token: "https://securetoken.googleapis.com/v1".to_string(),
            firestore: "https://firestore.googleapis.com/v1".to_string(),
        }
    }
}

/// Firebase project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    #[serde(default = "default_database")]
    pub database: String,
    /// Collection holding the to-do documents
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub endpoints: Endpoints,
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl FirebaseConfig {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            database: default_database(),
            collection: default_collection(),
            endpoints: Endpoints::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `TODO_FIREBASE_API_KEY` / `TODO_FIREBASE_PROJECT_ID` as set at build time
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let api_key = option_env!("TODO_FIREBASE_API_KEY").ok_or(ConfigError::Missing("TODO_FIREBASE_API_KEY"))?;
        let project_id =
            option_env!("TODO_FIREBASE_PROJECT_ID").ok_or(ConfigError::Missing("TODO_FIREBASE_PROJECT_ID"))?;
        let config = Self::new(api_key, project_id);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("apiKey"));
        }
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::Missing("projectId"));
        }
        Ok(())
    }

    /// Root of the Firestore document tree for this project
    pub fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.endpoints.firestore, self.project_id, self.database
        )
    }

    /// Full resource name prefix used in Firestore document `name` fields
    pub fn documents_resource(&self) -> String {
        format!("projects/{}/databases/{}/documents", self.project_id, self.database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_json_with_defaults() {
        let config = FirebaseConfig::from_json(r#"{"apiKey":"k","projectId":"p"}"#).unwrap();
        assert_eq!(config.database, "(default)");
        assert_eq!(config.collection, "todos");
        assert_eq!(config.endpoints, Endpoints::default());
        assert_eq!(
            config.documents_url(),
            "https://firestore.googleapis.com/v1/projects/p/databases/(default)/documents"
        );
    }

    #[test]
    fn endpoints_can_be_overridden_partially() {
        let config = FirebaseConfig::from_json(
            r#"{"apiKey":"k","projectId":"p","endpoints":{"firestore":"http://localhost:8080/v1"}}"#,
        )
        .unwrap();
        assert_eq!(config.endpoints.firestore, "http://localhost:8080/v1");
        assert_eq!(
            config.endpoints.identity_toolkit,
            "https://identitytoolkit.googleapis.com/v1"
        );
    }

    #[test]
    fn rejects_blank_values() {
        let err = FirebaseConfig::from_json(r#"{"apiKey":" ","projectId":"p"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("apiKey")));
        assert!(FirebaseConfig::from_json("not json").is_err());
    }
}

//! Session context for a single exchange.
//!
//! Attributes live only as long as one request/response; persisting them
//! across turns is the platform's job (they are echoed in the response).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    /// True on the first exchange of a session.
    #[serde(rename = "new", default)]
    pub is_new: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl Session {
    pub fn new(session_id: impl Into<String>, is_new: bool) -> Self {
        Self {
            session_id: session_id.into(),
            is_new,
            ..Default::default()
        }
    }

    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application = Some(Application {
            application_id: application_id.into(),
        });
        self
    }

    /// Application identifier the request claims to be addressed to.
    pub fn application_id(&self) -> Option<&str> {
        self.application.as_ref().map(|a| a.application_id.as_str())
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }
}

//! # Event Envelope
//!
//! The HTTP-like event handed over by the calling fabric and the response
//! handed back. Field names follow the fabric's camelCase wire format.

use chrono::{NaiveDateTime, Timelike};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::config::CorsConfig;
use crate::constants::headers;
use crate::error::{GamifyError, Result};

/// HTTP verb of an event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Other(String),
}

impl Method {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "OPTIONS" => Method::Options,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Other(other) => other,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_method() -> String {
    "GET".to_string()
}

/// Incoming event. Unknown envelope keys are ignored; the fabric adds its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerEvent {
    #[serde(default = "default_method")]
    pub http_method: String,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub path_params: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

impl HandlerEvent {
    pub fn new(method: &str) -> Self {
        Self {
            http_method: method.to_string(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.into());
        self
    }

    pub fn with_path_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.path_params
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_json_body(self, body: &serde_json::Value) -> Self {
        self.with_body(body.to_string())
    }

    pub fn method(&self) -> Method {
        Method::parse(&self.http_method)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }

    /// Decode the body into a request schema. An absent or blank body reads
    /// as `{}` so that missing-field checks report the field by name.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = match self.body.as_deref().map(str::trim) {
            None | Some("") => "{}",
            Some(raw) => raw,
        };
        Ok(serde_json::from_str(raw)?)
    }
}

/// Response returned to the fabric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl HandlerResponse {
    /// Parsed body, for callers and tests that want to inspect it
    pub fn body_json(&self) -> Result<serde_json::Value> {
        serde_json::from_str(&self.body)
            .map_err(|e| GamifyError::Internal(format!("response body is not JSON: {e}")))
    }
}

/// Builds responses carrying the configured CORS headers
#[derive(Debug, Clone)]
pub struct Cors {
    allowed_origin: String,
    allowed_headers: String,
    max_age_seconds: u64,
}

impl Default for Cors {
    fn default() -> Self {
        Self::from(&CorsConfig::default())
    }
}

impl From<&CorsConfig> for Cors {
    fn from(config: &CorsConfig) -> Self {
        Self {
            allowed_origin: config.allowed_origin.clone(),
            allowed_headers: config.allowed_headers.clone(),
            max_age_seconds: config.max_age_seconds,
        }
    }
}

impl Cors {
    /// Bodiless answer to a pre-flight request
    pub fn preflight(&self, allowed_methods: &str) -> HandlerResponse {
        let headers = BTreeMap::from([
            (headers::ALLOW_ORIGIN.to_string(), self.allowed_origin.clone()),
            (headers::ALLOW_METHODS.to_string(), allowed_methods.to_string()),
            (headers::ALLOW_HEADERS.to_string(), self.allowed_headers.clone()),
            (headers::MAX_AGE.to_string(), self.max_age_seconds.to_string()),
        ]);
        HandlerResponse {
            status_code: 200,
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    pub fn json<T: Serialize>(&self, status_code: u16, payload: &T) -> HandlerResponse {
        match serde_json::to_string(payload) {
            Ok(body) => self.raw(status_code, body),
            Err(e) => self.error(&GamifyError::Internal(e.to_string())),
        }
    }

    /// `{"error": "<message>"}` with the error's status code
    pub fn error(&self, error: &GamifyError) -> HandlerResponse {
        let body = serde_json::json!({ "error": error.to_string() }).to_string();
        self.raw(error.status_code(), body)
    }

    fn raw(&self, status_code: u16, body: String) -> HandlerResponse {
        let headers = BTreeMap::from([
            (
                headers::CONTENT_TYPE.to_string(),
                headers::APPLICATION_JSON.to_string(),
            ),
            (headers::ALLOW_ORIGIN.to_string(), self.allowed_origin.clone()),
        ]);
        HandlerResponse {
            status_code,
            headers,
            body,
            is_base64_encoded: false,
        }
    }
}

/// ISO-8601 rendering used in every response, `None` stays `null`
pub fn format_timestamp(timestamp: Option<NaiveDateTime>) -> Option<String> {
    timestamp.map(|ts| {
        // Whole seconds carry no fraction, anything else carries microseconds
        let pattern = if ts.nanosecond() == 0 {
            "%Y-%m-%dT%H:%M:%S"
        } else {
            "%Y-%m-%dT%H:%M:%S%.6f"
        };
        ts.format(pattern).to_string()
    })
}

/// Read a required integer identifier from a query or path value
pub fn parse_required_id(value: Option<&str>, field: &str, missing_message: &str) -> Result<i64> {
    let raw = match value.map(str::trim) {
        None | Some("") => return Err(GamifyError::validation(missing_message)),
        Some(raw) => raw,
    };
    raw.parse::<i64>()
        .map_err(|_| GamifyError::validation(format!("{field} must be an integer")))
}

/// Treat an empty string like an absent field
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

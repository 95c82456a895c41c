//! Gateway proxy envelope.
//!
//! The managed gateway hands the function a JSON request event and expects a
//! JSON response envelope back. Only the fields the archiver reads or writes
//! are modeled; everything else in the event is ignored.

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Incoming proxy request event.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    /// Query string parameters. The gateway sends `null` when there are none,
    /// and individual values may be `null` too.
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, Option<String>>>,
}

impl GatewayRequest {
    /// Build a request carrying only a `min_date` parameter.
    pub fn with_min_date(min_date: Option<String>) -> Self {
        Self {
            query_string_parameters: min_date
                .map(|value| HashMap::from([("min_date".to_string(), Some(value))])),
        }
    }

    /// Look up a query parameter. A null map, a missing key and a null value
    /// all read as absent.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .and_then(Option::as_deref)
    }
}

/// Outgoing proxy response envelope.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub body: String,
    pub is_base64_encoded: bool,
    pub headers: BTreeMap<String, String>,
}

impl GatewayResponse {
    /// Wrap raw archive bytes as a base64 `application/zip` attachment.
    pub fn zip_attachment(archive: &[u8], filename: &str) -> Self {
        let headers = BTreeMap::from([
            ("Content-Type".to_string(), ZIP_CONTENT_TYPE.to_string()),
            (
                "Content-Disposition".to_string(),
                format!("attachment; filename={}", filename),
            ),
        ]);

        Self {
            status_code: 200,
            body: general_purpose::STANDARD.encode(archive),
            is_base64_encoded: true,
            headers,
        }
    }

    /// Body bytes as the gateway would deliver them to the client.
    pub fn decoded_body(&self) -> Result<Vec<u8>, base64::DecodeError> {
        if self.is_base64_encoded {
            general_purpose::STANDARD.decode(&self.body)
        } else {
            Ok(self.body.clone().into_bytes())
        }
    }
}

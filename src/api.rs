//! JSON client for the shop's REST backend.
//!
//! The backend exposes collection endpoints (`/clientes`, `/vehiculos`,
//! `/servicios`, `/repuestos`, ...) with conventional verbs. It is an
//! external collaborator; this client consumes it and nothing more.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// REST operations the screens rely on, behind a trait so tests can stub
/// the backend out.
pub trait ShopApi {
    fn list(&self, resource: &str) -> Result<Vec<Value>, ApiError>;
    fn create(&self, resource: &str, body: &Value) -> Result<Value, ApiError>;
    fn update(&self, resource: &str, id: u32, body: &Value) -> Result<Value, ApiError>;
    fn delete(&self, resource: &str, id: u32) -> Result<(), ApiError>;
}

pub struct Client {
    base_url: String,
    agent: ureq::Agent,
}

impl Client {
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout(std::time::Duration::from_millis(timeout_ms))
                .build(),
        }
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    fn handle(resp: Result<ureq::Response, ureq::Error>) -> Result<Value, ApiError> {
        // TODO: attach the session to these requests once the backend's
        // auth contract is settled (see DESIGN.md).
        match resp {
            Ok(r) => r
                .into_json::<Value>()
                .map_err(|e| ApiError::Decode(e.to_string())),
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(ApiError::Status { status: code, body })
            }
            Err(e) => Err(ApiError::Transport(e.to_string())),
        }
    }
}

impl ShopApi for Client {
    fn list(&self, resource: &str) -> Result<Vec<Value>, ApiError> {
        let value = Self::handle(self.agent.get(&self.url(resource)).call())?;
        match value {
            Value::Array(rows) => Ok(rows),
            other => Err(ApiError::Decode(format!(
                "expected an array, got: {}",
                other
            ))),
        }
    }

    fn create(&self, resource: &str, body: &Value) -> Result<Value, ApiError> {
        Self::handle(self.agent.post(&self.url(resource)).send_json(body.clone()))
    }

    fn update(&self, resource: &str, id: u32, body: &Value) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.url(resource), id);
        Self::handle(self.agent.put(&url).send_json(body.clone()))
    }

    fn delete(&self, resource: &str, id: u32) -> Result<(), ApiError> {
        let url = format!("{}/{}", self.url(resource), id);
        Self::handle(self.agent.delete(&url).call()).map(|_| ())
    }
}

/// Deserialize listing rows, skipping any the client does not understand.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
        nombre: String,
    }

    #[test]
    fn test_decode_rows_skips_malformed() {
        let rows = vec![
            json!({"id": 1, "nombre": "Juan"}),
            json!({"nombre": "sin id"}),
            json!({"id": 2, "nombre": "María"}),
        ];
        let decoded: Vec<Row> = decode_rows(rows);
        assert_eq!(
            decoded,
            vec![
                Row {
                    id: 1,
                    nombre: "Juan".to_string()
                },
                Row {
                    id: 2,
                    nombre: "María".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_client_url_trims_trailing_slash() {
        let client = Client::new("http://localhost:8000/api/v1/", 10_000);
        assert_eq!(client.url("clientes"), "http://localhost:8000/api/v1/clientes");
    }
}

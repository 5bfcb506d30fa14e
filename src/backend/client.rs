//! HTTP client for the reservations backend.
//!
//! Every call is a single request: no retries, no caching here. Callers
//! decide what to do with a failure (usually log it and keep the old state).

use reqwest::{redirect, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::pricing::models::PriceCatalog;
use crate::reservations::record::ReservationRecord;
use crate::reservations::session::ReservationSubmission;

const USER_AGENT: &str = concat!("ludicus-reservas/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected backend payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::Api { status: 404, .. })
    }
}

/// Outcome of a form submission. The backend answers with a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub status: u16,
    pub redirect_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NextCodeResponse {
    codigo: String,
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let value: serde_json::Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(BackendError::Api {
                    status: status.as_u16(),
                    message: body.trim().chars().take(200).collect(),
                })
            }
            Err(e) => return Err(BackendError::Decode(e)),
        };

        // the backend reports lookups that failed as `{"error": "..."}`
        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            let status = if status.is_success() {
                StatusCode::NOT_FOUND
            } else {
                status
            };
            warn!("Backend rejected {}: {}", url, message);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: message.to_string(),
            });
        }

        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: value.to_string(),
            });
        }

        Ok(serde_json::from_value(value)?)
    }

    /// `GET /api/opciones-reserva`
    pub async fn fetch_catalog(&self) -> Result<PriceCatalog, BackendError> {
        self.get_json("api/opciones-reserva").await
    }

    /// `GET /api/reservas/{id}`
    pub async fn fetch_reservation(&self, reservation_id: i64) -> Result<ReservationRecord, BackendError> {
        self.get_json(&format!("api/reservas/{}", reservation_id)).await
    }

    /// `GET /api/proximo-codigo/{sede_id}`
    pub async fn next_code(&self, sede_id: i64) -> Result<String, BackendError> {
        let response: NextCodeResponse = self
            .get_json(&format!("api/proximo-codigo/{}", sede_id))
            .await?;
        Ok(response.codigo)
    }

    /// Post the reservation form to its create or edit endpoint.
    pub async fn submit_reservation(
        &self,
        submission: &ReservationSubmission,
    ) -> Result<SubmitOutcome, BackendError> {
        let url = self.endpoint(&submission.action)?;
        debug!("POST {}", url);

        let response = self.http.post(url).form(submission).send().await?;
        let status = response.status();

        if status.is_success() || status.is_redirection() {
            let redirect_to = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            return Ok(SubmitOutcome {
                status: status.as_u16(),
                redirect_to,
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Api {
            status: status.as_u16(),
            message: body.trim().chars().take(200).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = BackendClient::new("http://backend.local/ludicus", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint("/api/reservas/nueva").unwrap().as_str(),
            "http://backend.local/ludicus/api/reservas/nueva"
        );
        assert_eq!(
            client.endpoint("api/opciones-reserva").unwrap().as_str(),
            "http://backend.local/ludicus/api/opciones-reserva"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = BackendClient::new("not a url", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, BackendError::InvalidUrl(_)));
    }

    #[test]
    fn test_not_found_detection() {
        let err = BackendError::Api {
            status: 404,
            message: "Reserva no encontrada".to_string(),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Reserva no encontrada"));
    }
}

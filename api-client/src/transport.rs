use async_trait::async_trait;

use crate::error::Result;
use crate::error::classify_status_error;
use crate::request::RequestDescriptor;

/// What came back from the provider, before any classification.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    /// Body of a successful response, or the classified provider error.
    pub fn into_body(self) -> Result<String> {
        if (200..300).contains(&self.status) {
            Ok(self.body)
        } else {
            Err(classify_status_error(self.status, self.body))
        }
    }
}

/// Seam between the pipeline and the network. The pipeline enforces no
/// timeout and performs no retries; both belong to the implementation
/// behind this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &RequestDescriptor) -> Result<TransportResponse>;
}

/// The one real transport: a thin reqwest POST.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &RequestDescriptor) -> Result<TransportResponse> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let response = builder.json(&request.body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use crate::error::Error;

    #[test]
    fn success_statuses_yield_the_body() {
        let response = TransportResponse {
            status: 200,
            body: "[]".to_string(),
        };
        assert_eq!(response.into_body().expect("body"), "[]");
    }

    #[test]
    fn auth_status_is_classified() {
        let response = TransportResponse {
            status: 401,
            body: "Unauthorized".to_string(),
        };
        assert_matches!(
            response.into_body().expect_err("fail"),
            Error::AuthRejected { status: 401, .. }
        );
    }

    #[test]
    fn server_errors_stay_unclassified() {
        let response = TransportResponse {
            status: 503,
            body: "upstream overloaded".to_string(),
        };
        assert_matches!(
            response.into_body().expect_err("fail"),
            Error::UnexpectedStatus { status: 503, .. }
        );
    }
}

//! API client for communicating with the advisor service

use advisor_lib::{
    ErrorResponse, HealthResponse, ProjectDescription, ReadinessResponse, RecommendError,
    RecommendOutcome, Recommendation,
};
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// What the advisor said about a project description
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendReply {
    Recommended(Recommendation),
    /// No match or invalid input, with the advisor's message and code
    Rejected(ErrorResponse),
}

impl From<RecommendOutcome> for RecommendReply {
    fn from(outcome: RecommendOutcome) -> Self {
        match outcome {
            RecommendOutcome::Recommended(rec) => RecommendReply::Recommended(rec),
            RecommendOutcome::NoMatch(no_match) => {
                RecommendReply::Rejected(ErrorResponse::from(&no_match))
            }
        }
    }
}

impl RecommendReply {
    /// Map a local engine result the way the service would answer it.
    /// Internal failures stay errors.
    pub fn from_local(result: Result<RecommendOutcome, RecommendError>) -> Result<Self> {
        match result {
            Ok(outcome) => Ok(outcome.into()),
            Err(err) if err.is_client_error() => Ok(RecommendReply::Rejected(ErrorResponse::new(
                err.public_message(),
                err.code(),
            ))),
            Err(err) => Err(err).context("Recommendation failed"),
        }
    }
}

/// API client for the advisor service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).context("Invalid path")
    }

    /// Send a request, failing on any status that is neither a success nor
    /// one of `accepted`
    async fn send(&self, request: RequestBuilder, accepted: &[StatusCode]) -> Result<Response> {
        let response = request.send().await.context("Failed to send request")?;
        let status = response.status();

        if !status.is_success() && !accepted.contains(&status) {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        accepted: &[StatusCode],
    ) -> Result<T> {
        self.send(request, accepted)
            .await?
            .json()
            .await
            .context("Failed to parse response")
    }

    /// Ask the advisor for recommendations
    pub async fn recommend(&self, desc: &ProjectDescription) -> Result<RecommendReply> {
        let request = self.client.post(self.url("recommend")?).json(desc);
        let response = self
            .send(request, &[StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND])
            .await?;

        if response.status().is_success() {
            let rec = response.json().await.context("Failed to parse response")?;
            Ok(RecommendReply::Recommended(rec))
        } else {
            let err = response.json().await.context("Failed to parse error response")?;
            Ok(RecommendReply::Rejected(err))
        }
    }

    /// Liveness report; an unhealthy advisor answers 503 with the same body
    pub async fn health(&self) -> Result<HealthResponse> {
        let request = self.client.get(self.url("healthz")?);
        self.send_json(request, &[StatusCode::SERVICE_UNAVAILABLE])
            .await
    }

    pub async fn readiness(&self) -> Result<ReadinessResponse> {
        let request = self.client.get(self.url("readyz")?);
        self.send_json(request, &[StatusCode::SERVICE_UNAVAILABLE])
            .await
    }
}

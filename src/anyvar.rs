use async_trait::async_trait;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_ANYVAR_URL: &str = "http://localhost:8000";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum AnyVarError {
    #[error("AnyVar request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("AnyVar rejected {definition}: {}", messages.iter().join("; "))]
    Rejected {
        definition: String,
        messages: Vec<String>,
    },
}

/// Represents the different kind of supported VRS variations
///
/// Currently, the loader can only register alleles, so other variation
/// types AnyVar supports are never sent.
#[derive(Debug, Clone, Copy, Serialize)]
enum VariationType {
    Allele,
}

#[derive(Debug, Serialize)]
struct RegistrationRequest<'a> {
    input_type: VariationType,
    definition: &'a str,
}

/// Body of AnyVar's `PUT /variation` reply.
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationResponse {
    /// Empty unless AnyVar could not translate the definition.
    #[serde(default)]
    pub messages: Vec<String>,
    /// The normalized VRS object, passed through as-is (null included).
    #[serde(default)]
    pub object: Value,
}

impl RegistrationResponse {
    pub fn into_object(self, definition: &str) -> Result<Value, AnyVarError> {
        if !self.messages.is_empty() {
            return Err(AnyVarError::Rejected {
                definition: definition.to_string(),
                messages: self.messages,
            });
        }
        Ok(self.object)
    }
}

#[async_trait]
pub trait AlleleRegistrar: Send + Sync {
    /// Sends one allele definition and returns the decoded reply as-is.
    async fn put_allele(&self, definition: &str) -> Result<RegistrationResponse, AnyVarError>;

    /// Like `put_allele`, but any reported message is an error.
    async fn register_allele(&self, definition: &str) -> Result<Value, AnyVarError> {
        let response = self.put_allele(definition).await?;
        response.into_object(definition)
    }
}

fn variation_endpoint(base_url: &str) -> String {
    format!("{}/variation", base_url.trim_end_matches('/'))
}

pub struct AnyVarClient {
    client: reqwest::Client,
    endpoint: String,
}

impl AnyVarClient {
    pub fn new(base_url: &str) -> Result<Self, AnyVarError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        AnyVarClient {
            client,
            endpoint: variation_endpoint(base_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AlleleRegistrar for AnyVarClient {
    async fn put_allele(&self, definition: &str) -> Result<RegistrationResponse, AnyVarError> {
        let body = RegistrationRequest {
            input_type: VariationType::Allele,
            definition,
        };
        let response = self
            .client
            .put(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

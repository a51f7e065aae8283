//! AWS Bedrock runtime transport.
//!
//! Credentials come from the configured profile when it resolves,
//! otherwise from the ambient chain (env vars, instance role). The
//! client is built on first use and cached for the process lifetime;
//! a failed attempt is not cached so the next call tries again.

use async_trait::async_trait;
use aws_config::default_provider::credentials::DefaultCredentialsChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use tokio::sync::OnceCell;

use super::core::{GatewayError, InvokeModel};
use crate::core::AppConfig;

pub struct BedrockRuntime {
    profile: String,
    region: String,
    endpoint: Option<String>,
    client: OnceCell<Client>,
}

impl BedrockRuntime {
    pub fn new(profile: &str, region: &str, endpoint: Option<&str>) -> Self {
        Self {
            profile: profile.to_string(),
            region: region.to_string(),
            endpoint: endpoint.map(str::to_string),
            client: OnceCell::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.aws_profile,
            &config.aws_region,
            config.bedrock_endpoint.as_deref(),
        )
    }

    /// Use an already configured SDK client.
    pub fn with_client(client: Client) -> Self {
        Self {
            profile: String::new(),
            region: String::new(),
            endpoint: None,
            client: OnceCell::new_with(Some(client)),
        }
    }

    async fn client(&self) -> Result<&Client, GatewayError> {
        self.client.get_or_try_init(|| self.connect()).await
    }

    async fn credentials(&self, region: &Region) -> Result<SharedCredentialsProvider, GatewayError> {
        let profile = ProfileFileCredentialsProvider::builder()
            .profile_name(&self.profile)
            .build();
        match profile.provide_credentials().await {
            Ok(_) => {
                tracing::debug!(
                    "Using AWS profile '{}' for bedrock-runtime in {}",
                    self.profile,
                    self.region
                );
                return Ok(SharedCredentialsProvider::new(profile));
            }
            Err(e) => {
                tracing::warn!(
                    "AWS profile '{}' unavailable ({}), falling back to ambient credentials",
                    self.profile,
                    DisplayErrorContext(&e)
                );
            }
        }

        let ambient = DefaultCredentialsChain::builder()
            .region(region.clone())
            .build()
            .await;
        ambient.provide_credentials().await.map_err(|e| {
            tracing::error!(
                "No AWS credentials available for bedrock-runtime: {}",
                DisplayErrorContext(&e)
            );
            GatewayError::Connection(DisplayErrorContext(&e).to_string())
        })?;
        Ok(SharedCredentialsProvider::new(ambient))
    }

    async fn connect(&self) -> Result<Client, GatewayError> {
        let region = Region::new(self.region.clone());
        let credentials = self.credentials(&region).await?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials);
        if let Some(endpoint) = &self.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Ok(Client::new(&sdk_config))
    }
}

#[async_trait]
impl InvokeModel for BedrockRuntime {
    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, GatewayError> {
        let client = self.client().await?;
        let resp = client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| GatewayError::Invocation(DisplayErrorContext(&e).to_string()))?;

        Ok(resp.body.into_inner())
    }
}

//! AWS Lambda client creation and configuration.
//!
//! Builds `aws_sdk_lambda` clients from a [`LambdaConfig`] snapshot and adapts them to
//! the [`LambdaTransport`] seam used by the invocation adapter.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_lambda::config::retry::RetryConfig;
use aws_sdk_lambda::config::{Builder as LambdaConfigBuilder, Credentials, Region};
use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types;
use aws_sdk_lambda::Client as LambdaClient;
use bytes::Bytes;
use lambda_bridge_core::{
    ClientFactory, Error, InvocationType, InvokeOutput, InvokeRequest, LambdaConfig,
    LambdaTransport, LogType, Result,
};
use std::sync::Arc;

const CREDENTIALS_PROVIDER: &str = "lambda-bridge";

/// [`LambdaTransport`] backed by the AWS SDK
#[derive(Debug, Clone)]
pub struct AwsLambdaTransport {
    client: LambdaClient,
}

impl AwsLambdaTransport {
    pub fn new(client: LambdaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LambdaTransport for AwsLambdaTransport {
    async fn invoke(&self, request: &InvokeRequest) -> Result<InvokeOutput> {
        let invocation_type = match request.invocation_type {
            InvocationType::Event => types::InvocationType::Event,
            InvocationType::RequestResponse => types::InvocationType::RequestResponse,
        };
        let log_type = match request.log_type {
            LogType::None => types::LogType::None,
        };

        let out = self
            .client
            .invoke()
            .function_name(&request.function_name)
            .payload(Blob::new(request.payload.as_bytes()))
            .log_type(log_type)
            .invocation_type(invocation_type)
            .send()
            .await
            .map_err(|err| Error::Transport {
                code: err.code().map(str::to_string),
                message: err
                    .message()
                    .map_or_else(|| DisplayErrorContext(&err).to_string(), str::to_string),
            })?;

        Ok(InvokeOutput {
            status_code: out.status_code(),
            payload: out.payload().map(|b| Bytes::copy_from_slice(b.as_ref())),
            function_error: out.function_error().map(str::to_string),
            executed_version: out.executed_version().map(str::to_string),
        })
    }
}

/// Builds SDK clients, optionally on top of a shared `SdkConfig`
///
/// Static credentials from the snapshot win. Without them the client falls back to the
/// shared config's credential chain, so [`AwsClientFactory::from_env`] is the right
/// constructor when keys come from the environment or an instance role.
#[derive(Debug, Clone, Default)]
pub struct AwsClientFactory {
    shared: Option<SdkConfig>,
}

impl AwsClientFactory {
    /// Factory without a shared config
    ///
    /// Clients only get credentials from a static `key`/`secret` pair in the snapshot;
    /// without one every request fails at signing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the standard AWS configuration chain once
    pub async fn from_env() -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            shared: Some(shared),
        }
    }

    pub fn with_shared_config(shared: SdkConfig) -> Self {
        Self {
            shared: Some(shared),
        }
    }

    /// Build a Lambda client for the given snapshot
    pub fn build_client(&self, config: &LambdaConfig) -> LambdaClient {
        let mut builder = match &self.shared {
            Some(shared) => LambdaConfigBuilder::from(shared),
            None => LambdaConfigBuilder::new().behavior_version(BehaviorVersion::latest()),
        };

        // The SDK counts the first attempt, so zero would disable requests entirely.
        let retry_config = RetryConfig::standard().with_max_attempts(config.max_retries.max(1));

        builder = builder
            .region(Region::new(config.region.clone()))
            .retry_config(retry_config);

        if let Some((key, secret)) = config.static_credentials() {
            builder = builder.credentials_provider(Credentials::new(
                key,
                secret,
                None,
                None,
                CREDENTIALS_PROVIDER,
            ));
        }
        if let Some(url) = &config.endpoint_url {
            builder = builder.endpoint_url(url);
        }

        LambdaClient::from_conf(builder.build())
    }
}

impl ClientFactory for AwsClientFactory {
    fn build(&self, config: &LambdaConfig) -> Arc<dyn LambdaTransport> {
        Arc::new(AwsLambdaTransport::new(self.build_client(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_uses_configured_region() {
        let config = LambdaConfig {
            region: "eu-west-1".to_string(),
            ..Default::default()
        };

        let client = AwsClientFactory::new().build_client(&config);
        assert_eq!(
            client.config().region().map(|r| r.as_ref().to_string()),
            Some("eu-west-1".to_string())
        );
    }

    #[test]
    fn test_client_uses_retry_count() {
        let config = LambdaConfig {
            max_retries: 7,
            ..Default::default()
        };

        let client = AwsClientFactory::new().build_client(&config);
        let retry = client.config().retry_config().cloned().unwrap();
        assert_eq!(retry.max_attempts(), 7);
    }

    #[test]
    fn test_zero_retries_still_attempts_once() {
        let config = LambdaConfig {
            max_retries: 0,
            ..Default::default()
        };

        let client = AwsClientFactory::new().build_client(&config);
        let retry = client.config().retry_config().cloned().unwrap();
        assert_eq!(retry.max_attempts(), 1);
    }

    #[test]
    fn test_static_credentials_and_endpoint_are_applied() {
        let config = LambdaConfig {
            key: "AKIDEXAMPLE".to_string(),
            secret: "shh".to_string(),
            endpoint_url: Some("http://localhost:4566".to_string()),
            ..Default::default()
        };

        let client = AwsClientFactory::new().build_client(&config);
        assert!(client.config().credentials_provider().is_some());
        assert_eq!(client.config().endpoint_url(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_no_credentials_without_key_pair() {
        let config = LambdaConfig {
            key: "AKIDEXAMPLE".to_string(),
            ..Default::default()
        };

        let client = AwsClientFactory::new().build_client(&config);
        assert!(client.config().credentials_provider().is_none());
        assert!(client.config().endpoint_url().is_none());
    }
}

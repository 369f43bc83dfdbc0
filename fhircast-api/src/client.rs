//! HTTP client for hub subscription requests

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use url::Url;

use crate::error::{Result, SubscriptionError};
use crate::params::SubscriptionParameters;
use crate::request::SubscriptionRequest;
use crate::response::{check_unsubscribe_body, SubscribeResponse};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_ACCEPT: &str = "application/json";

/// Sends subscribe and unsubscribe requests to a hub
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HubClient {
    http: reqwest::Client,
}

impl HubClient {
    /// Create a client with its own HTTP client (10 second timeout)
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http }
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Subscribe and return the notification channel address.
    ///
    /// The address is returned exactly as the hub sent it.
    pub async fn subscribe(&self, params: &SubscriptionParameters) -> Result<String> {
        let request = SubscriptionRequest::subscribe(params);
        let body = self.send(&request).await?;
        let response = SubscribeResponse::from_json(&body)?;

        tracing::info!(
            "Subscribed to topic '{}', channel at {}",
            request.topic,
            response.channel_endpoint
        );

        Ok(response.channel_endpoint)
    }

    /// Unsubscribe, releasing `channel_endpoint` when it is known.
    pub async fn unsubscribe(
        &self,
        params: &SubscriptionParameters,
        channel_endpoint: Option<&str>,
    ) -> Result<()> {
        let request = SubscriptionRequest::unsubscribe(params, channel_endpoint);
        let body = self.send(&request).await?;
        check_unsubscribe_body(&body)?;

        tracing::info!("Unsubscribed from topic '{}'", request.topic);
        Ok(())
    }

    /// POST the request and return the response body
    async fn send(&self, request: &SubscriptionRequest) -> Result<String> {
        let url = validate(request)?;
        let form_body = request.form_body();

        tracing::debug!("POST {} ({}): {}", url, request.mode, form_body);

        let mut builder = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(ACCEPT, JSON_ACCEPT)
            .body(form_body);

        if let Some(authorization) = request.authorization() {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Hub at {} answered {} with HTTP {}", url, request.mode, status);
        }

        Ok(response.text().await?)
    }
}

impl Default for HubClient {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(request: &SubscriptionRequest) -> Result<Url> {
    if request.hub_url.is_empty() {
        return Err(SubscriptionError::InvalidParameter(
            "hub url is empty".to_string(),
        ));
    }
    if request.topic.is_empty() {
        return Err(SubscriptionError::InvalidParameter(
            "topic is empty".to_string(),
        ));
    }

    let url = Url::parse(&request.hub_url).map_err(|e| {
        SubscriptionError::InvalidParameter(format!("hub url '{}': {}", request.hub_url, e))
    })?;
    if url.cannot_be_a_base() {
        return Err(SubscriptionError::InvalidParameter(format!(
            "hub url '{}' is not a hierarchical URL",
            request.hub_url
        )));
    }
    Ok(url)
}

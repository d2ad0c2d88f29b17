//! Announcing new signups on a pub/sub topic.
//!
//! Publishing is fire-and-forget: the signup is already stored when a
//! notification is sent, so a failed publish is logged and dropped.

use crate::{
    configuration::NotifierSettings,
    domain::{SignupRecord, TopicId},
};
use anyhow::Context;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

/// Announce a stored signup on a topic.
///
/// There is no way to observe whether the announcement went through.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    async fn publish(&self, topic: &TopicId, record: &SignupRecord);
}

/// Client for the HTTP API of the pub/sub backend.
#[derive(Debug)]
pub struct TopicClient {
    base_url: Url,
    http_client: Client,
    authorization_token: Secret<String>,
}

impl TopicClient {
    /// Create a new topic client. Every publish gives up after `timeout`.
    ///
    /// Topic paths are resolved relative to `base_url`, so it should end with
    /// a `/` when it has a path.
    pub fn new(
        base_url: Url,
        authorization_token: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url,
            http_client: Client::builder().timeout(timeout).build()?,
            authorization_token,
        })
    }

    /// Make a single publish attempt.
    async fn try_publish(&self, topic: &TopicId, record: &SignupRecord) -> anyhow::Result<()> {
        let url = self.base_url.join(&format!(
            "topics/{}/publish",
            urlencoding::encode(topic.as_ref())
        ))?;
        let message = record.to_json()?;
        let subject = summary(record);
        if subject.is_none() {
            tracing::warn!("Signup has no email, publishing without a subject");
        }
        let request_body = PublishRequest {
            message: &message,
            subject: subject.as_deref(),
        };

        self.http_client
            .post(url)
            .header(
                "X-Topic-Authorization",
                self.authorization_token.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for TopicClient {
    #[tracing::instrument(name = "Publish new signup", skip(self, topic, record), fields(topic = %topic))]
    async fn publish(&self, topic: &TopicId, record: &SignupRecord) {
        if let Err(e) = self.try_publish(topic, record).await {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Error publishing signup message to topic"
            );
        }
    }
}

impl TryFrom<&NotifierSettings> for TopicClient {
    type Error = anyhow::Error;

    fn try_from(config: &NotifierSettings) -> Result<Self, Self::Error> {
        let base_url = config
            .base_url()
            .context("Notifier base url is invalid")?;
        Self::new(
            base_url,
            config.authorization_token().clone(),
            config.timeout(),
        )
        .context("Failed to build the notifier's HTTP client")
    }
}

/// Short human readable line describing the signup.
fn summary(record: &SignupRecord) -> Option<String> {
    record.email().map(|email| format!("New signup: {email}"))
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct PublishRequest<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
}

/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Pub/sub topic forwarder.

use crate::forwarder::{ensure_not_empty, ForwardError, Forwarder, Headers, TopicPublisher};
use crate::observability::events;
use crate::rule::RuleDestination;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

const COMPONENT: &str = "sns_forwarder";

/// Publishes the raw body to a topic. Headers are not forwarded.
pub struct SnsForwarder {
    name: String,
    topic: String,
    client: Arc<dyn TopicPublisher>,
}

impl SnsForwarder {
    pub fn new(destination: &RuleDestination, client: Arc<dyn TopicPublisher>) -> Self {
        let forwarder = Self {
            name: destination.name.clone(),
            topic: destination.target.clone(),
            client,
        };
        info!(
            event = events::FORWARDER_CREATE,
            component = COMPONENT,
            forwarder_name = forwarder.name.as_str(),
            target = forwarder.topic.as_str(),
            "created forwarder"
        );
        forwarder
    }
}

#[async_trait]
impl Forwarder for SnsForwarder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn push(&self, body: &str, _headers: &Headers) -> Result<(), ForwardError> {
        ensure_not_empty(body)?;

        if let Err(err) = self.client.publish(&self.topic, body).await {
            error!(
                event = events::FORWARD_FAILED,
                component = COMPONENT,
                forwarder_name = self.name.as_str(),
                err = %err,
                "could not forward message"
            );
            return Err(err.into());
        }

        info!(
            event = events::FORWARD_OK,
            component = COMPONENT,
            forwarder_name = self.name.as_str(),
            "forward succeeded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SnsForwarder;
    use crate::forwarder::{BackendError, ForwardError, Forwarder, Headers, TopicPublisher};
    use crate::rule::{DestinationKind, RuleDestination};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    const TOPIC: &str = "arn:aws:sns:eu-west-1:XXXXXXXX:test-forwarder";

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<(String, String)>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl TopicPublisher for RecordingPublisher {
        async fn publish(&self, topic: &str, message: &str) -> Result<(), BackendError> {
            self.published
                .lock()
                .expect("lock should not be poisoned")
                .push((topic.to_string(), message.to_string()));
            match &self.fail_with {
                Some(message) => Err(BackendError::new(message.clone())),
                None => Ok(()),
            }
        }
    }

    fn destination() -> RuleDestination {
        RuleDestination {
            kind: DestinationKind::Sns,
            name: "sns-test".to_string(),
            target: TOPIC.to_string(),
        }
    }

    #[tokio::test]
    async fn push_publishes_raw_body_to_topic() {
        let client = Arc::new(RecordingPublisher::default());
        let forwarder = SnsForwarder::new(&destination(), client.clone());
        let mut headers = Headers::new();
        headers.insert("ignored".to_string(), json!(true));

        assert_eq!(forwarder.name(), "sns-test");
        assert!(forwarder.push("abc", &headers).await.is_ok());

        let published = client.published.lock().expect("lock should not be poisoned");
        assert_eq!(
            published.as_slice(),
            &[(TOPIC.to_string(), "abc".to_string())]
        );
    }

    #[tokio::test]
    async fn push_rejects_empty_message_without_publishing() {
        let client = Arc::new(RecordingPublisher::default());
        let forwarder = SnsForwarder::new(&destination(), client.clone());

        let result = forwarder.push("", &Headers::new()).await;

        assert!(matches!(result, Err(ForwardError::EmptyMessage)));
        assert!(client
            .published
            .lock()
            .expect("lock should not be poisoned")
            .is_empty());
    }

    #[tokio::test]
    async fn push_surfaces_publish_failure_verbatim() {
        let client = Arc::new(RecordingPublisher {
            fail_with: Some("Topic does not exist".to_string()),
            ..Default::default()
        });
        let forwarder = SnsForwarder::new(&destination(), client);

        let error = forwarder
            .push("abc", &Headers::new())
            .await
            .expect_err("publish failure should fail the push");

        assert_eq!(error.to_string(), "Topic does not exist");
    }
}

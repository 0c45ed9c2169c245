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

//! Queue forwarder.

use crate::forwarder::{ensure_not_empty, ForwardError, Forwarder, Headers, QueueSender};
use crate::observability::events;
use crate::rule::RuleDestination;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

const COMPONENT: &str = "sqs_forwarder";

/// Sends the raw body to a queue URL. Headers are not forwarded.
pub struct SqsForwarder {
    name: String,
    queue: String,
    client: Arc<dyn QueueSender>,
}

impl SqsForwarder {
    pub fn new(destination: &RuleDestination, client: Arc<dyn QueueSender>) -> Self {
        let forwarder = Self {
            name: destination.name.clone(),
            queue: destination.target.clone(),
            client,
        };
        info!(
            event = events::FORWARDER_CREATE,
            component = COMPONENT,
            forwarder_name = forwarder.name.as_str(),
            target = forwarder.queue.as_str(),
            "created forwarder"
        );
        forwarder
    }
}

#[async_trait]
impl Forwarder for SqsForwarder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn push(&self, body: &str, _headers: &Headers) -> Result<(), ForwardError> {
        ensure_not_empty(body)?;

        match self.client.send(&self.queue, body).await {
            Ok(()) => {
                info!(
                    event = events::FORWARD_OK,
                    component = COMPONENT,
                    forwarder_name = self.name.as_str(),
                    "forward succeeded"
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    event = events::FORWARD_FAILED,
                    component = COMPONENT,
                    forwarder_name = self.name.as_str(),
                    err = %err,
                    "could not forward message"
                );
                Err(err.into())
            }
        }
    }
}

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

//! Delivery of single messages to cloud backends.
//!
//! Every backend implements [`Forwarder`]. A call to [`Forwarder::push`] makes at most one
//! backend call and returns only once that call has completed, so the consumer driving it can
//! acknowledge or reject the message based on the outcome. Forwarders never retry.

mod backend;
pub mod dispatch;
mod lambda;
mod sns;
mod sqs;

pub use backend::{
    BackendClients, BackendError, FunctionInvoker, Invocation, QueueSender, TopicPublisher,
};
pub use lambda::{LambdaForwarder, Payload};
pub use sns::SnsForwarder;
pub use sqs::SqsForwarder;

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

/// Transport metadata accompanying a message body.
pub type Headers = BTreeMap<String, serde_json::Value>;

pub const EMPTY_MESSAGE_ERROR: &str = "message is empty";

#[derive(Debug, Error)]
pub enum ForwardError {
    /// The body was empty; no backend call was made.
    #[error("message is empty")]
    EmptyMessage,
    /// The header envelope could not be serialized; no backend call was made.
    #[error("could not build message payload: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The backend call failed or the backend reported an error for it.
    #[error(transparent)]
    Delivery(#[from] BackendError),
}

#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Display name configured for this forwarder.
    fn name(&self) -> &str;

    /// Delivers one message.
    async fn push(&self, body: &str, headers: &Headers) -> Result<(), ForwardError>;
}

/// Shared guard applied by every backend before any network call.
pub(crate) fn ensure_not_empty(body: &str) -> Result<(), ForwardError> {
    if body.is_empty() {
        return Err(ForwardError::EmptyMessage);
    }
    Ok(())
}

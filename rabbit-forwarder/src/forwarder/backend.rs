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

//! Backend client seams and their AWS SDK implementations.
//!
//! Forwarders take these seams as required constructor arguments; tests provide fakes.

use async_trait::async_trait;
use aws_config::SdkConfig;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a backend client, carrying the backend's own message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of a function invocation that reached the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub status_code: i32,
    /// Set when the function itself failed, handled or unhandled.
    pub function_error: Option<String>,
}

#[async_trait]
pub trait TopicPublisher: Send + Sync {
    async fn publish(&self, topic: &str, message: &str) -> Result<(), BackendError>;
}

#[async_trait]
pub trait QueueSender: Send + Sync {
    async fn send(&self, queue: &str, message: &str) -> Result<(), BackendError>;
}

#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    async fn invoke(&self, function: &str, payload: Vec<u8>) -> Result<Invocation, BackendError>;
}

#[async_trait]
impl TopicPublisher for aws_sdk_sns::Client {
    async fn publish(&self, topic: &str, message: &str) -> Result<(), BackendError> {
        aws_sdk_sns::Client::publish(self)
            .target_arn(topic)
            .message(message)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| {
                BackendError::new(aws_sdk_sns::error::DisplayErrorContext(&err).to_string())
            })
    }
}

#[async_trait]
impl QueueSender for aws_sdk_sqs::Client {
    async fn send(&self, queue: &str, message: &str) -> Result<(), BackendError> {
        self.send_message()
            .queue_url(queue)
            .message_body(message)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| {
                BackendError::new(aws_sdk_sqs::error::DisplayErrorContext(&err).to_string())
            })
    }
}

#[async_trait]
impl FunctionInvoker for aws_sdk_lambda::Client {
    async fn invoke(&self, function: &str, payload: Vec<u8>) -> Result<Invocation, BackendError> {
        let output = aws_sdk_lambda::Client::invoke(self)
            .function_name(function)
            .payload(aws_sdk_lambda::primitives::Blob::new(payload))
            .send()
            .await
            .map_err(|err| {
                BackendError::new(aws_sdk_lambda::error::DisplayErrorContext(&err).to_string())
            })?;

        Ok(Invocation {
            status_code: output.status_code(),
            function_error: output.function_error().map(str::to_string),
        })
    }
}

/// One client per backend, shared by every forwarder of that kind.
#[derive(Clone)]
pub struct BackendClients {
    pub topics: Arc<dyn TopicPublisher>,
    pub queues: Arc<dyn QueueSender>,
    pub functions: Arc<dyn FunctionInvoker>,
}

impl BackendClients {
    pub fn new(
        topics: Arc<dyn TopicPublisher>,
        queues: Arc<dyn QueueSender>,
        functions: Arc<dyn FunctionInvoker>,
    ) -> Self {
        Self {
            topics,
            queues,
            functions,
        }
    }

    /// Builds the AWS SDK clients from an already resolved SDK configuration.
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(
            Arc::new(aws_sdk_sns::Client::new(config)),
            Arc::new(aws_sdk_sqs::Client::new(config)),
            Arc::new(aws_sdk_lambda::Client::new(config)),
        )
    }
}

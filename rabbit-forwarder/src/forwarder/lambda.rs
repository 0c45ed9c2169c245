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

//! Compute-invocation forwarder.

use crate::forwarder::{
    ensure_not_empty, BackendError, ForwardError, Forwarder, FunctionInvoker, Headers,
};
use crate::observability::{events, fields};
use crate::rule::{DeliveryOptions, RuleDestination};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

const COMPONENT: &str = "lambda_forwarder";

/// Envelope sent instead of the raw body when header forwarding is enabled.
///
/// Field order is part of the wire contract: `body` is always serialized before `headers`.
#[derive(Debug, Serialize)]
pub struct Payload<'a> {
    pub body: &'a str,
    pub headers: &'a Headers,
}

pub struct LambdaForwarder {
    name: String,
    function: String,
    forward_headers: bool,
    client: Arc<dyn FunctionInvoker>,
}

impl LambdaForwarder {
    pub fn new(
        destination: &RuleDestination,
        options: &DeliveryOptions,
        client: Arc<dyn FunctionInvoker>,
    ) -> Self {
        let forwarder = Self {
            name: destination.name.clone(),
            function: destination.target.clone(),
            forward_headers: options.forward_headers,
            client,
        };
        info!(
            event = events::FORWARDER_CREATE,
            component = COMPONENT,
            forwarder_name = forwarder.name.as_str(),
            target = forwarder.function.as_str(),
            forward_headers = forwarder.forward_headers,
            "created forwarder"
        );
        forwarder
    }

    /// Builds the invocation payload: the body verbatim, or the JSON envelope when
    /// headers are forwarded.
    pub fn build_payload(&self, body: &str, headers: &Headers) -> Result<Vec<u8>, ForwardError> {
        if self.forward_headers {
            Ok(serde_json::to_vec(&Payload { body, headers })?)
        } else {
            Ok(body.as_bytes().to_vec())
        }
    }
}

#[async_trait]
impl Forwarder for LambdaForwarder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn push(&self, body: &str, headers: &Headers) -> Result<(), ForwardError> {
        ensure_not_empty(body)?;

        let payload = self.build_payload(body, headers).inspect_err(|err| {
            error!(
                event = events::FORWARD_PAYLOAD_BUILD_FAILED,
                component = COMPONENT,
                forwarder_name = self.name.as_str(),
                err = %err,
                "could not build message payload to push"
            );
        })?;

        let invocation = match self.client.invoke(&self.function, payload).await {
            Ok(invocation) => invocation,
            Err(err) => {
                error!(
                    event = events::FORWARD_FAILED,
                    component = COMPONENT,
                    forwarder_name = self.name.as_str(),
                    err = %err,
                    "could not forward message"
                );
                return Err(err.into());
            }
        };

        if let Some(function_error) = invocation.function_error {
            error!(
                event = events::FORWARD_FUNCTION_ERROR,
                component = COMPONENT,
                forwarder_name = self.name.as_str(),
                function_error = function_error.as_str(),
                status_code = invocation.status_code,
                "function reported an error"
            );
            return Err(BackendError::new(function_error).into());
        }

        info!(
            event = events::FORWARD_OK,
            component = COMPONENT,
            forwarder_name = self.name.as_str(),
            status_code = invocation.status_code,
            header_keys = fields::format_header_keys(headers).as_str(),
            "forward succeeded"
        );
        Ok(())
    }
}

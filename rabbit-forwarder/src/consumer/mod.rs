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

//! Broker-side receive loops.
//!
//! A [`Consumer`] owns its broker subscription and calls its bound forwarder once per
//! received message, waiting for each push to complete before taking the next one.

mod rabbitmq;
mod tls;

pub use rabbitmq::{amqp_headers_to_json, RabbitConsumer};
pub use tls::BrokerTls;

use crate::forwarder::Forwarder;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum ConsumeError {
    #[error(transparent)]
    Broker(#[from] lapin::Error),
    #[error("could not read TLS file {path:?}")]
    ReadTlsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("client certificate and key must be configured together")]
    IncompleteClientIdentity,
}

#[async_trait]
pub trait Consumer: Send + Sync {
    fn name(&self) -> &str;

    /// Runs the receive loop bound to `forwarder` until `stop` carries `true` or its sender
    /// is dropped. Liveness is published on `health`.
    async fn start(
        &self,
        forwarder: Arc<dyn Forwarder>,
        health: watch::Sender<bool>,
        stop: watch::Receiver<bool>,
    ) -> Result<(), ConsumeError>;
}

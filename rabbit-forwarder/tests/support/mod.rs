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

#![allow(dead_code)]

use async_trait::async_trait;
use rabbit_forwarder::{
    BackendClients, BackendError, ConsumeError, Consumer, DeliveryOptions, ForwardError,
    Forwarder, FunctionInvoker, Headers, Invocation, PairFactory, QueueSender, RuleDestination,
    RuleSource, TopicPublisher,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Once};
use tokio::sync::watch;

static INIT_LOGGING: Once = Once::new();

pub(crate) fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

pub(crate) fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Backend seams that record every call and succeed.
#[derive(Default)]
pub(crate) struct RecordingBackend {
    calls: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingBackend {
    fn record(&self, target: &str, payload: &[u8]) {
        self.calls
            .lock()
            .expect("lock should not be poisoned")
            .push((target.to_string(), payload.to_vec()));
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<u8>)> {
        self.calls
            .lock()
            .expect("lock should not be poisoned")
            .clone()
    }
}

#[async_trait]
impl TopicPublisher for RecordingBackend {
    async fn publish(&self, topic: &str, message: &str) -> Result<(), BackendError> {
        self.record(topic, message.as_bytes());
        Ok(())
    }
}

#[async_trait]
impl QueueSender for RecordingBackend {
    async fn send(&self, queue: &str, message: &str) -> Result<(), BackendError> {
        self.record(queue, message.as_bytes());
        Ok(())
    }
}

#[async_trait]
impl FunctionInvoker for RecordingBackend {
    async fn invoke(&self, function: &str, payload: Vec<u8>) -> Result<Invocation, BackendError> {
        self.record(function, &payload);
        Ok(Invocation {
            status_code: 200,
            function_error: None,
        })
    }
}

pub(crate) fn recording_clients() -> (BackendClients, Arc<RecordingBackend>) {
    let backend = Arc::new(RecordingBackend::default());
    let clients = BackendClients::new(backend.clone(), backend.clone(), backend.clone());
    (clients, backend)
}

/// Consumer that replays a fixed list of messages through its forwarder, then returns.
pub(crate) struct ReplayConsumer {
    name: String,
    messages: Vec<String>,
    outcomes: Mutex<Vec<bool>>,
}

impl ReplayConsumer {
    pub(crate) fn new(name: &str, messages: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            messages: messages.iter().map(|message| message.to_string()).collect(),
            outcomes: Mutex::new(Vec::new()),
        }
    }

    /// `true` for every acked message, `false` for every rejected one.
    pub(crate) fn outcomes(&self) -> Vec<bool> {
        self.outcomes
            .lock()
            .expect("lock should not be poisoned")
            .clone()
    }
}

#[async_trait]
impl Consumer for ReplayConsumer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(
        &self,
        forwarder: Arc<dyn Forwarder>,
        health: watch::Sender<bool>,
        _stop: watch::Receiver<bool>,
    ) -> Result<(), ConsumeError> {
        let _ = health.send(true);
        for message in &self.messages {
            let pushed = forwarder.push(message, &Headers::new()).await.is_ok();
            self.outcomes
                .lock()
                .expect("lock should not be poisoned")
                .push(pushed);
        }
        let _ = health.send(false);
        Ok(())
    }
}

/// Factory returning fixed-name fakes, keyed on nothing but the rule names.
pub(crate) struct NamedFakeFactory;

struct NamedForwarder {
    name: String,
}

#[async_trait]
impl Forwarder for NamedForwarder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn push(&self, _body: &str, _headers: &Headers) -> Result<(), ForwardError> {
        Ok(())
    }
}

impl PairFactory for NamedFakeFactory {
    fn create_consumer(&self, source: &RuleSource) -> Option<Arc<dyn Consumer>> {
        Some(Arc::new(ReplayConsumer::new(&source.name, &[])))
    }

    fn create_forwarder(
        &self,
        destination: &RuleDestination,
        _options: &DeliveryOptions,
    ) -> Option<Arc<dyn Forwarder>> {
        Some(Arc::new(NamedForwarder {
            name: destination.name.clone(),
        }))
    }
}

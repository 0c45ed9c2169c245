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

mod support;

use rabbit_forwarder::forwarder::dispatch::create_forwarder;
use rabbit_forwarder::{
    BackendClients, BoundPair, Consumer, DeliveryOptions, Forwarder, MappingConfig,
    MappingLoader, PairFactory, RuleDestination, RuleSource, Supervisor,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use support::{fixture, init_logging, recording_clients, ReplayConsumer};

/// Real dispatch for forwarders, replaying consumers in place of the broker.
struct ReplayFactory {
    clients: BackendClients,
    messages: Vec<&'static str>,
    consumers: Mutex<HashMap<String, Arc<ReplayConsumer>>>,
}

impl ReplayFactory {
    fn new(clients: BackendClients, messages: &[&'static str]) -> Self {
        Self {
            clients,
            messages: messages.to_vec(),
            consumers: Mutex::new(HashMap::new()),
        }
    }

    fn consumer(&self, name: &str) -> Arc<ReplayConsumer> {
        self.consumers
            .lock()
            .expect("lock should not be poisoned")
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("no consumer named {name}"))
    }
}

impl PairFactory for ReplayFactory {
    fn create_consumer(&self, source: &RuleSource) -> Option<Arc<dyn Consumer>> {
        let consumer = Arc::new(ReplayConsumer::new(&source.name, &self.messages));
        self.consumers
            .lock()
            .expect("lock should not be poisoned")
            .insert(source.name.clone(), consumer.clone());
        Some(consumer)
    }

    fn create_forwarder(
        &self,
        destination: &RuleDestination,
        options: &DeliveryOptions,
    ) -> Option<Arc<dyn Forwarder>> {
        Some(create_forwarder(destination, options, &self.clients))
    }
}

fn load_pairs(factory: Arc<ReplayFactory>) -> Vec<BoundPair> {
    MappingLoader::new(
        MappingConfig::from_file(fixture("multi_destination.json")),
        factory,
    )
    .load()
    .unwrap_or_else(|err| panic!("multi destination mapping should load: {err}"))
}

#[tokio::test(flavor = "multi_thread")]
async fn every_pair_delivers_its_messages_to_its_own_backend() {
    init_logging();
    let (clients, backend) = recording_clients();
    let factory = Arc::new(ReplayFactory::new(clients, &["abc", "", "def"]));

    let supervisor = Supervisor::start(load_pairs(factory.clone()));
    let exits = supervisor.stop().await;

    assert!(exits.iter().all(|exit| exit.result.is_ok()));
    for name in ["orders-rabbit", "refunds-rabbit", "audit-rabbit"] {
        assert_eq!(factory.consumer(name).outcomes(), vec![true, false, true]);
    }

    let mut calls = backend.calls();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            (
                "arn:aws:sns:eu-west-1:XXXXXXXX:orders".to_string(),
                b"abc".to_vec()
            ),
            (
                "arn:aws:sns:eu-west-1:XXXXXXXX:orders".to_string(),
                b"def".to_vec()
            ),
            (
                "audit-writer".to_string(),
                br#"{"body":"abc","headers":{}}"#.to_vec()
            ),
            (
                "audit-writer".to_string(),
                br#"{"body":"def","headers":{}}"#.to_vec()
            ),
            (
                "https://sqs.eu-west-1.amazonaws.com/XXXXXXXX/refunds".to_string(),
                b"abc".to_vec()
            ),
            (
                "https://sqs.eu-west-1.amazonaws.com/XXXXXXXX/refunds".to_string(),
                b"def".to_vec()
            ),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn stopped_supervisor_reports_every_pair() {
    init_logging();
    let (clients, _backend) = recording_clients();
    let factory = Arc::new(ReplayFactory::new(clients, &[]));

    let supervisor = Supervisor::start(load_pairs(factory));
    let health = supervisor.health();
    let exits = supervisor.stop().await;

    assert_eq!(health.len(), 3);
    assert_eq!(
        exits
            .iter()
            .map(|exit| exit.consumer_name.as_str())
            .collect::<Vec<_>>(),
        vec!["orders-rabbit", "refunds-rabbit", "audit-rabbit"]
    );
}

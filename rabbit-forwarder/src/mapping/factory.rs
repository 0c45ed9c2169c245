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

use crate::consumer::{BrokerTls, Consumer, RabbitConsumer};
use crate::forwarder::dispatch::create_forwarder;
use crate::forwarder::{BackendClients, Forwarder};
use crate::rule::{DeliveryOptions, RuleDestination, RuleSource, SourceKind};
use std::sync::Arc;

/// Builds the collaborators for one rule. `None` means the kind is not supported by this
/// factory and aborts the load.
pub trait PairFactory: Send + Sync {
    fn create_consumer(&self, source: &RuleSource) -> Option<Arc<dyn Consumer>>;

    fn create_forwarder(
        &self,
        destination: &RuleDestination,
        options: &DeliveryOptions,
    ) -> Option<Arc<dyn Forwarder>>;
}

/// RabbitMQ consumers feeding AWS forwarders.
pub struct DefaultPairFactory {
    clients: BackendClients,
    broker_tls: BrokerTls,
}

impl DefaultPairFactory {
    pub fn new(clients: BackendClients) -> Self {
        Self {
            clients,
            broker_tls: BrokerTls::default(),
        }
    }

    /// TLS material handed to every RabbitMQ consumer this factory creates.
    pub fn with_broker_tls(mut self, broker_tls: BrokerTls) -> Self {
        self.broker_tls = broker_tls;
        self
    }
}

impl PairFactory for DefaultPairFactory {
    fn create_consumer(&self, source: &RuleSource) -> Option<Arc<dyn Consumer>> {
        match source.kind {
            SourceKind::RabbitMq => Some(Arc::new(
                RabbitConsumer::new(source).with_tls(self.broker_tls.clone()),
            )),
        }
    }

    fn create_forwarder(
        &self,
        destination: &RuleDestination,
        options: &DeliveryOptions,
    ) -> Option<Arc<dyn Forwarder>> {
        Some(create_forwarder(destination, options, &self.clients))
    }
}

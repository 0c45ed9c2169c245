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

//! Single dispatch point from a destination kind to its forwarder.

use crate::forwarder::{BackendClients, Forwarder, LambdaForwarder, SnsForwarder, SqsForwarder};
use crate::rule::{DeliveryOptions, DestinationKind, RuleDestination};
use std::sync::Arc;

/// Builds the forwarder for `destination`. Only the Lambda backend reads `options`.
pub fn create_forwarder(
    destination: &RuleDestination,
    options: &DeliveryOptions,
    clients: &BackendClients,
) -> Arc<dyn Forwarder> {
    match destination.kind {
        DestinationKind::Sns => Arc::new(SnsForwarder::new(destination, clients.topics.clone())),
        DestinationKind::Sqs => Arc::new(SqsForwarder::new(destination, clients.queues.clone())),
        DestinationKind::Lambda => Arc::new(LambdaForwarder::new(
            destination,
            options,
            clients.functions.clone(),
        )),
    }
}

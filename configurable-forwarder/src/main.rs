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

mod config;

use crate::config::ForwarderArgs;
use clap::Parser;
use rabbit_forwarder::{BackendClients, DefaultPairFactory, MappingLoader, Supervisor};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt::try_init();

    info!("Started configurable-forwarder");

    let args = ForwarderArgs::parse();

    let sdk_config = aws_config::from_env().load().await;
    let clients = BackendClients::from_sdk_config(&sdk_config);

    let loader = MappingLoader::new(
        args.mapping_config(),
        Arc::new(DefaultPairFactory::new(clients).with_broker_tls(args.broker_tls())),
    );
    let pairs = loader.load()?;
    if pairs.is_empty() {
        warn!("Mapping contains no rules; nothing to forward");
    }

    let supervisor = Supervisor::start(pairs);

    let health_interval = Duration::from_secs(args.health_interval.max(1));
    let mut health_ticker =
        tokio::time::interval_at(tokio::time::Instant::now() + health_interval, health_interval);
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    error!("Unable to listen for shutdown signal: {err}");
                }
                break;
            }
            _ = health_ticker.tick() => {
                for pair in supervisor.health().into_iter().filter(|pair| !pair.healthy) {
                    warn!(
                        consumer_name = pair.consumer_name.as_str(),
                        forwarder_name = pair.forwarder_name.as_str(),
                        "Pair is not healthy"
                    );
                }
            }
        }
    }

    info!("Shutting down configurable-forwarder");
    let failed = supervisor
        .stop()
        .await
        .into_iter()
        .filter(|exit| exit.result.is_err())
        .count();
    if failed > 0 {
        return Err(format!("{failed} consumer(s) exited with an error").into());
    }

    Ok(())
}

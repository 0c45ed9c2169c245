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

//! Starts every bound pair on its own task and stops them together.

use crate::consumer::ConsumeError;
use crate::mapping::BoundPair;
use crate::observability::events;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

const COMPONENT: &str = "supervisor";

/// Last liveness value a consumer reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairHealth {
    pub consumer_name: String,
    pub forwarder_name: String,
    pub healthy: bool,
}

#[derive(Debug, Error)]
pub enum PairExitError {
    #[error(transparent)]
    Consume(#[from] ConsumeError),
    #[error("consumer task aborted: {0}")]
    Join(#[from] JoinError),
}

/// How one pair's consumer ended.
#[derive(Debug)]
pub struct PairExit {
    pub consumer_name: String,
    pub result: Result<(), PairExitError>,
}

struct RunningPair {
    consumer_name: String,
    forwarder_name: String,
    health: watch::Receiver<bool>,
    handle: JoinHandle<Result<(), ConsumeError>>,
}

pub struct Supervisor {
    stop: watch::Sender<bool>,
    pairs: Vec<RunningPair>,
}

impl Supervisor {
    /// Spawns one task per pair. Must be called within a tokio runtime.
    pub fn start(pairs: Vec<BoundPair>) -> Self {
        let (stop, stop_receiver) = watch::channel(false);

        let pairs = pairs
            .into_iter()
            .map(|pair| {
                let consumer_name = pair.consumer.name().to_string();
                let forwarder_name = pair.forwarder.name().to_string();
                let (health_sender, health) = watch::channel(false);
                let stop_receiver = stop_receiver.clone();

                info!(
                    event = events::PAIR_START,
                    component = COMPONENT,
                    consumer_name = consumer_name.as_str(),
                    forwarder_name = forwarder_name.as_str(),
                    "starting consumer - forwarder pair"
                );
                let handle = tokio::spawn(async move {
                    pair.consumer
                        .start(pair.forwarder, health_sender, stop_receiver)
                        .await
                });

                RunningPair {
                    consumer_name,
                    forwarder_name,
                    health,
                    handle,
                }
            })
            .collect();

        Self { stop, pairs }
    }

    pub fn health(&self) -> Vec<PairHealth> {
        self.pairs
            .iter()
            .map(|pair| PairHealth {
                consumer_name: pair.consumer_name.clone(),
                forwarder_name: pair.forwarder_name.clone(),
                healthy: *pair.health.borrow(),
            })
            .collect()
    }

    /// True while every consumer reports itself healthy.
    pub fn is_healthy(&self) -> bool {
        self.pairs.iter().all(|pair| *pair.health.borrow())
    }

    /// Signals every consumer to stop and waits for all of them to exit.
    pub async fn stop(self) -> Vec<PairExit> {
        info!(
            event = events::SUPERVISOR_STOP,
            component = COMPONENT,
            pair_count = self.pairs.len(),
            "stopping all pairs"
        );
        let _ = self.stop.send(true);

        let mut exits = Vec::with_capacity(self.pairs.len());
        for pair in self.pairs {
            let result = match pair.handle.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(err)) => Err(PairExitError::from(err)),
                Err(err) => Err(PairExitError::from(err)),
            };

            match &result {
                Ok(()) => info!(
                    event = events::PAIR_EXITED,
                    component = COMPONENT,
                    consumer_name = pair.consumer_name.as_str(),
                    "consumer exited"
                ),
                Err(err) => error!(
                    event = events::PAIR_FAILED,
                    component = COMPONENT,
                    consumer_name = pair.consumer_name.as_str(),
                    err = %err,
                    "consumer exited with error"
                ),
            }

            exits.push(PairExit {
                consumer_name: pair.consumer_name,
                result,
            });
        }
        exits
    }
}

#[cfg(test)]
mod tests {
    use super::{PairExitError, Supervisor};
    use crate::consumer::{ConsumeError, Consumer};
    use crate::forwarder::{ForwardError, Forwarder, Headers};
    use crate::mapping::BoundPair;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::watch;

    struct NoopForwarder;

    #[async_trait]
    impl Forwarder for NoopForwarder {
        fn name(&self) -> &str {
            "noop-forwarder"
        }

        async fn push(&self, _body: &str, _headers: &Headers) -> Result<(), ForwardError> {
            Ok(())
        }
    }

    /// Pushes one message, reports healthy and idles until stopped.
    struct IdleConsumer {
        name: &'static str,
    }

    #[async_trait]
    impl Consumer for IdleConsumer {
        fn name(&self) -> &str {
            self.name
        }

        async fn start(
            &self,
            forwarder: Arc<dyn Forwarder>,
            health: watch::Sender<bool>,
            mut stop: watch::Receiver<bool>,
        ) -> Result<(), ConsumeError> {
            forwarder
                .push("hello", &Headers::new())
                .await
                .expect("noop push should succeed");
            let _ = health.send(true);
            while !*stop.borrow() {
                if stop.changed().await.is_err() {
                    break;
                }
            }
            let _ = health.send(false);
            Ok(())
        }
    }

    struct PanickingConsumer;

    #[async_trait]
    impl Consumer for PanickingConsumer {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn start(
            &self,
            _forwarder: Arc<dyn Forwarder>,
            _health: watch::Sender<bool>,
            _stop: watch::Receiver<bool>,
        ) -> Result<(), ConsumeError> {
            panic!("consumer blew up");
        }
    }

    fn pair(consumer: Arc<dyn Consumer>) -> BoundPair {
        BoundPair::new(consumer, Arc::new(NoopForwarder))
    }

    async fn wait_until_healthy(supervisor: &Supervisor) {
        for _ in 0..100 {
            if supervisor.is_healthy() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("pairs never became healthy");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn supervisor_reports_health_and_stops_all_pairs() {
        let supervisor = Supervisor::start(vec![
            pair(Arc::new(IdleConsumer { name: "first" })),
            pair(Arc::new(IdleConsumer { name: "second" })),
        ]);

        wait_until_healthy(&supervisor).await;
        let health = supervisor.health();
        assert_eq!(health.len(), 2);
        assert_eq!(health[0].consumer_name, "first");
        assert_eq!(health[1].forwarder_name, "noop-forwarder");

        let exits = supervisor.stop().await;

        assert_eq!(exits.len(), 2);
        assert!(exits.iter().all(|exit| exit.result.is_ok()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn supervisor_reports_panicked_consumer_without_propagating() {
        let supervisor = Supervisor::start(vec![
            pair(Arc::new(PanickingConsumer)),
            pair(Arc::new(IdleConsumer { name: "survivor" })),
        ]);

        let exits = supervisor.stop().await;

        assert!(matches!(exits[0].result, Err(PairExitError::Join(_))));
        assert_eq!(exits[1].consumer_name, "survivor");
        assert!(exits[1].result.is_ok());
    }
}

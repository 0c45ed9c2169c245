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

//! RabbitMQ consumer built on `lapin`.

use crate::consumer::{BrokerTls, ConsumeError, Consumer};
use crate::forwarder::{Forwarder, Headers};
use crate::observability::events;
use crate::rule::RuleSource;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use lapin::acker::Acker;
use lapin::message::Delivery;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicQosOptions, BasicRejectOptions,
    ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions,
};
use lapin::types::{AMQPValue, FieldTable};
use lapin::{Channel, Connection, ConnectionProperties, ExchangeKind};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

const COMPONENT: &str = "rabbitmq_consumer";
const DEFAULT_EXCHANGE_KIND: &str = "topic";
const CLOSE_REPLY_CODE: u16 = 200;
const CLOSE_REPLY_TEXT: &str = "consumer stopped";
// One unacknowledged delivery at a time, matching the sequential push.
const PREFETCH_COUNT: u16 = 1;

/// Broker-side settlement of a single delivery.
#[async_trait]
trait Settle: Send + Sync {
    async fn ack(&self) -> Result<(), lapin::Error>;

    async fn reject(&self, requeue: bool) -> Result<(), lapin::Error>;
}

#[async_trait]
impl Settle for Acker {
    async fn ack(&self) -> Result<(), lapin::Error> {
        Acker::ack(self, BasicAckOptions::default()).await?;
        Ok(())
    }

    async fn reject(&self, requeue: bool) -> Result<(), lapin::Error> {
        Acker::reject(self, BasicRejectOptions { requeue }).await?;
        Ok(())
    }
}

/// A received message detached from the channel it arrived on.
struct Inbound<S> {
    delivery_tag: u64,
    body: Vec<u8>,
    headers: Headers,
    settle: S,
}

impl From<Delivery> for Inbound<Acker> {
    fn from(delivery: Delivery) -> Self {
        let headers = delivery
            .properties
            .headers()
            .as_ref()
            .map(amqp_headers_to_json)
            .unwrap_or_default();
        Self {
            delivery_tag: delivery.delivery_tag,
            body: delivery.data,
            headers,
            settle: delivery.acker,
        }
    }
}

/// Consumes one queue bound to one exchange and hands every delivery to a forwarder.
///
/// Successful pushes are acked; failed pushes are rejected without requeue.
pub struct RabbitConsumer {
    name: String,
    connection_url: String,
    exchange: String,
    exchange_type: String,
    queue: String,
    binding_keys: Vec<String>,
    tls: BrokerTls,
}

impl RabbitConsumer {
    pub fn new(source: &RuleSource) -> Self {
        info!(
            event = events::CONSUMER_CREATE,
            component = COMPONENT,
            consumer_name = source.name.as_str(),
            consumer_type = source.kind.as_str(),
            "created consumer"
        );
        Self {
            name: source.name.clone(),
            connection_url: source.connection_url.clone(),
            exchange: source.exchange.clone(),
            exchange_type: source.exchange_type.clone(),
            queue: source.queue.clone(),
            binding_keys: source
                .binding_keys()
                .into_iter()
                .map(str::to_string)
                .collect(),
            tls: BrokerTls::default(),
        }
    }

    /// Connects with the given CA chain and client identity.
    pub fn with_tls(mut self, tls: BrokerTls) -> Self {
        self.tls = tls;
        self
    }

    fn exchange_kind(&self) -> ExchangeKind {
        match self.exchange_type.as_str() {
            "" | DEFAULT_EXCHANGE_KIND => ExchangeKind::Topic,
            "direct" => ExchangeKind::Direct,
            "fanout" => ExchangeKind::Fanout,
            "headers" => ExchangeKind::Headers,
            other => ExchangeKind::Custom(other.to_string()),
        }
    }

    async fn connect(&self) -> Result<Connection, ConsumeError> {
        let tls_config = self.tls.to_tls_config().await?;
        let connection = Connection::connect_with_config(
            &self.connection_url,
            ConnectionProperties::default(),
            tls_config,
        )
        .await?;
        Ok(connection)
    }

    async fn declare_topology(&self, channel: &Channel) -> Result<(), ConsumeError> {
        let durable_exchange = ExchangeDeclareOptions {
            durable: true,
            ..Default::default()
        };
        channel
            .exchange_declare(
                &self.exchange,
                self.exchange_kind(),
                durable_exchange,
                FieldTable::default(),
            )
            .await?;

        let durable_queue = QueueDeclareOptions {
            durable: true,
            ..Default::default()
        };
        channel
            .queue_declare(&self.queue, durable_queue, FieldTable::default())
            .await?;

        for routing_key in &self.binding_keys {
            channel
                .queue_bind(
                    &self.queue,
                    &self.exchange,
                    routing_key,
                    QueueBindOptions::default(),
                    FieldTable::default(),
                )
                .await?;
        }

        debug!(
            event = events::CONSUMER_TOPOLOGY_DECLARED,
            component = COMPONENT,
            consumer_name = self.name.as_str(),
            exchange = self.exchange.as_str(),
            queue = self.queue.as_str(),
            binding_keys = self.binding_keys.join(",").as_str(),
            "declared exchange, queue and bindings"
        );
        Ok(())
    }

    /// Invalid UTF-8 sequences are replaced, and the replacement is logged.
    fn decode_body<'a>(&self, delivery_tag: u64, data: &'a [u8]) -> Cow<'a, str> {
        let body = String::from_utf8_lossy(data);
        if let Cow::Owned(_) = body {
            warn!(
                event = events::CONSUMER_BODY_NOT_UTF8,
                component = COMPONENT,
                consumer_name = self.name.as_str(),
                delivery_tag,
                "message body is not valid UTF-8, invalid bytes were replaced"
            );
        }
        body
    }

    async fn forward_delivery<S: Settle>(
        &self,
        forwarder: &dyn Forwarder,
        delivery: Inbound<S>,
    ) -> Result<(), ConsumeError> {
        let body = self.decode_body(delivery.delivery_tag, &delivery.body);

        match forwarder.push(&body, &delivery.headers).await {
            Ok(()) => {
                delivery.settle.ack().await?;
                debug!(
                    event = events::CONSUMER_DELIVERY_ACK,
                    component = COMPONENT,
                    consumer_name = self.name.as_str(),
                    forwarder_name = forwarder.name(),
                    delivery_tag = delivery.delivery_tag,
                    "message forwarded and acknowledged"
                );
            }
            Err(err) => {
                delivery.settle.reject(false).await?;
                warn!(
                    event = events::CONSUMER_DELIVERY_REJECT,
                    component = COMPONENT,
                    consumer_name = self.name.as_str(),
                    forwarder_name = forwarder.name(),
                    delivery_tag = delivery.delivery_tag,
                    err = %err,
                    "message rejected"
                );
            }
        }
        Ok(())
    }

    /// Forwards deliveries one at a time until `stop` carries `true`, its sender is
    /// dropped, or the stream ends.
    async fn forward_until_stopped<D, S>(
        &self,
        mut deliveries: D,
        forwarder: &dyn Forwarder,
        stop: &mut watch::Receiver<bool>,
    ) -> Result<(), ConsumeError>
    where
        D: Stream<Item = Result<Inbound<S>, lapin::Error>> + Unpin,
        S: Settle,
    {
        if *stop.borrow_and_update() {
            return Ok(());
        }

        loop {
            tokio::select! {
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow_and_update() {
                        return Ok(());
                    }
                }
                delivery = deliveries.next() => match delivery {
                    Some(Ok(delivery)) => self.forward_delivery(forwarder, delivery).await?,
                    Some(Err(err)) => return Err(err.into()),
                    None => return Ok(()),
                },
            }
        }
    }

    async fn consume(
        &self,
        channel: &Channel,
        forwarder: &dyn Forwarder,
        health: &watch::Sender<bool>,
        stop: &mut watch::Receiver<bool>,
    ) -> Result<(), ConsumeError> {
        self.declare_topology(channel).await?;
        channel
            .basic_qos(PREFETCH_COUNT, BasicQosOptions::default())
            .await?;
        let deliveries = channel
            .basic_consume(
                &self.queue,
                &self.name,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        let _ = health.send(true);
        info!(
            event = events::CONSUMER_STARTED,
            component = COMPONENT,
            consumer_name = self.name.as_str(),
            forwarder_name = forwarder.name(),
            "consuming"
        );

        let deliveries = deliveries.map(|delivery| delivery.map(Inbound::<Acker>::from));
        self.forward_until_stopped(deliveries, forwarder, stop)
            .await
    }

    async fn close_connection(&self, connection: &Connection) {
        if let Err(err) = connection.close(CLOSE_REPLY_CODE, CLOSE_REPLY_TEXT).await {
            debug!(consumer_name = self.name.as_str(), err = %err, "connection close failed");
        }
    }
}

#[async_trait]
impl Consumer for RabbitConsumer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(
        &self,
        forwarder: Arc<dyn Forwarder>,
        health: watch::Sender<bool>,
        mut stop: watch::Receiver<bool>,
    ) -> Result<(), ConsumeError> {
        let connection = match self.connect().await {
            Ok(connection) => connection,
            Err(err) => {
                error!(
                    event = events::CONSUMER_CONNECT_FAILED,
                    component = COMPONENT,
                    consumer_name = self.name.as_str(),
                    tls = !self.tls.is_empty(),
                    err = %err,
                    "could not connect to broker"
                );
                let _ = health.send(false);
                return Err(err);
            }
        };

        let channel = match connection.create_channel().await {
            Ok(channel) => channel,
            Err(err) => {
                error!(
                    event = events::CONSUMER_CHANNEL_FAILED,
                    component = COMPONENT,
                    consumer_name = self.name.as_str(),
                    err = %err,
                    "could not open channel"
                );
                let _ = health.send(false);
                self.close_connection(&connection).await;
                return Err(err.into());
            }
        };

        let result = self
            .consume(&channel, forwarder.as_ref(), &health, &mut stop)
            .await;
        let _ = health.send(false);

        // Either side may already have been closed by the broker.
        if let Err(err) = channel.close(CLOSE_REPLY_CODE, CLOSE_REPLY_TEXT).await {
            debug!(consumer_name = self.name.as_str(), err = %err, "channel close failed");
        }
        self.close_connection(&connection).await;

        match &result {
            Ok(()) => info!(
                event = events::CONSUMER_STOPPED,
                component = COMPONENT,
                consumer_name = self.name.as_str(),
                "consumer stopped"
            ),
            Err(err) => error!(
                event = events::CONSUMER_FAILED,
                component = COMPONENT,
                consumer_name = self.name.as_str(),
                forwarder_name = forwarder.name(),
                err = %err,
                "consumer stopped with error"
            ),
        }
        result
    }
}

/// Converts AMQP message headers into JSON values for forwarding.
pub fn amqp_headers_to_json(table: &FieldTable) -> Headers {
    table
        .inner()
        .iter()
        .map(|(key, value)| (key.as_str().to_string(), amqp_value_to_json(value)))
        .collect()
}

fn amqp_value_to_json(value: &AMQPValue) -> Value {
    match value {
        AMQPValue::Boolean(v) => Value::from(*v),
        AMQPValue::ShortShortInt(v) => Value::from(*v),
        AMQPValue::ShortShortUInt(v) => Value::from(*v),
        AMQPValue::ShortInt(v) => Value::from(*v),
        AMQPValue::ShortUInt(v) => Value::from(*v),
        AMQPValue::LongInt(v) => Value::from(*v),
        AMQPValue::LongUInt(v) => Value::from(*v),
        AMQPValue::LongLongInt(v) => Value::from(*v),
        AMQPValue::Timestamp(v) => Value::from(*v),
        AMQPValue::Float(v) => Value::from(f64::from(*v)),
        AMQPValue::Double(v) => Value::from(*v),
        AMQPValue::ShortString(v) => Value::from(v.as_str()),
        AMQPValue::LongString(v) => {
            Value::from(String::from_utf8_lossy(v.as_bytes()).into_owned())
        }
        AMQPValue::FieldArray(values) => {
            Value::Array(values.as_slice().iter().map(amqp_value_to_json).collect())
        }
        AMQPValue::FieldTable(table) => {
            Value::Object(amqp_headers_to_json(table).into_iter().collect())
        }
        AMQPValue::ByteArray(bytes) => Value::Array(
            bytes
                .as_slice()
                .iter()
                .map(|byte| Value::from(*byte))
                .collect(),
        ),
        _ => Value::Null,
    }
}

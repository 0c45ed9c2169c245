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

//! Typed routing rules.
//!
//! A mapping document is a JSON array of [`ForwardingRule`]s. Source and destination kinds
//! are closed enums, so an unrecognized `type` tag is rejected while the document is parsed
//! instead of surfacing later as a missing consumer or forwarder.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// An unrecognized `type` tag on a rule source or destination.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {side} type `{tag}`")]
pub struct UnknownKindError {
    pub side: &'static str,
    pub tag: String,
}

/// Broker kinds a rule can consume from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SourceKind {
    RabbitMq,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::RabbitMq => "RabbitMQ",
        }
    }
}

impl FromStr for SourceKind {
    type Err = UnknownKindError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "RabbitMQ" => Ok(SourceKind::RabbitMq),
            other => Err(UnknownKindError {
                side: "source",
                tag: other.to_string(),
            }),
        }
    }
}

/// Cloud backends a rule can deliver to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DestinationKind {
    /// Pub/sub topic publish.
    Sns,
    /// Queue send.
    Sqs,
    /// Compute-function invocation.
    Lambda,
}

impl DestinationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationKind::Sns => "SNS",
            DestinationKind::Sqs => "SQS",
            DestinationKind::Lambda => "Lambda",
        }
    }
}

impl FromStr for DestinationKind {
    type Err = UnknownKindError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "SNS" => Ok(DestinationKind::Sns),
            "SQS" => Ok(DestinationKind::Sqs),
            "Lambda" => Ok(DestinationKind::Lambda),
            other => Err(UnknownKindError {
                side: "destination",
                tag: other.to_string(),
            }),
        }
    }
}

macro_rules! string_tag_conversions {
    ($kind:ty) => {
        impl TryFrom<String> for $kind {
            type Error = UnknownKindError;

            fn try_from(tag: String) -> Result<Self, Self::Error> {
                tag.parse()
            }
        }

        impl From<$kind> for String {
            fn from(kind: $kind) -> Self {
                kind.as_str().to_string()
            }
        }

        impl Display for $kind {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_tag_conversions!(SourceKind);
string_tag_conversions!(DestinationKind);

/// Broker-side origin of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSource {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub name: String,
    #[serde(rename = "connection", default)]
    pub connection_url: String,
    #[serde(rename = "topic", default)]
    pub exchange: String,
    #[serde(rename = "exchangeType", default)]
    pub exchange_type: String,
    #[serde(default)]
    pub queue: String,
    #[serde(rename = "routing", default)]
    pub routing_key: String,
    #[serde(rename = "routingKeys", default)]
    pub routing_keys: Vec<String>,
}

impl RuleSource {
    /// Keys the queue is bound with: every entry of `routingKeys` when present, else `routing`.
    pub fn binding_keys(&self) -> Vec<&str> {
        if self.routing_keys.is_empty() {
            vec![self.routing_key.as_str()]
        } else {
            self.routing_keys.iter().map(String::as_str).collect()
        }
    }
}

/// Cloud-side target of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDestination {
    #[serde(rename = "type")]
    pub kind: DestinationKind,
    pub name: String,
    pub target: String,
}

/// Per-rule delivery settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOptions {
    /// Wrap the body and transport headers in a JSON envelope. Only the Lambda backend uses it.
    #[serde(rename = "forwardHeaders", default)]
    pub forward_headers: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardingRule {
    pub source: RuleSource,
    pub destination: RuleDestination,
    #[serde(default)]
    pub options: DeliveryOptions,
}

/// Parses a mapping document into its rules, preserving document order.
pub fn parse_rules(document: &[u8]) -> Result<Vec<ForwardingRule>, serde_json::Error> {
    serde_json::from_slice(document)
}

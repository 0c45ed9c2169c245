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

//! Resolution of a mapping document into consumer/forwarder pairs.
//!
//! Loading is all or nothing: a missing document, a malformed document or a rule that cannot
//! be resolved aborts the whole load and no pair is returned.

mod factory;
mod loader;

pub use factory::{DefaultPairFactory, PairFactory};
pub use loader::MappingLoader;

use crate::consumer::Consumer;
use crate::forwarder::Forwarder;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Where the mapping document comes from. A file takes precedence over inline JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingConfig {
    pub mapping_file: Option<PathBuf>,
    pub mapping_json: Option<String>,
}

impl MappingConfig {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            mapping_file: Some(path.into()),
            mapping_json: None,
        }
    }

    pub fn from_json(document: impl Into<String>) -> Self {
        Self {
            mapping_file: None,
            mapping_json: Some(document.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("must provide either a mapping file or mapping json")]
    MissingConfiguration,
    #[error("could not read mapping file {path:?}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse mapping document: {0}")]
    Deserialization(#[from] serde_json::Error),
    #[error("rule {index} has a source or destination with an empty name")]
    EmptyName { index: usize },
    #[error("rule {index} references unsupported type `{kind}`")]
    UnknownType { index: usize, kind: String },
}

/// A consumer and the forwarder it delivers to, ready to be started.
#[derive(Clone)]
pub struct BoundPair {
    pub consumer: Arc<dyn Consumer>,
    pub forwarder: Arc<dyn Forwarder>,
}

impl BoundPair {
    pub fn new(consumer: Arc<dyn Consumer>, forwarder: Arc<dyn Forwarder>) -> Self {
        Self {
            consumer,
            forwarder,
        }
    }
}

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

use crate::mapping::{BoundPair, LoadError, MappingConfig, PairFactory};
use crate::observability::events;
use crate::rule::{parse_rules, ForwardingRule};
use std::sync::Arc;
use tracing::{error, info};

const COMPONENT: &str = "mapping_loader";

pub struct MappingLoader {
    config: MappingConfig,
    factory: Arc<dyn PairFactory>,
}

impl MappingLoader {
    pub fn new(config: MappingConfig, factory: Arc<dyn PairFactory>) -> Self {
        Self { config, factory }
    }

    /// Loads every rule of the configured document and resolves it into a [`BoundPair`],
    /// in document order.
    pub fn load(&self) -> Result<Vec<BoundPair>, LoadError> {
        self.load_pairs().inspect_err(|err| {
            error!(
                event = events::MAPPING_LOAD_FAILED,
                component = COMPONENT,
                err = %err,
                "could not load consumer - forwarder pairs"
            );
        })
    }

    fn load_pairs(&self) -> Result<Vec<BoundPair>, LoadError> {
        let document = self.load_document()?;
        let rules = parse_rules(&document)?;

        info!(
            event = events::MAPPING_LOAD_START,
            component = COMPONENT,
            rule_count = rules.len(),
            "loading consumer - forwarder pairs"
        );

        let pairs = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| self.bind(index, rule))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            event = events::MAPPING_LOAD_OK,
            component = COMPONENT,
            rule_count = pairs.len(),
            "loaded consumer - forwarder pairs"
        );
        Ok(pairs)
    }

    fn bind(&self, index: usize, rule: &ForwardingRule) -> Result<BoundPair, LoadError> {
        if rule.source.name.is_empty() || rule.destination.name.is_empty() {
            return Err(LoadError::EmptyName { index });
        }

        let consumer =
            self.factory
                .create_consumer(&rule.source)
                .ok_or_else(|| LoadError::UnknownType {
                    index,
                    kind: rule.source.kind.to_string(),
                })?;
        let forwarder = self
            .factory
            .create_forwarder(&rule.destination, &rule.options)
            .ok_or_else(|| LoadError::UnknownType {
                index,
                kind: rule.destination.kind.to_string(),
            })?;

        Ok(BoundPair::new(consumer, forwarder))
    }

    pub(crate) fn load_document(&self) -> Result<Vec<u8>, LoadError> {
        let mapping_file = self
            .config
            .mapping_file
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty());
        if let Some(path) = mapping_file {
            info!(
                event = events::MAPPING_SOURCE_FILE,
                component = COMPONENT,
                mapping_file = %path.display(),
                "loading mapping file"
            );
            return std::fs::read(path).map_err(|source| LoadError::ReadFile {
                path: path.clone(),
                source,
            });
        }

        match self.config.mapping_json.as_deref() {
            Some(document) if !document.is_empty() => {
                info!(
                    event = events::MAPPING_SOURCE_INLINE,
                    component = COMPONENT,
                    "loading inline mapping json"
                );
                Ok(document.as_bytes().to_vec())
            }
            _ => Err(LoadError::MissingConfiguration),
        }
    }
}

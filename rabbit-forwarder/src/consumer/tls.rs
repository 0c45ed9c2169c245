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

//! Optional TLS material for AMQPS broker connections.

use crate::consumer::ConsumeError;
use lapin::tcp::{OwnedIdentity, OwnedTLSConfig};
use std::path::{Path, PathBuf};

/// PEM files used when connecting to the broker.
///
/// `ca_cert_file` adds a trusted CA chain. `cert_file` and `key_file` form the client
/// identity and must be set together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerTls {
    pub ca_cert_file: Option<PathBuf>,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
}

impl BrokerTls {
    pub fn is_empty(&self) -> bool {
        self.ca_cert_file.is_none() && self.cert_file.is_none() && self.key_file.is_none()
    }

    /// Reads the configured files into a connection TLS config. With nothing configured
    /// the result is the default config, which still honours `amqps://` URLs.
    pub async fn to_tls_config(&self) -> Result<OwnedTLSConfig, ConsumeError> {
        let identity = match (&self.cert_file, &self.key_file) {
            (Some(cert_file), Some(key_file)) => Some(OwnedIdentity::PKCS8 {
                pem: read_file(cert_file).await?,
                key: read_file(key_file).await?,
            }),
            (None, None) => None,
            _ => return Err(ConsumeError::IncompleteClientIdentity),
        };

        let cert_chain = match &self.ca_cert_file {
            Some(path) => Some(tokio::fs::read_to_string(path).await.map_err(|source| {
                ConsumeError::ReadTlsFile {
                    path: path.clone(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(OwnedTLSConfig {
            identity,
            cert_chain,
        })
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>, ConsumeError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ConsumeError::ReadTlsFile {
            path: path.to_path_buf(),
            source,
        })
}

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

use clap::Parser;
use rabbit_forwarder::{BrokerTls, MappingConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Forwards RabbitMQ messages to SNS, SQS and Lambda")]
pub(crate) struct ForwarderArgs {
    /// Mapping document on disk. Takes precedence over --mapping-json.
    #[arg(long, value_name = "FILE", env = "MAPPING_FILE")]
    pub(crate) mapping_file: Option<PathBuf>,

    /// Inline mapping document.
    #[arg(long, value_name = "JSON", env = "MAPPING_JSON")]
    pub(crate) mapping_json: Option<String>,

    /// CA certificate chain (PEM) trusted for AMQPS connections.
    #[arg(long, value_name = "FILE", env = "CA_CERT_FILE")]
    pub(crate) ca_cert_file: Option<PathBuf>,

    /// Client certificate (PEM) presented to the broker. Requires --key-file.
    #[arg(long, value_name = "FILE", env = "CERT_FILE", requires = "key_file")]
    pub(crate) cert_file: Option<PathBuf>,

    /// Private key (PEM) for the client certificate. Requires --cert-file.
    #[arg(long, value_name = "FILE", env = "KEY_FILE", requires = "cert_file")]
    pub(crate) key_file: Option<PathBuf>,

    /// Seconds between health summaries.
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub(crate) health_interval: u64,
}

impl ForwarderArgs {
    pub(crate) fn mapping_config(&self) -> MappingConfig {
        MappingConfig {
            mapping_file: self.mapping_file.clone(),
            mapping_json: self.mapping_json.clone(),
        }
    }

    pub(crate) fn broker_tls(&self) -> BrokerTls {
        BrokerTls {
            ca_cert_file: self.ca_cert_file.clone(),
            cert_file: self.cert_file.clone(),
            key_file: self.key_file.clone(),
        }
    }
}

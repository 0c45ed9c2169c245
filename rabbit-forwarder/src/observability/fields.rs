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

//! Canonical structured field keys and value-format helpers.

use crate::forwarder::Headers;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const ERR: &str = "err";

pub const FORWARDER_NAME: &str = "forwarder_name";
pub const TARGET: &str = "target";
pub const FORWARD_HEADERS: &str = "forward_headers";
pub const STATUS_CODE: &str = "status_code";
pub const FUNCTION_ERROR: &str = "function_error";
pub const HEADER_KEYS: &str = "header_keys";

pub const CONSUMER_NAME: &str = "consumer_name";
pub const CONSUMER_TYPE: &str = "consumer_type";
pub const EXCHANGE: &str = "exchange";
pub const QUEUE: &str = "queue";
pub const BINDING_KEYS: &str = "binding_keys";
pub const DELIVERY_TAG: &str = "delivery_tag";

pub const RULE_COUNT: &str = "rule_count";
pub const MAPPING_FILE: &str = "mapping_file";
pub const TLS: &str = "tls";
pub const PAIR_COUNT: &str = "pair_count";

pub const NONE: &str = "none";

/// Renders header keys as a compact comma-separated list for log fields.
pub fn format_header_keys(headers: &Headers) -> String {
    if headers.is_empty() {
        return NONE.to_string();
    }

    headers.keys().map(String::as_str).collect::<Vec<_>>().join(",")
}

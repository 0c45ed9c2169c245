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

//! Canonical structured event names used across `rabbit-forwarder`.

// Forwarder events.
pub const FORWARDER_CREATE: &str = "forwarder_create";
pub const FORWARD_OK: &str = "forward_ok";
pub const FORWARD_FAILED: &str = "forward_failed";
pub const FORWARD_PAYLOAD_BUILD_FAILED: &str = "forward_payload_build_failed";
pub const FORWARD_FUNCTION_ERROR: &str = "forward_function_error";

// Consumer events.
pub const CONSUMER_CREATE: &str = "consumer_create";
pub const CONSUMER_CONNECT_FAILED: &str = "consumer_connect_failed";
pub const CONSUMER_CHANNEL_FAILED: &str = "consumer_channel_failed";
pub const CONSUMER_TOPOLOGY_DECLARED: &str = "consumer_topology_declared";
pub const CONSUMER_STARTED: &str = "consumer_started";
pub const CONSUMER_DELIVERY_ACK: &str = "consumer_delivery_ack";
pub const CONSUMER_DELIVERY_REJECT: &str = "consumer_delivery_reject";
pub const CONSUMER_BODY_NOT_UTF8: &str = "consumer_body_not_utf8";
pub const CONSUMER_STOPPED: &str = "consumer_stopped";
pub const CONSUMER_FAILED: &str = "consumer_failed";

// Mapping load events.
pub const MAPPING_SOURCE_FILE: &str = "mapping_source_file";
pub const MAPPING_SOURCE_INLINE: &str = "mapping_source_inline";
pub const MAPPING_LOAD_START: &str = "mapping_load_start";
pub const MAPPING_LOAD_OK: &str = "mapping_load_ok";
pub const MAPPING_LOAD_FAILED: &str = "mapping_load_failed";

// Supervisor events.
pub const PAIR_START: &str = "pair_start";
pub const PAIR_EXITED: &str = "pair_exited";
pub const PAIR_FAILED: &str = "pair_failed";
pub const SUPERVISOR_STOP: &str = "supervisor_stop";

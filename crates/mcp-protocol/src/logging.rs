//! `logging/setLevel` and `notifications/message` — the eight RFC-5424
//! severities, totally ordered so a session's minimum level can be compared
//! directly against an outgoing message's level.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Maps to syslog severities (RFC 5424). Declaration order is the severity
/// order: `Debug < Info < Notice < Warning < Error < Critical < Alert <
/// Emergency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl LoggingLevel {
    /// True if a message at `self` should be emitted given a session minimum
    /// of `threshold`.
    pub fn should_log(&self, threshold: LoggingLevel) -> bool {
        *self >= threshold
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingMessageParams {
    pub level: LoggingLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger: Option<String>,
    pub data: Value,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingMessageNotification {
    pub method: String,
    pub params: LoggingMessageParams,
}

impl LoggingMessageParams {
    pub fn new(level: LoggingLevel, data: Value) -> Self {
        Self {
            level,
            logger: None,
            data,
            meta: None,
        }
    }

    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = Some(logger.into());
        self
    }
}

impl LoggingMessageNotification {
    pub fn new(level: LoggingLevel, data: Value) -> Self {
        Self {
            method: "notifications/message".to_string(),
            params: LoggingMessageParams::new(level, data),
        }
    }

    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.params = self.params.with_logger(logger);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLevelParams {
    pub level: LoggingLevel,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLevelRequest {
    pub method: String,
    pub params: SetLevelParams,
}

impl SetLevelRequest {
    pub fn new(level: LoggingLevel) -> Self {
        Self {
            method: "logging/setLevel".to_string(),
            params: SetLevelParams { level, meta: None },
        }
    }
}

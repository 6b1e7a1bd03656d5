//! Trigger message decoding.
//!
//! Runs are started by a push subscription delivering an envelope of the form
//! `{"message": {"data": "<base64>", ...}, "subscription": "..."}`. Only the
//! exact payload `job_started` starts a run.

use crate::error::{PipelineError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Push delivery envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
}

/// The message inside a push envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    /// Base64-encoded payload
    pub data: String,
    #[serde(default, rename = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

impl PushEnvelope {
    /// Parse an envelope from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| PipelineError::InvalidEnvelope(e.to_string()))
    }

    /// Build an envelope around a plain-text payload.
    pub fn wrap(payload: &str) -> Self {
        Self {
            message: PushMessage {
                data: STANDARD.encode(payload),
                message_id: None,
                attributes: HashMap::new(),
            },
            subscription: None,
        }
    }

    /// Decode the base64 payload as UTF-8 text.
    pub fn decode_data(&self) -> Result<String> {
        let bytes = STANDARD
            .decode(self.message.data.trim())
            .map_err(|e| PipelineError::InvalidPayload(format!("base64: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| PipelineError::InvalidPayload(format!("utf-8: {}", e)))
    }
}

/// What a decoded trigger asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerMessage {
    /// Start an ingestion run
    JobStarted,
    /// Anything else; ignored by the handler
    Unrecognized(String),
}

impl TriggerMessage {
    pub const JOB_STARTED: &'static str = "job_started";

    /// Exact match; surrounding whitespace makes a payload unrecognized.
    pub fn parse(payload: &str) -> Self {
        if payload == Self::JOB_STARTED {
            TriggerMessage::JobStarted
        } else {
            TriggerMessage::Unrecognized(payload.to_string())
        }
    }
}

impl fmt::Display for TriggerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerMessage::JobStarted => write!(f, "{}", Self::JOB_STARTED),
            TriggerMessage::Unrecognized(payload) => write!(f, "unrecognized({:?})", payload),
        }
    }
}

/// Decode a push envelope straight into a trigger.
pub fn decode_trigger(envelope_json: &str) -> Result<TriggerMessage> {
    let envelope = PushEnvelope::from_json(envelope_json)?;
    let payload = envelope.decode_data()?;
    Ok(TriggerMessage::parse(&payload))
}

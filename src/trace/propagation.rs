//! Trace propagation header parsing.
//!
//! # Responsibilities
//! - Read `X-Honeycomb-Trace` (version 1) and W3C `traceparent` headers
//! - Reject malformed values so the caller starts a fresh root span instead
//!
//! # Design Decisions
//! - Honeycomb header is preferred when both are present
//! - Parse errors never reach the request path; they are logged at debug

use std::sync::Arc;

use axum::http::{request::Parts, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Value};
use thiserror::Error;

pub const HONEYCOMB_TRACE_HEADER: &str = "x-honeycomb-trace";
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Custom header interpretation. Returning `None` starts a new trace.
pub type HeaderParserHook = Arc<dyn Fn(&Parts) -> Option<PropagationContext> + Send + Sync>;

/// Trace state received from an upstream caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationContext {
    pub trace_id: String,
    pub parent_id: String,
    pub dataset: Option<String>,
    /// Trace-level fields carried by the upstream trace.
    pub trace_fields: Map<String, Value>,
}

impl PropagationContext {
    pub fn new(trace_id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            parent_id: parent_id.into(),
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.trace_id.is_empty() && !self.parent_id.is_empty()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropagationError {
    #[error("unsupported propagation version `{0}`")]
    UnsupportedVersion(String),

    #[error("missing `{0}` in propagation header")]
    MissingField(&'static str),

    #[error("malformed propagation header: {0}")]
    Malformed(&'static str),

    #[error("invalid trace context: {0}")]
    InvalidContext(String),
}

/// Parse an `X-Honeycomb-Trace` value:
/// `1;trace_id=<id>,parent_id=<id>[,dataset=<name>][,context=<base64 json>]`.
pub fn parse_honeycomb_header(value: &str) -> Result<PropagationContext, PropagationError> {
    let (version, payload) = value
        .trim()
        .split_once(';')
        .ok_or(PropagationError::Malformed("missing version separator"))?;
    if version != "1" {
        return Err(PropagationError::UnsupportedVersion(version.to_string()));
    }

    let mut ctx = PropagationContext::default();
    for pair in payload.split(',') {
        let Some((key, val)) = pair.split_once('=') else {
            continue;
        };
        match key.trim() {
            "trace_id" => ctx.trace_id = val.trim().to_string(),
            "parent_id" => ctx.parent_id = val.trim().to_string(),
            "dataset" if !val.is_empty() => ctx.dataset = Some(val.trim().to_string()),
            "context" => ctx.trace_fields = decode_trace_fields(val.trim())?,
            _ => {}
        }
    }

    if ctx.trace_id.is_empty() {
        return Err(PropagationError::MissingField("trace_id"));
    }
    if ctx.parent_id.is_empty() {
        return Err(PropagationError::MissingField("parent_id"));
    }
    Ok(ctx)
}

fn decode_trace_fields(encoded: &str) -> Result<Map<String, Value>, PropagationError> {
    if encoded.is_empty() {
        return Ok(Map::new());
    }
    let raw = STANDARD
        .decode(encoded)
        .map_err(|e| PropagationError::InvalidContext(e.to_string()))?;
    serde_json::from_slice(&raw).map_err(|e| PropagationError::InvalidContext(e.to_string()))
}

/// Parse a W3C `traceparent` value: `<version>-<trace id>-<parent id>-<flags>`.
pub fn parse_w3c_header(value: &str) -> Result<PropagationContext, PropagationError> {
    let parts: Vec<&str> = value.trim().split('-').collect();
    if parts.len() < 4 {
        return Err(PropagationError::Malformed("expected four dash-separated parts"));
    }

    let version = parts[0];
    if !is_lower_hex(version, 2) || version == "ff" {
        return Err(PropagationError::UnsupportedVersion(version.to_string()));
    }
    if version == "00" && parts.len() != 4 {
        return Err(PropagationError::Malformed("trailing data for version 00"));
    }

    let (trace_id, parent_id, flags) = (parts[1], parts[2], parts[3]);
    if !is_lower_hex(trace_id, 32) || trace_id.bytes().all(|b| b == b'0') {
        return Err(PropagationError::MissingField("trace_id"));
    }
    if !is_lower_hex(parent_id, 16) || parent_id.bytes().all(|b| b == b'0') {
        return Err(PropagationError::MissingField("parent_id"));
    }
    if !is_lower_hex(flags, 2) {
        return Err(PropagationError::Malformed("trace flags"));
    }

    Ok(PropagationContext::new(trace_id, parent_id))
}

fn is_lower_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Look for propagation headers, Honeycomb first, then W3C.
///
/// `Ok(None)` means no propagation header was sent at all.
pub fn parse_request_headers(
    headers: &HeaderMap,
) -> Result<Option<PropagationContext>, PropagationError> {
    let mut first_error = None;

    if let Some(value) = headers.get(HONEYCOMB_TRACE_HEADER) {
        let parsed = value
            .to_str()
            .map_err(|_| PropagationError::Malformed("non-visible ASCII in header"))
            .and_then(parse_honeycomb_header);
        match parsed {
            Ok(ctx) => return Ok(Some(ctx)),
            Err(e) => first_error = Some(e),
        }
    }

    if let Some(value) = headers.get(TRACEPARENT_HEADER) {
        let parsed = value
            .to_str()
            .map_err(|_| PropagationError::Malformed("non-visible ASCII in header"))
            .and_then(parse_w3c_header);
        match parsed {
            Ok(ctx) => return Ok(Some(ctx)),
            Err(e) => first_error = first_error.or(Some(e)),
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

/// Built-in parser used when no [`HeaderParserHook`] is configured.
pub fn default_header_parser(parts: &Parts) -> Option<PropagationContext> {
    match parse_request_headers(&parts.headers) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed trace propagation headers");
            None
        }
    }
}

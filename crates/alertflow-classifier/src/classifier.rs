// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recognition heuristic: is this payload an infrastructure alert at all?

use alertflow_core::AlertInfo;
use serde_json::Value;

use crate::extractor::{self, ExtractDefaults, SERVICES};

/// True when any recognition marker matches.
///
/// Markers: `Type == "Notification"`; a subject containing `AWS`; a body
/// containing `AWS` or `Amazon`; any known service name anywhere in the
/// serialized payload. Non-object payloads never match.
pub fn is_alert(payload: &Value) -> bool {
    let Some(obj) = payload.as_object() else {
        return false;
    };

    if obj.get("Type").and_then(Value::as_str) == Some("Notification") {
        return true;
    }

    if extractor::subject(obj).contains("AWS") {
        return true;
    }

    // Only a plain-text body counts here; structured messages are caught by the service scan.
    let plain_body = match obj.get("TextBody").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => Some(text),
        _ => obj.get("Message").and_then(Value::as_str),
    };
    if let Some(body) = plain_body
        && (body.contains("AWS") || body.contains("Amazon"))
    {
        return true;
    }

    let serialized = payload.to_string();
    SERVICES.iter().any(|s| serialized.contains(s))
}

/// Classify with the built-in fallbacks.
pub fn classify(payload: &Value) -> Option<AlertInfo> {
    classify_with(payload, &ExtractDefaults::default())
}

/// `Some(extracted fields)` for a recognised payload, `None` otherwise.
///
/// A recognised payload may still extract to all-`Unknown` fields; callers
/// decide what to do with that.
pub fn classify_with(payload: &Value, defaults: &ExtractDefaults) -> Option<AlertInfo> {
    is_alert(payload).then(|| extractor::extract_with(payload, defaults))
}

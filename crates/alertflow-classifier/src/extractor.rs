// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort field extraction from a raw webhook payload.
//!
//! Extraction is total: any input, including non-objects and empty
//! documents, yields an [`AlertInfo`] with defaults filled in.

use std::sync::LazyLock;

use alertflow_core::types::UNKNOWN;
use alertflow_core::{AlertInfo, Severity};
use regex::Regex;
use serde_json::{Map, Value};

/// Recognised service names, in priority order.
pub const SERVICES: [&str; 8] = [
    "EC2",
    "RDS",
    "S3",
    "Lambda",
    "CloudWatch",
    "DynamoDB",
    "ECS",
    "EKS",
];

/// Message used when neither subject nor body has text.
pub const DEFAULT_MESSAGE: &str = "Unknown alert";

const MESSAGE_PREVIEW_CHARS: usize = 200;

/// Resource id patterns, in priority order: EC2 instance, EBS volume, ARN, dotted hostname.
static RESOURCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(i-[0-9a-f]{8,17})").unwrap(),
        Regex::new(r"(vol-[0-9a-f]{8,17})").unwrap(),
        Regex::new(r"(arn:aws:[a-zA-Z0-9-]+:[a-zA-Z0-9-]+:[0-9]{12}:[a-zA-Z0-9-]+/[a-zA-Z0-9-]+)")
            .unwrap(),
        Regex::new(r"([a-zA-Z0-9-]+\.[a-zA-Z0-9-]+\.[a-zA-Z0-9-]+)").unwrap(),
    ]
});

static REGION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z]{2}-[a-z]+-[0-9])").unwrap());

static ACCOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]{12})").unwrap());

/// Alert-type keywords in priority order, each with the type it maps to.
const ALERT_TYPE_KEYWORDS: [(&str, &str); 6] = [
    ("CPU", "CPU"),
    ("Memory", "Memory"),
    ("Disk", "Disk"),
    ("Storage", "Disk"),
    ("Network", "Network"),
    ("Error", "Error"),
];

/// Fallback values for fields a payload does not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractDefaults {
    pub region: String,
    pub account_id: String,
}

impl Default for ExtractDefaults {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            account_id: "000000000000".to_string(),
        }
    }
}

impl ExtractDefaults {
    fn to_info(&self) -> AlertInfo {
        AlertInfo {
            service: UNKNOWN.to_string(),
            resource_id: UNKNOWN.to_string(),
            alert_type: UNKNOWN.to_string(),
            severity: Severity::Medium,
            region: self.region.clone(),
            account_id: self.account_id.clone(),
            message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

/// Extract fields using the built-in fallback region and account.
pub fn extract(payload: &Value) -> AlertInfo {
    extract_with(payload, &ExtractDefaults::default())
}

/// Extract fields, falling back to `defaults` where the payload is silent.
pub fn extract_with(payload: &Value, defaults: &ExtractDefaults) -> AlertInfo {
    let mut info = defaults.to_info();
    let Some(obj) = payload.as_object() else {
        return info;
    };

    let subject = subject(obj);
    if !subject.is_empty() {
        if let Some(service) = find_service(subject) {
            info.service = service.to_string();
        }
        info.severity = severity_from_subject(subject);
        info.message = subject.to_string();
    }

    let body = body_text(obj);
    if let Some(body) = body.as_deref().filter(|b| !b.is_empty()) {
        let haystack = search_text(body);

        if let Some(resource) = find_resource(&haystack) {
            info.resource_id = resource.to_string();
        }
        if let Some(m) = REGION_PATTERN.find(&haystack) {
            info.region = m.as_str().to_string();
        }
        if let Some(m) = ACCOUNT_PATTERN.find(&haystack) {
            info.account_id = m.as_str().to_string();
        }
        if let Some(alert_type) = find_alert_type(&haystack) {
            info.alert_type = alert_type.to_string();
        }
        if subject.is_empty() {
            info.message = preview(body);
        }
    }

    if info.alert_type == UNKNOWN
        && let Some(alert_type) = find_alert_type(subject)
    {
        info.alert_type = alert_type.to_string();
    }

    info
}

/// The `Subject` string, or empty.
pub(crate) fn subject(obj: &Map<String, Value>) -> &str {
    obj.get("Subject").and_then(Value::as_str).unwrap_or("")
}

/// Body text: a non-empty `TextBody`, else `Message`.
///
/// A structured `Message` (as SNS sometimes delivers) is serialized to JSON.
pub(crate) fn body_text(obj: &Map<String, Value>) -> Option<String> {
    if let Some(text) = obj.get("TextBody").and_then(Value::as_str)
        && !text.is_empty()
    {
        return Some(text.to_string());
    }
    match obj.get("Message")? {
        Value::String(s) => Some(s.clone()),
        v @ (Value::Object(_) | Value::Array(_)) => Some(v.to_string()),
        _ => None,
    }
}

/// The body re-serialized if it parses as a JSON object, else the body verbatim.
fn search_text(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(v @ Value::Object(_)) => v.to_string(),
        _ => body.to_string(),
    }
}

fn find_service(subject: &str) -> Option<&'static str> {
    SERVICES.iter().copied().find(|s| subject.contains(s))
}

fn severity_from_subject(subject: &str) -> Severity {
    let lower = subject.to_lowercase();
    if lower.contains("critical") {
        Severity::Critical
    } else if lower.contains("high") || lower.contains("warning") {
        Severity::High
    } else {
        Severity::Medium
    }
}

fn find_resource(text: &str) -> Option<&str> {
    RESOURCE_PATTERNS
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str())
}

fn find_alert_type(text: &str) -> Option<&'static str> {
    ALERT_TYPE_KEYWORDS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, alert_type)| *alert_type)
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(MESSAGE_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hand-authored recommendations keyed by `(service, alert_type, severity)`.

use alertflow_core::Severity;

/// One row: service, alert type, and the medium / high / critical texts.
type Rule = (&'static str, &'static str, [&'static str; 3]);

const RULES: &[Rule] = &[
    (
        "EC2",
        "CPU",
        [
            "Consider scaling your instance or optimizing your application.",
            "Scale up your instance type or implement auto-scaling.",
            "Immediately scale up your instance and investigate the root cause.",
        ],
    ),
    (
        "EC2",
        "Memory",
        [
            "Monitor memory usage and consider application optimization.",
            "Increase instance memory or optimize memory-intensive processes.",
            "Immediately increase instance memory and investigate memory leaks.",
        ],
    ),
    (
        "EC2",
        "Disk",
        [
            "Clean up unnecessary files or consider increasing storage.",
            "Increase EBS volume size or add additional volumes.",
            "Immediately increase storage and implement better disk management.",
        ],
    ),
    (
        "EC2",
        "Network",
        [
            "Monitor network traffic patterns for optimization.",
            "Optimize network-intensive operations or increase bandwidth.",
            "Investigate potential DDoS attack or network bottlenecks.",
        ],
    ),
    (
        "RDS",
        "CPU",
        [
            "Review and optimize database queries.",
            "Scale up your database instance or implement read replicas.",
            "Immediately scale up your instance and optimize critical queries.",
        ],
    ),
    (
        "RDS",
        "Memory",
        [
            "Review database configuration for memory settings.",
            "Increase instance memory or optimize memory-intensive queries.",
            "Immediately increase instance memory and fix memory leaks.",
        ],
    ),
    (
        "RDS",
        "Storage",
        [
            "Clean up old data or implement archiving strategy.",
            "Increase storage capacity or implement data partitioning.",
            "Immediately increase storage and implement emergency cleanup.",
        ],
    ),
    (
        "RDS",
        "IOPS",
        [
            "Review I/O intensive queries and optimize.",
            "Increase provisioned IOPS or implement caching.",
            "Immediately increase provisioned IOPS and fix I/O bottlenecks.",
        ],
    ),
    (
        "RDS",
        "Connections",
        [
            "Review connection pooling configuration.",
            "Implement better connection management or increase max connections.",
            "Immediately fix connection leaks and optimize connection usage.",
        ],
    ),
    (
        "Lambda",
        "Timeout",
        [
            "Review function logic for optimization opportunities.",
            "Increase timeout setting or break function into smaller parts.",
            "Immediately refactor function to handle workload appropriately.",
        ],
    ),
    (
        "Lambda",
        "Error",
        [
            "Review error logs and implement better error handling.",
            "Fix critical errors and implement retry mechanisms.",
            "Immediately fix function errors and implement circuit breakers.",
        ],
    ),
    (
        "Lambda",
        "Throttle",
        [
            "Review concurrency settings and usage patterns.",
            "Increase concurrency limits or implement backoff strategies.",
            "Immediately increase concurrency limits and optimize invocation patterns.",
        ],
    ),
    (
        "Lambda",
        "Memory",
        [
            "Review memory usage and optimize function code.",
            "Increase allocated memory or optimize memory-intensive operations.",
            "Immediately increase memory allocation and fix memory leaks.",
        ],
    ),
];

/// Exact, case-sensitive lookup in the static table.
pub fn static_recommendation(
    service: &str,
    alert_type: &str,
    severity: Severity,
) -> Option<&'static str> {
    let idx = match severity {
        Severity::Medium => 0,
        Severity::High => 1,
        Severity::Critical => 2,
    };
    RULES
        .iter()
        .find(|(s, t, _)| *s == service && *t == alert_type)
        .map(|(_, _, texts)| texts[idx])
}

/// Generic sentence naming severity, alert type, and service verbatim.
pub fn default_recommendation(service: &str, alert_type: &str, severity: Severity) -> String {
    format!("Investigate the {severity} {alert_type} alert for your {service} resource.")
}

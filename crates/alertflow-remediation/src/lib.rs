// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remediation recommendations for classified alerts.
//!
//! [`Resolver::resolve`] walks four tiers in order and stops at the first
//! that answers: the remediation cache, the optional generative backend,
//! the static rule table in [`rules`], and a generic default sentence.
//! It never fails.

pub mod resolver;
pub mod rules;

pub use resolver::{Resolution, Resolver, ResolverSettings, Tier};
pub use rules::{default_recommendation, static_recommendation};

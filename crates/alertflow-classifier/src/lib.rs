// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure, I/O-free classification of inbound webhook payloads.
//!
//! [`classify`] decides whether a payload looks like an infrastructure
//! alert and, if so, runs [`extract`] to pull structured fields out of it.
//! Every priority list here is an ordered slice: the first match wins, and
//! the order is part of the observable behaviour.

pub mod classifier;
pub mod extractor;

pub use classifier::{classify, classify_with, is_alert};
pub use extractor::{ExtractDefaults, SERVICES, extract, extract_with};

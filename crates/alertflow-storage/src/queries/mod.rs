// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table.

pub mod alerts;
pub mod queue;
pub mod remediation;

use std::str::FromStr;

/// Parse a TEXT column into a strum/FromStr enum, surfacing failures as conversion errors.
pub(crate) fn parse_column<T>(idx: usize, raw: &str) -> Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remediation cache keyed by `(service, alert_type, severity)`.

use alertflow_core::{AlertflowError, RemediationCacheEntry, Severity};
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::queries::parse_column;

/// Exact-match lookup.
pub async fn get_entry(
    db: &Database,
    service: &str,
    alert_type: &str,
    severity: Severity,
) -> Result<Option<RemediationCacheEntry>, AlertflowError> {
    let key = (service.to_string(), alert_type.to_string(), severity.to_string());
    db.connection()
        .call(move |conn| -> Result<Option<RemediationCacheEntry>, rusqlite::Error> {
            let result = conn.query_row(
                "SELECT service, alert_type, severity, recommendation, created_at
                 FROM remediation_cache
                 WHERE service = ?1 AND alert_type = ?2 AND severity = ?3",
                params![key.0, key.1, key.2],
                |row| {
                    let severity: String = row.get(2)?;
                    Ok(RemediationCacheEntry {
                        service: row.get(0)?,
                        alert_type: row.get(1)?,
                        severity: parse_column(2, &severity)?,
                        recommendation: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            );
            match result {
                Ok(entry) => Ok(Some(entry)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert or replace; last writer wins.
pub async fn upsert_entry(
    db: &Database,
    entry: &RemediationCacheEntry,
) -> Result<(), AlertflowError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO remediation_cache
                     (service, alert_type, severity, recommendation, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (service, alert_type, severity) DO UPDATE SET
                     recommendation = excluded.recommendation,
                     created_at = excluded.created_at",
                params![
                    entry.service,
                    entry.alert_type,
                    entry.severity.to_string(),
                    entry.recommendation,
                    entry.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

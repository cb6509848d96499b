// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alert persistence. Alerts are written once and never updated.

use alertflow_core::{Alert, AlertflowError};
use rusqlite::{Row, params};

use crate::database::{Database, map_tr_err};
use crate::queries::parse_column;

const ALERT_COLUMNS: &str = "id, account_id, service, resource_id, alert_type, severity,
                             timestamp, message, region, source_queue_item_id, remediation";

fn row_to_alert(row: &Row<'_>) -> Result<Alert, rusqlite::Error> {
    let severity: String = row.get(5)?;
    Ok(Alert {
        id: row.get(0)?,
        account_id: row.get(1)?,
        service: row.get(2)?,
        resource_id: row.get(3)?,
        alert_type: row.get(4)?,
        severity: parse_column(5, &severity)?,
        timestamp: row.get(6)?,
        message: row.get(7)?,
        region: row.get(8)?,
        source_queue_item_id: row.get(9)?,
        remediation: row.get(10)?,
    })
}

/// Insert a newly materialized alert.
pub async fn insert_alert(db: &Database, alert: &Alert) -> Result<(), AlertflowError> {
    let alert = alert.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO alerts (id, account_id, service, resource_id, alert_type, severity,
                     timestamp, message, region, source_queue_item_id, remediation)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    alert.id,
                    alert.account_id,
                    alert.service,
                    alert.resource_id,
                    alert.alert_type,
                    alert.severity.to_string(),
                    alert.timestamp,
                    alert.message,
                    alert.region,
                    alert.source_queue_item_id,
                    alert.remediation,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch one alert by id.
pub async fn get_alert(db: &Database, id: &str) -> Result<Option<Alert>, AlertflowError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Alert>, rusqlite::Error> {
            let sql = format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE id = ?1");
            match conn.query_row(&sql, params![id], row_to_alert) {
                Ok(alert) => Ok(Some(alert)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List alerts newest first.
pub async fn list_alerts(db: &Database, limit: usize) -> Result<Vec<Alert>, AlertflowError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<Vec<Alert>, rusqlite::Error> {
            let sql = format!(
                "SELECT {ALERT_COLUMNS} FROM alerts ORDER BY timestamp DESC, rowid DESC LIMIT ?1"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![limit], row_to_alert)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook queue operations.
//!
//! Selection and state transition are separate statements; there is no
//! claim step, so two concurrent batch runs may pick the same pending row.

use alertflow_core::{AlertflowError, QueueFilter, QueueItem, QueueStats, QueueUpdate};
use rusqlite::{Row, params};

use crate::database::{Database, map_tr_err};
use crate::queries::parse_column;

const QUEUE_COLUMNS: &str = "id, received_at, received_date, status, source, raw_payload,
                             processed_at, error_message, resulting_alert_id";

fn row_to_item(row: &Row<'_>) -> Result<QueueItem, rusqlite::Error> {
    let status: String = row.get(3)?;
    let raw: String = row.get(5)?;
    let raw_payload = serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(QueueItem {
        id: row.get(0)?,
        received_at: row.get(1)?,
        received_date: row.get(2)?,
        status: parse_column(3, &status)?,
        source: row.get(4)?,
        raw_payload,
        processed_at: row.get(6)?,
        error_message: row.get(7)?,
        resulting_alert_id: row.get(8)?,
    })
}

/// Insert a new queue item.
pub async fn insert_item(db: &Database, item: &QueueItem) -> Result<(), AlertflowError> {
    let item = item.clone();
    let raw = item.raw_payload.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO webhook_queue (id, received_at, received_date, status, source,
                     raw_payload, processed_at, error_message, resulting_alert_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    item.id,
                    item.received_at,
                    item.received_date,
                    item.status.to_string(),
                    item.source,
                    raw,
                    item.processed_at,
                    item.error_message,
                    item.resulting_alert_id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch one item by id.
pub async fn get_item(db: &Database, id: &str) -> Result<Option<QueueItem>, AlertflowError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<QueueItem>, rusqlite::Error> {
            let sql = format!("SELECT {QUEUE_COLUMNS} FROM webhook_queue WHERE id = ?1");
            match conn.query_row(&sql, params![id], row_to_item) {
                Ok(item) => Ok(Some(item)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Scan items by optional status and date, newest first unless the filter
/// asks for arrival order.
pub async fn list_items(
    db: &Database,
    filter: &QueueFilter,
) -> Result<Vec<QueueItem>, AlertflowError> {
    let status = filter.status.map(|s| s.to_string());
    let date = filter.date.clone();
    let limit = i64::try_from(filter.limit).unwrap_or(i64::MAX);
    let order = if filter.oldest_first { "ASC" } else { "DESC" };
    db.connection()
        .call(move |conn| -> Result<Vec<QueueItem>, rusqlite::Error> {
            let sql = format!(
                "SELECT {QUEUE_COLUMNS} FROM webhook_queue
                 WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR received_date = ?2)
                 ORDER BY received_at {order}, rowid {order}
                 LIMIT ?3"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![status, date, limit], row_to_item)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite the lifecycle columns. Returns false when no row has this id.
pub async fn update_item(
    db: &Database,
    id: &str,
    update: &QueueUpdate,
) -> Result<bool, AlertflowError> {
    let id = id.to_string();
    let update = update.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE webhook_queue
                 SET status = ?1, processed_at = ?2, error_message = ?3, resulting_alert_id = ?4
                 WHERE id = ?5",
                params![
                    update.status.to_string(),
                    update.processed_at,
                    update.error_message,
                    update.resulting_alert_id,
                    id,
                ],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete the given ids in one transaction. Returns how many rows went away.
pub async fn delete_items(db: &Database, ids: &[String]) -> Result<usize, AlertflowError> {
    let ids = ids.to_vec();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            let tx = conn.transaction()?;
            let mut removed = 0;
            {
                let mut stmt = tx.prepare("DELETE FROM webhook_queue WHERE id = ?1")?;
                for id in &ids {
                    removed += stmt.execute(params![id])?;
                }
            }
            tx.commit()?;
            Ok(removed)
        })
        .await
        .map_err(map_tr_err)
}

/// Count items by status, optionally restricted to one `received_date`.
pub async fn stats(db: &Database, date: Option<&str>) -> Result<QueueStats, AlertflowError> {
    let date = date.map(str::to_string);
    db.connection()
        .call(move |conn| -> Result<QueueStats, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT status, COUNT(*) FROM webhook_queue
                 WHERE (?1 IS NULL OR received_date = ?1)
                 GROUP BY status",
            )?;
            let mut stats = QueueStats {
                date: date.clone(),
                ..QueueStats::default()
            };
            let mut rows = stmt.query(params![date])?;
            while let Some(row) = rows.next()? {
                let status: String = row.get(0)?;
                let count: i64 = row.get(1)?;
                stats.record(parse_column(0, &status)?, count.max(0) as u64);
            }
            Ok(stats)
        })
        .await
        .map_err(map_tr_err)
}

use anyhow::{Context, Result};
use rusqlite::{params_from_iter, types::Value, Row};

use crate::db::{
    connection::Database,
    helpers::{check_vital, to_rating},
    models::{HealthRecord, Symptom, SymptomRatings},
};

fn record_columns() -> Vec<&'static str> {
    let mut columns = vec!["id", "heart_rate", "respiratory_rate"];
    columns.extend(Symptom::ALL.iter().map(Symptom::column));
    columns
}

fn row_to_record(row: &Row) -> Result<HealthRecord> {
    let mut symptoms = SymptomRatings::default();
    for symptom in Symptom::ALL {
        let column = symptom.column();
        symptoms.set(symptom, to_rating(row.get::<_, i64>(column)?, column)?);
    }

    Ok(HealthRecord {
        id: Some(row.get("id")?),
        heart_rate: row.get("heart_rate")?,
        respiratory_rate: row.get("respiratory_rate")?,
        symptoms,
    })
}

impl Database {
    /// Insert a record, or replace the row with the same id. Returns the id
    /// the record is stored under.
    pub async fn insert_record(&self, record: &HealthRecord) -> Result<i64> {
        let record = record.clone();
        self.execute(move |conn| {
            let heart_rate = check_vital(record.heart_rate, "heart_rate")?;
            let respiratory_rate = check_vital(record.respiratory_rate, "respiratory_rate")?;

            let columns = record_columns();
            let placeholders = (1..=columns.len())
                .map(|i| format!("?{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            let query = format!(
                "INSERT OR REPLACE INTO health ({}) VALUES ({placeholders})",
                columns.join(", ")
            );

            let mut values = vec![
                record.id.map_or(Value::Null, Value::Integer),
                Value::Real(heart_rate),
                Value::Real(respiratory_rate),
            ];
            values.extend(
                record
                    .symptoms
                    .iter()
                    .map(|(_, rating)| Value::Integer(i64::from(rating))),
            );

            conn.execute(&query, params_from_iter(values))
                .context("failed to insert health record")?;

            Ok(record.id.unwrap_or_else(|| conn.last_insert_rowid()))
        })
        .await
    }

    /// All stored records in insertion order.
    pub async fn get_all_records(&self) -> Result<Vec<HealthRecord>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM health ORDER BY id ASC",
                record_columns().join(", ")
            ))?;

            let mut rows = stmt.query([])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                records.push(row_to_record(row)?);
            }

            Ok(records)
        })
        .await
    }

    pub async fn count_records(&self) -> Result<u64> {
        self.execute(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM health", [], |row| row.get(0))?;
            Ok(u64::try_from(count).unwrap_or(0))
        })
        .await
    }
}

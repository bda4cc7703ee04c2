#![allow(dead_code)]
/// In-memory record transport backing the integration tests
///
/// Holds seeded tables, evaluates filter trees against row fields the way the
/// store's formula language does, and counts target fetches so tests can
/// assert fan-out behavior. Failure injection marks individual row ids (for
/// sub-fetch failures) or whole tables (for list failures).
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use cinebase::filter::Filter;
use cinebase::records::RawRecord;
use cinebase::transport::RecordTransport;
use cinebase::{StoreError, StoreResult};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct FakeTransport {
    tables: Mutex<HashMap<String, Vec<RawRecord>>>,
    fail_fetch_ids: Mutex<HashSet<String>>,
    fail_list_tables: Mutex<HashSet<String>>,
    fetch_calls: AtomicUsize,
    active_fetches: AtomicUsize,
    peak_fetches: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            fail_fetch_ids: Mutex::new(HashSet::new()),
            fail_list_tables: Mutex::new(HashSet::new()),
            fetch_calls: AtomicUsize::new(0),
            active_fetches: AtomicUsize::new(0),
            peak_fetches: AtomicUsize::new(0),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn seed(&self, table: &str, record: RawRecord) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(record);
    }

    /// Make every `fetch` of this row id fail with `ServerUnavailable`
    pub fn fail_fetch(&self, id: &str) {
        self.fail_fetch_ids.lock().unwrap().insert(id.to_string());
    }

    /// Make every `list` of this table fail with `ServerUnavailable`
    pub fn fail_list(&self, table: &str) {
        self.fail_list_tables
            .lock()
            .unwrap()
            .insert(table.to_string());
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches that were in flight at once
    pub fn peak_fetch_concurrency(&self) -> usize {
        self.peak_fetches.load(Ordering::SeqCst)
    }

    pub fn rows(&self, table: &str) -> Vec<RawRecord> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

/// Build a raw record without a creation timestamp
pub fn record(id: &str, fields: Value) -> RawRecord {
    RawRecord {
        id: id.to_string(),
        created_time: None,
        fields,
    }
}

/// Build a raw record with an RFC 3339 creation timestamp
pub fn record_at(id: &str, created: &str, fields: Value) -> RawRecord {
    RawRecord {
        id: id.to_string(),
        created_time: Some(
            DateTime::parse_from_rfc3339(created)
                .expect("test timestamp")
                .with_timezone(&Utc),
        ),
        fields,
    }
}

/// A complete movie field set, enough to decode as `MovieFields`
pub fn movie_fields(name: &str) -> Value {
    json!({
        "name": name,
        "poster": format!("https://img.example/{}.jpg", name),
        "story": "A story.",
        "runtime": "2h 10m",
        "genre": ["Drama"],
        "rating": "PG-13",
        "IMDb_rating": 7.5,
        "language": ["English"],
    })
}

/// Evaluate a filter tree against a row's field map
fn matches(filter: &Filter, fields: &Value) -> bool {
    match filter {
        Filter::Eq { field, value } => field_equals(fields.get(field), value, false),
        Filter::EqIgnoreCase { field, value } => field_equals(fields.get(field), value, true),
        Filter::And(exprs) => exprs.iter().all(|expr| matches(expr, fields)),
    }
}

fn field_equals(actual: Option<&Value>, expected: &str, fold_case: bool) -> bool {
    let eq = |s: &str| {
        if fold_case {
            s.to_lowercase() == expected.to_lowercase()
        } else {
            s == expected
        }
    };
    match actual {
        Some(Value::String(s)) => eq(s),
        // The store compares list-valued references by membership
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| item.as_str().map(|s| eq(s)).unwrap_or(false)),
        _ => false,
    }
}

#[async_trait]
impl RecordTransport for FakeTransport {
    async fn list(&self, table: &str, filter: Option<&Filter>) -> StoreResult<Vec<RawRecord>> {
        if self.fail_list_tables.lock().unwrap().contains(table) {
            return Err(StoreError::ServerUnavailable);
        }

        let tables = self.tables.lock().unwrap();
        let rows = tables.get(table).cloned().unwrap_or_default();
        Ok(match filter {
            Some(filter) => rows
                .into_iter()
                .filter(|row| matches(filter, &row.fields))
                .collect(),
            None => rows,
        })
    }

    async fn fetch(&self, table: &str, id: &str) -> StoreResult<RawRecord> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let active = self.active_fetches.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_fetches.fetch_max(active, Ordering::SeqCst);
        // Yield so concurrent fetches overlap and the peak is observable
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        self.active_fetches.fetch_sub(1, Ordering::SeqCst);

        if self.fail_fetch_ids.lock().unwrap().contains(id) {
            return Err(StoreError::ServerUnavailable);
        }

        let tables = self.tables.lock().unwrap();
        tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| row.id == id))
            .cloned()
            .ok_or(StoreError::RequestFailed(404))
    }

    async fn create(&self, table: &str, fields: Value) -> StoreResult<RawRecord> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = RawRecord {
            id: format!("recGen{}", n),
            created_time: Some(
                DateTime::parse_from_rfc3339("2026-02-01T00:00:00Z")
                    .expect("test epoch")
                    .with_timezone(&Utc)
                    + Duration::seconds(n as i64),
            ),
            fields,
        };
        self.seed(table, created.clone());
        Ok(created)
    }

    async fn update(&self, table: &str, id: &str, fields: Value) -> StoreResult<RawRecord> {
        let mut tables = self.tables.lock().unwrap();
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| row.id == id))
            .ok_or(StoreError::RequestFailed(404))?;

        if let (Some(existing), Some(incoming)) = (row.fields.as_object_mut(), fields.as_object())
        {
            for (key, value) in incoming {
                existing.insert(key.clone(), value.clone());
            }
        } else {
            row.fields = fields;
        }

        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> StoreResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let rows = tables
            .get_mut(table)
            .ok_or(StoreError::RequestFailed(404))?;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(StoreError::RequestFailed(404));
        }
        Ok(())
    }
}

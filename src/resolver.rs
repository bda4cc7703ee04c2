/// Many-to-many relation resolution over junction tables
///
/// The store has no joins: a relationship exists only as junction rows
/// pairing two record ids. Resolution lists the junction rows for a parent
/// id, extracts the referenced target ids, and fans out one concurrent fetch
/// per id against the target table. A junction row may reference a row that
/// no longer exists, so how a failed sub-fetch folds back in is a per-call
/// decision, not a fixed rule.
use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::records::Record;
use crate::transport::RecordTransport;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Fan-in policy for concurrent target fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanIn {
    /// The first sub-fetch failure aborts the resolution; outstanding fetches
    /// are cancelled and partial results are discarded
    Strict,
    /// A failed sub-fetch is skipped; the collection keeps the successes and
    /// no error is raised for the misses
    Lenient,
}

/// Resolves linked records through a junction table
pub struct RelationResolver {
    transport: Arc<dyn RecordTransport>,
    max_in_flight: usize,
}

impl RelationResolver {
    pub fn new(transport: Arc<dyn RecordTransport>, max_in_flight: usize) -> Self {
        Self {
            transport,
            max_in_flight,
        }
    }

    /// Resolve the targets a parent is linked to
    ///
    /// Lists `junction_table` rows where `foreign_key_field` equals
    /// `parent_id`, maps each row through `extract` to the target ids it
    /// references, and fetches every id from `target_table` concurrently,
    /// folding results back in under `policy`. Zero junction matches answers
    /// an empty collection without issuing any target fetch. Results arrive
    /// in completion order; callers that need a stable order sort downstream.
    pub async fn resolve<J, T, X>(
        &self,
        junction_table: &str,
        foreign_key_field: &str,
        parent_id: &str,
        extract: X,
        target_table: &str,
        policy: FanIn,
    ) -> StoreResult<Vec<Record<T>>>
    where
        J: DeserializeOwned,
        T: DeserializeOwned + Send + 'static,
        X: Fn(&Record<J>) -> Vec<String>,
    {
        let filter = Filter::eq(foreign_key_field, parent_id);
        let rows = self.transport.list(junction_table, Some(&filter)).await?;

        let mut target_ids = Vec::new();
        for raw in rows {
            let row = raw.decode::<J>()?;
            target_ids.extend(extract(&row));
        }

        // No links, no fan-out round
        if target_ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "Resolving {} {} rows for {}={}",
            target_ids.len(),
            target_table,
            foreign_key_field,
            parent_id
        );

        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut tasks: JoinSet<StoreResult<Record<T>>> = JoinSet::new();

        for id in target_ids {
            let transport = Arc::clone(&self.transport);
            let semaphore = Arc::clone(&semaphore);
            let table = target_table.to_string();

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| StoreError::Unknown(format!("Fan-out pool closed: {}", e)))?;
                let raw = transport.fetch(&table, &id).await?;
                raw.decode::<T>()
            });
        }

        let mut resolved = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(record)) => resolved.push(record),
                Ok(Err(e)) => match policy {
                    FanIn::Strict => {
                        tasks.abort_all();
                        return Err(e);
                    }
                    FanIn::Lenient => {
                        warn!("Skipping unresolved {} row: {}", target_table, e);
                    }
                },
                Err(e) if e.is_cancelled() => {}
                Err(e) => match policy {
                    FanIn::Strict => {
                        tasks.abort_all();
                        return Err(StoreError::Unknown(format!("Fan-out task failed: {}", e)));
                    }
                    FanIn::Lenient => {
                        warn!("Fan-out task failed: {}", e);
                    }
                },
            }
        }

        Ok(resolved)
    }
}

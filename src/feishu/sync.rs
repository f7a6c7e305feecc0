//! Idempotent table sync
//!
//! Every leaderboard entry maps to one row keyed by repository and snapshot.
//! The syncer looks each key up and either updates the existing row or
//! creates a new one, so re-running on the same day never duplicates rows.
//! Row failures are recorded and skipped; the batch always runs to the end.

use crate::feishu::traits::{RecordStore, RowKey, SyncResult, TableRow};
use crate::trending::{FetchRequest, LeaderboardEntry, Period};
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde_json::{json, Map, Value};

/// Spoken-language column value; the trending page is fetched unfiltered
const SPOKEN_LANGUAGE: &str = "all";

/// The run date, period and language a set of rows belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub period: Period,
    pub language_key: String,
}

impl Snapshot {
    pub fn new(date: NaiveDate, request: &FetchRequest) -> Self {
        Self {
            date,
            period: request.period,
            language_key: request.language_key(),
        }
    }

    /// UTC midnight of the snapshot date in epoch milliseconds
    pub fn date_millis(&self) -> i64 {
        self.date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
    }

    /// Tag such as `github-trending:weekly:2025-W42:rust`
    pub fn source_tag(&self) -> String {
        let bucket = match self.period {
            Period::Daily => self.date.format("%Y-%m-%d").to_string(),
            Period::Weekly => {
                let week = self.date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Period::Monthly => self.date.format("%Y-%m").to_string(),
        };
        format!(
            "github-trending:{}:{}:{}",
            self.period.as_str(),
            bucket,
            self.language_key
        )
    }
}

/// Maps an entry onto the table columns
pub fn build_row(entry: &LeaderboardEntry, snapshot: &Snapshot) -> TableRow {
    let repo = entry.full_name();
    let date_millis = snapshot.date_millis();
    let source = snapshot.source_tag();

    let mut fields = Map::new();
    fields.insert("Rank".to_string(), json!(entry.rank));
    fields.insert("Repo".to_string(), json!(repo));
    fields.insert("Owner".to_string(), json!(entry.owner));
    fields.insert("SpokenLanguage".to_string(), json!(SPOKEN_LANGUAGE));
    fields.insert(
        "Language".to_string(),
        json!(entry.language.as_deref().unwrap_or_default()),
    );
    fields.insert("Stars".to_string(), json!(entry.total_stars));
    fields.insert("TodayStars".to_string(), json!(entry.period_stars));
    fields.insert("Forks".to_string(), json!(entry.forks));
    fields.insert(
        "Description".to_string(),
        json!(entry.description.as_deref().unwrap_or_default()),
    );
    fields.insert(
        "URL".to_string(),
        json!({ "link": entry.url(), "text": repo }),
    );
    fields.insert("Date".to_string(), Value::from(date_millis));
    fields.insert("Source".to_string(), json!(source));

    TableRow {
        key: RowKey {
            repo,
            date_millis,
            source,
        },
        fields,
    }
}

/// A row that could not be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub repo: String,
    pub error: String,
}

/// Outcome of one sync batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub failures: Vec<RowFailure>,
}

impl SyncReport {
    /// Number of rows written successfully
    pub fn written(&self) -> usize {
        self.created + self.updated
    }

    /// Returns true when every row was written
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Upsert {
    Created,
    Updated,
}

/// Writes leaderboard entries through a record store
pub struct TableSyncer<S> {
    store: S,
}

impl<S: RecordStore> TableSyncer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }

    /// Upserts every entry, continuing past failed rows
    pub async fn sync(&self, entries: &[LeaderboardEntry], snapshot: &Snapshot) -> SyncReport {
        let mut report = SyncReport::default();

        for entry in entries {
            let row = build_row(entry, snapshot);
            match self.upsert(&row).await {
                Ok(Upsert::Created) => report.created += 1,
                Ok(Upsert::Updated) => report.updated += 1,
                Err(e) => {
                    tracing::warn!(repo = %row.key.repo, error = %e, "Row sync failed, skipping");
                    report.failures.push(RowFailure {
                        repo: row.key.repo.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            written = report.written(),
            created = report.created,
            updated = report.updated,
            failed = report.failures.len(),
            "Table sync finished"
        );
        report
    }

    async fn upsert(&self, row: &TableRow) -> SyncResult<Upsert> {
        match self.store.find_record(&row.key).await? {
            Some(record_id) => {
                self.store.update_record(&record_id, row).await?;
                Ok(Upsert::Updated)
            }
            None => {
                self.store.create_record(row).await?;
                Ok(Upsert::Created)
            }
        }
    }
}

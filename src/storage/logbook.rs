//! Logbook: recommendation trials and their rating lifecycle.
//!
//! The whole collection lives under one key and every mutation is a
//! read-modify-write of the full array. A second key points at the single
//! pending record. Persistence is best-effort: public operations never fail,
//! they log and degrade (empty reads, skipped writes).

use std::time::Duration;

use jiff::{SignedDuration, Timestamp};

use crate::model::{GpsSnapshot, LogRecord, LogStatus, Observation, Rating, Recommendation, Token};

use super::{Result, Storage, StorageError};

/// Key holding the JSON array of all records.
pub const LOGS_KEY: &str = "layline-logs-v1";

/// Key holding the pending record's id.
pub const PENDING_ID_KEY: &str = "layline-pending-log-id-v1";

/// Record counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogCounts {
    pub all: usize,
    pub pending: usize,
    pub unrated: usize,
    pub rated: usize,
}

impl Storage {
    // ── Reads ──

    /// Loads every record. Missing, unreadable, or corrupt storage reads as empty.
    pub fn load_logs(&self) -> Vec<LogRecord> {
        self.try_load_logs().unwrap_or_else(|e| {
            log::warn!("log store unreadable, treating as empty: {e}");
            Vec::new()
        })
    }

    /// Looks up one record by exact id.
    pub fn log_by_id(&self, id: &str) -> Option<LogRecord> {
        self.load_logs().into_iter().find(|l| l.id == id)
    }

    /// Records newest first, optionally restricted to one status.
    pub fn list_logs(&self, status: Option<LogStatus>) -> Vec<LogRecord> {
        let mut logs: Vec<LogRecord> = self
            .load_logs()
            .into_iter()
            .filter(|l| status.is_none_or(|s| l.status == s))
            .collect();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        logs
    }

    pub fn log_counts(&self) -> LogCounts {
        self.load_logs()
            .iter()
            .fold(LogCounts::default(), |mut counts, l| {
                counts.all += 1;
                match l.status {
                    LogStatus::Pending => counts.pending += 1,
                    LogStatus::Unrated => counts.unrated += 1,
                    LogStatus::Rated => counts.rated += 1,
                }
                counts
            })
    }

    /// The id of the pending record, if it still exists and is still pending.
    pub fn pending_id(&self) -> Option<String> {
        let id = match self.read_key(PENDING_ID_KEY) {
            Ok(id) => id?,
            Err(e) => {
                log::warn!("pending pointer unreadable: {e}");
                return None;
            }
        };
        let id = id.trim().to_string();
        self.load_logs()
            .iter()
            .any(|l| l.id == id && l.status == LogStatus::Pending)
            .then_some(id)
    }

    // ── Lifecycle ──

    /// Records a new trial as pending and points the pending pointer at it.
    ///
    /// Returns the record even when it could not be persisted.
    pub fn create_pending<T: Token>(
        &self,
        page: &str,
        observation: &Observation<T>,
        recommendation: &Recommendation,
        gps: Option<GpsSnapshot>,
        logic_version: &str,
    ) -> LogRecord {
        let record = LogRecord::pending(
            page,
            observation,
            recommendation,
            gps,
            logic_version,
            Timestamp::now(),
        );
        match self.try_insert_pending(&record) {
            Ok(()) => log::debug!("created pending log {}", record.id),
            Err(e) => log::warn!("could not persist pending log {}: {e}", record.id),
        }
        record
    }

    /// Closes a pending record's feedback window.
    ///
    /// No-op unless the record exists and is pending, so a late timer
    /// never clobbers a rating.
    pub fn mark_unrated(&self, id: &str) {
        self.best_effort("mark unrated", || self.try_mark_unrated(id, Timestamp::now()));
    }

    /// Rates a record, pending or unrated.
    pub fn rate(&self, id: &str, rating: Rating) {
        self.best_effort("rate", || self.try_rate(id, rating));
    }

    /// Rates whatever the pending pointer references. Returns the rated id.
    pub fn rate_pending(&self, rating: Rating) -> Option<String> {
        let id = self.pending_id()?;
        self.rate(&id, rating);
        Some(id)
    }

    /// Removes a record.
    pub fn delete_log(&self, id: &str) {
        self.best_effort("delete", || self.try_delete(id));
    }

    /// Removes every record and the pending pointer.
    pub fn clear_logs(&self) {
        self.best_effort("clear", || {
            self.remove_key(LOGS_KEY)?;
            self.remove_key(PENDING_ID_KEY)
        });
    }

    /// Finalizes every pending record older than `timeout`.
    ///
    /// This is the lazy form of the pending timer for processes that do not
    /// stay resident for the whole window. Returns how many were finalized.
    pub fn finalize_expired(&self, now: Timestamp, timeout: Duration) -> usize {
        let timeout = SignedDuration::try_from(timeout).unwrap_or(SignedDuration::MAX);
        let expired: Vec<String> = self
            .load_logs()
            .into_iter()
            .filter(|l| l.status == LogStatus::Pending && now.duration_since(l.created_at) >= timeout)
            .map(|l| l.id)
            .collect();
        for id in &expired {
            self.best_effort("finalize", || self.try_mark_unrated(id, now));
        }
        if !expired.is_empty() {
            log::debug!("finalized {} expired pending log(s)", expired.len());
        }
        expired.len()
    }

    // ── Fallible internals ──

    fn try_load_logs(&self) -> Result<Vec<LogRecord>> {
        let json = match self.read_key(LOGS_KEY)? {
            Some(json) if !json.trim().is_empty() => json,
            _ => return Ok(Vec::new()),
        };
        match serde_json::from_str(&json)? {
            value @ serde_json::Value::Array(_) => Ok(serde_json::from_value(value)?),
            other => Err(StorageError::Corrupt {
                key: LOGS_KEY,
                reason: format!("expected a JSON array, found {}", json_kind(&other)),
            }),
        }
    }

    fn try_save_logs(&self, logs: &[LogRecord]) -> Result<()> {
        let json = serde_json::to_string(logs)?;
        self.write_key(LOGS_KEY, &json)
    }

    fn try_insert_pending(&self, record: &LogRecord) -> Result<()> {
        let mut logs = self.try_load_logs()?;
        logs.insert(0, record.clone());
        self.try_save_logs(&logs)?;
        self.write_key(PENDING_ID_KEY, &record.id)
    }

    fn try_mark_unrated(&self, id: &str, now: Timestamp) -> Result<()> {
        let mut logs = self.try_load_logs()?;
        let Some(record) = logs.iter_mut().find(|l| l.id == id) else {
            return Ok(());
        };
        if !record.finalize_unrated(now) {
            return Ok(());
        }
        self.try_save_logs(&logs)?;
        log::debug!("log {id} finalized as unrated");
        self.try_release_pointer(id)
    }

    fn try_rate(&self, id: &str, rating: Rating) -> Result<()> {
        let mut logs = self.try_load_logs()?;
        let Some(record) = logs.iter_mut().find(|l| l.id == id) else {
            return Ok(());
        };
        record.rate(rating, Timestamp::now());
        self.try_save_logs(&logs)?;
        log::debug!("log {id} rated {rating}");
        self.try_release_pointer(id)
    }

    fn try_delete(&self, id: &str) -> Result<()> {
        let mut logs = self.try_load_logs()?;
        let before = logs.len();
        logs.retain(|l| l.id != id);
        if logs.len() != before {
            self.try_save_logs(&logs)?;
            log::debug!("log {id} deleted");
        }
        self.try_release_pointer(id)
    }

    /// Clears the pending pointer if it references `id`.
    fn try_release_pointer(&self, id: &str) -> Result<()> {
        if self.read_key(PENDING_ID_KEY)?.as_deref().map(str::trim) == Some(id) {
            self.remove_key(PENDING_ID_KEY)?;
        }
        Ok(())
    }

    fn best_effort(&self, what: &str, op: impl FnOnce() -> Result<()>) {
        if let Err(e) = op() {
            log::warn!("log store {what} failed: {e}");
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use crate::engine::{Jib, Sail, evaluate};
    use crate::model::{CarPosition, JibTelltales, SailMode};
    use crate::storage::test_support::test_storage;

    fn observation() -> Observation<JibTelltales> {
        Observation {
            wind_speed_kt: Some(10.0),
            telltales: JibTelltales::LeewardStalled,
            car_position: Some(CarPosition::clamped(5.0)),
            ..Observation::default()
        }
    }

    fn create(storage: &Storage) -> LogRecord {
        let obs = observation();
        let evaluation = evaluate::<Jib>(&obs);
        storage.create_pending(
            Jib::PAGE,
            &obs,
            &evaluation.recommendation,
            None,
            Jib::LOGIC_VERSION,
        )
    }

    fn assert_lifecycle_invariants(storage: &Storage) {
        let logs = storage.load_logs();
        for l in &logs {
            assert_eq!(l.rating.is_some(), l.status == LogStatus::Rated, "{}", l.id);
            if let (Some(before), Some(suggested), Some(delta)) =
                (l.car_before, l.car_suggested, l.car_delta)
            {
                assert_eq!(before.delta_to(suggested), delta);
            }
        }
        if let Some(raw) = storage.read_key(PENDING_ID_KEY).unwrap() {
            let pointed = logs.iter().find(|l| l.id == raw).unwrap();
            assert_eq!(pointed.status, LogStatus::Pending);
        }
    }

    #[test]
    fn create_pending_sets_pointer() {
        let (_dir, storage) = test_storage();
        let record = create(&storage);

        assert_eq!(record.status, LogStatus::Pending);
        assert_eq!(record.car_suggested.map(CarPosition::get), Some(6));
        assert_eq!(record.car_delta, Some(1));
        assert_eq!(storage.pending_id().as_deref(), Some(record.id.as_str()));
        assert_eq!(storage.load_logs().len(), 1);
        assert_lifecycle_invariants(&storage);
    }

    #[test]
    fn newest_pending_replaces_pointer() {
        let (_dir, storage) = test_storage();
        let first = create(&storage);
        let second = create(&storage);

        assert_eq!(storage.pending_id().as_deref(), Some(second.id.as_str()));
        assert_eq!(
            storage.log_by_id(&first.id).unwrap().status,
            LogStatus::Pending
        );
        assert_lifecycle_invariants(&storage);
    }

    #[test]
    fn rate_before_timeout_then_late_timer_is_noop() {
        let (_dir, storage) = test_storage();
        let record = create(&storage);

        storage.rate(&record.id, Rating::Better);
        let rated = storage.log_by_id(&record.id).unwrap();
        assert_eq!(rated.status, LogStatus::Rated);
        assert_eq!(rated.rating, Some(Rating::Better));
        assert!(storage.pending_id().is_none());
        assert!(storage.read_key(PENDING_ID_KEY).unwrap().is_none());

        storage.mark_unrated(&record.id);
        let still = storage.log_by_id(&record.id).unwrap();
        assert_eq!(still.status, LogStatus::Rated);
        assert!(still.auto_finalized_at.is_none());
        assert_lifecycle_invariants(&storage);
    }

    #[test]
    fn unrated_can_still_be_rated() {
        let (_dir, storage) = test_storage();
        let record = create(&storage);

        storage.mark_unrated(&record.id);
        let unrated = storage.log_by_id(&record.id).unwrap();
        assert_eq!(unrated.status, LogStatus::Unrated);
        assert!(unrated.auto_finalized_at.is_some());
        assert!(storage.pending_id().is_none());

        storage.rate(&record.id, Rating::Worse);
        let rated = storage.log_by_id(&record.id).unwrap();
        assert_eq!(rated.status, LogStatus::Rated);
        assert_eq!(rated.rating, Some(Rating::Worse));
        assert_lifecycle_invariants(&storage);
    }

    #[test]
    fn rate_pending_uses_pointer() {
        let (_dir, storage) = test_storage();
        let record = create(&storage);

        assert_eq!(
            storage.rate_pending(Rating::Same).as_deref(),
            Some(record.id.as_str())
        );
        assert!(storage.rate_pending(Rating::Same).is_none());
    }

    #[test]
    fn unknown_ids_are_silent_noops() {
        let (_dir, storage) = test_storage();
        let record = create(&storage);

        storage.rate("nope", Rating::Better);
        storage.mark_unrated("nope");
        storage.delete_log("nope");

        assert_eq!(storage.load_logs().len(), 1);
        assert_eq!(storage.pending_id().as_deref(), Some(record.id.as_str()));
    }

    #[test]
    fn delete_clears_pointer() {
        let (_dir, storage) = test_storage();
        let record = create(&storage);

        storage.delete_log(&record.id);
        assert!(storage.load_logs().is_empty());
        assert!(storage.read_key(PENDING_ID_KEY).unwrap().is_none());
    }

    #[test]
    fn delete_other_record_keeps_pointer() {
        let (_dir, storage) = test_storage();
        let old = create(&storage);
        let current = create(&storage);

        storage.delete_log(&old.id);
        assert_eq!(storage.pending_id().as_deref(), Some(current.id.as_str()));
    }

    #[test]
    fn clear_removes_everything() {
        let (_dir, storage) = test_storage();
        create(&storage);
        create(&storage);

        storage.clear_logs();
        assert!(storage.load_logs().is_empty());
        assert!(storage.pending_id().is_none());
        assert_eq!(storage.log_counts(), LogCounts::default());
    }

    #[test]
    fn list_filters_and_sorts_newest_first() {
        let (_dir, storage) = test_storage();
        let a = create(&storage);
        let b = create(&storage);
        let c = create(&storage);
        storage.rate(&a.id, Rating::Better);
        storage.mark_unrated(&b.id);

        let all = storage.list_logs(None);
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let rated = storage.list_logs(Some(LogStatus::Rated));
        assert_eq!(rated.len(), 1);
        assert_eq!(rated[0].id, a.id);

        let counts = storage.log_counts();
        assert_eq!(
            counts,
            LogCounts {
                all: 3,
                pending: 1,
                unrated: 1,
                rated: 1
            }
        );
        assert_eq!(storage.pending_id().as_deref(), Some(c.id.as_str()));
    }

    #[test]
    fn finalize_expired_respects_timeout() {
        let (_dir, storage) = test_storage();
        let record = create(&storage);
        let timeout = Duration::from_secs(120);

        assert_eq!(storage.finalize_expired(record.created_at, timeout), 0);

        let later = record.created_at + SignedDuration::from_secs(121);
        assert_eq!(storage.finalize_expired(later, timeout), 1);
        let finalized = storage.log_by_id(&record.id).unwrap();
        assert_eq!(finalized.status, LogStatus::Unrated);
        assert_eq!(finalized.auto_finalized_at, Some(later));
        assert!(storage.pending_id().is_none());
        assert_lifecycle_invariants(&storage);
    }

    #[test]
    fn corrupt_store_reads_empty_and_recovers() {
        let (_dir, storage) = test_storage();
        storage.write_key(LOGS_KEY, "{not json").unwrap();
        assert!(storage.load_logs().is_empty());

        // Writes against a corrupt store are skipped rather than clobbering it.
        let record = create(&storage);
        assert_eq!(record.status, LogStatus::Pending);
        assert_eq!(
            storage.read_key(LOGS_KEY).unwrap().as_deref(),
            Some("{not json")
        );

        storage.clear_logs();
        create(&storage);
        assert_eq!(storage.load_logs().len(), 1);
    }

    #[test]
    fn non_array_store_is_corrupt_and_reads_empty() {
        let (_dir, storage) = test_storage();
        storage.write_key(LOGS_KEY, "{\"a\": 1}").unwrap();
        assert!(matches!(
            storage.try_load_logs(),
            Err(StorageError::Corrupt { key: LOGS_KEY, .. })
        ));
        assert!(storage.load_logs().is_empty());

        storage.write_key(LOGS_KEY, "42").unwrap();
        let err = storage.try_load_logs().unwrap_err();
        assert!(err.to_string().contains("found a number"));
    }

    #[test]
    fn unavailable_store_degrades() {
        let (dir, storage) = test_storage();
        fs::remove_dir_all(dir.path().join("data")).unwrap();

        let record = create(&storage);
        assert_eq!(record.status, LogStatus::Pending);
        assert!(storage.load_logs().is_empty());
        assert!(storage.pending_id().is_none());
        storage.rate(&record.id, Rating::Better);
        storage.clear_logs();
    }

    #[test]
    fn dangling_pointer_is_ignored() {
        let (_dir, storage) = test_storage();
        storage.write_key(PENDING_ID_KEY, "ghost").unwrap();
        assert!(storage.pending_id().is_none());
        assert!(storage.rate_pending(Rating::Better).is_none());
    }

    #[test]
    fn downwind_record_has_no_boat_mode() {
        let (_dir, storage) = test_storage();
        let mut obs = observation();
        obs.sail_mode = SailMode::Downwind;
        let evaluation = evaluate::<Jib>(&obs);
        let record = storage.create_pending(
            Jib::PAGE,
            &obs,
            &evaluation.recommendation,
            None,
            Jib::LOGIC_VERSION,
        );
        assert!(storage.log_by_id(&record.id).unwrap().boat_mode.is_none());
    }
}

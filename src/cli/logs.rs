//! Log review commands: list, rate, delete, clear, export.
//!
//! Records are referenced by full id or unambiguous prefix (e.g. `a3b`).

use std::fs;
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::model::{LogRecord, LogStatus, Rating};
use crate::storage::Storage;

use super::format::{format_counts, format_log_line, short_id};

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// List trials, newest first.
    List {
        /// Only show trials with this status.
        #[arg(long)]
        status: Option<LogStatus>,
    },

    /// Rate a trial: better, same, or worse.
    ///
    /// Works on pending and unrated trials, and re-rates rated ones.
    Rate {
        /// How the change felt.
        rating: Rating,

        /// Trial id: full id or unambiguous prefix.
        #[arg(required_unless_present = "pending", conflicts_with = "pending")]
        id: Option<String>,

        /// Rate the current pending trial.
        #[arg(long)]
        pending: bool,
    },

    /// Delete one trial.
    Delete {
        /// Trial id: full id or unambiguous prefix.
        id: String,
    },

    /// Delete every trial.
    Clear {
        /// Confirm deleting everything.
        #[arg(long)]
        yes: bool,
    },

    /// Export every trial.
    ///
    /// Written to `--out` (if given) or stdout.
    Export {
        format: ExportFormat,

        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// Full-fidelity JSON array.
    Json,
    /// Flat table, one row per trial.
    Csv,
}

pub(super) fn run(storage: &Storage, command: LogsCommand) -> Result<(), String> {
    match command {
        LogsCommand::List { status } => cmd_list(storage, status),
        LogsCommand::Rate {
            rating,
            id,
            pending,
        } => match (id, pending) {
            (_, true) => cmd_rate_pending(storage, rating),
            (Some(id), false) => cmd_rate(storage, &id, rating),
            (None, false) => Err("specify a trial id or --pending".to_string()),
        },
        LogsCommand::Delete { id } => cmd_delete(storage, &id),
        LogsCommand::Clear { yes } => cmd_clear(storage, yes),
        LogsCommand::Export { format, out } => cmd_export(storage, format, out),
    }
}

fn cmd_list(storage: &Storage, status: Option<LogStatus>) -> Result<(), String> {
    println!("{}", format_counts(&storage.log_counts()));

    let logs = storage.list_logs(status);
    if logs.is_empty() {
        println!("No logs");
        return Ok(());
    }
    for record in &logs {
        println!("{}", format_log_line(record));
    }
    Ok(())
}

fn cmd_rate(storage: &Storage, reference: &str, rating: Rating) -> Result<(), String> {
    let record = resolve_log(storage, reference)?;
    storage.rate(&record.id, rating);
    eprintln!("Rated {} {rating}", short_id(&record.id));
    Ok(())
}

fn cmd_rate_pending(storage: &Storage, rating: Rating) -> Result<(), String> {
    let id = storage
        .rate_pending(rating)
        .ok_or("no pending trial: it may have timed out, rate it by id instead")?;
    eprintln!("Rated {} {rating}", short_id(&id));
    Ok(())
}

fn cmd_delete(storage: &Storage, reference: &str) -> Result<(), String> {
    let record = resolve_log(storage, reference)?;
    storage.delete_log(&record.id);
    eprintln!("Deleted {}", short_id(&record.id));
    Ok(())
}

fn cmd_clear(storage: &Storage, yes: bool) -> Result<(), String> {
    let count = storage.log_counts().all;
    if !yes {
        return Err(format!("refusing to delete {count} log(s) without --yes"));
    }
    storage.clear_logs();
    eprintln!("Deleted {count} log(s)");
    Ok(())
}

fn cmd_export(
    storage: &Storage,
    format: ExportFormat,
    out: Option<PathBuf>,
) -> Result<(), String> {
    let text = match format {
        ExportFormat::Json => storage
            .export_json()
            .map_err(|e| format!("failed to serialize logs: {e}"))?,
        ExportFormat::Csv => storage
            .export_csv()
            .map_err(|e| format!("failed to write CSV: {e}"))?,
    };

    match out {
        Some(path) => {
            fs::write(&path, &text)
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
            eprintln!(
                "Exported {} log(s) → {}",
                storage.log_counts().all,
                path.display()
            );
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Resolve a trial reference (full id or unambiguous prefix) to a record.
fn resolve_log(storage: &Storage, reference: &str) -> Result<LogRecord, String> {
    if let Some(record) = storage.log_by_id(reference) {
        return Ok(record);
    }

    let logs = storage.load_logs();
    let matches: Vec<&LogRecord> = logs
        .iter()
        .filter(|l| !reference.is_empty() && l.id.starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no log matching '{reference}'")),
        [record] => Ok((*record).clone()),
        many => {
            let ids: Vec<&str> = many.iter().map(|l| short_id(&l.id)).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {} logs: {}",
                many.len(),
                ids.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::engine::Jib;
    use crate::model::{JibTelltales, Observation};
    use crate::storage::test_support::test_storage;
    use crate::trial;

    fn log_one(storage: &Storage) -> LogRecord {
        let observation = Observation {
            telltales: JibTelltales::AllFlowing,
            ..Observation::default()
        };
        let advice = trial::advise::<Jib>(storage, &observation);
        trial::record::<Jib>(storage, &observation, &advice, None)
    }

    #[test]
    fn resolves_full_id_and_prefix() {
        let (_dir, storage) = test_storage();
        let record = log_one(&storage);
        assert_eq!(resolve_log(&storage, &record.id).unwrap().id, record.id);
        assert_eq!(resolve_log(&storage, &record.id[..6]).unwrap().id, record.id);
    }

    #[test]
    fn unknown_and_empty_references_fail() {
        let (_dir, storage) = test_storage();
        log_one(&storage);
        assert!(resolve_log(&storage, "zzzz").unwrap_err().contains("no log"));
        assert!(resolve_log(&storage, "").is_err());
    }

    #[test]
    fn rate_by_prefix() {
        let (_dir, storage) = test_storage();
        let record = log_one(&storage);
        cmd_rate(&storage, &record.id[..8], Rating::Worse).unwrap();
        let stored = storage.log_by_id(&record.id).unwrap();
        assert_eq!(stored.status, LogStatus::Rated);
        assert_eq!(stored.rating, Some(Rating::Worse));
    }

    #[test]
    fn rate_pending_without_pending_fails() {
        let (_dir, storage) = test_storage();
        assert!(cmd_rate_pending(&storage, Rating::Better).is_err());
        log_one(&storage);
        cmd_rate_pending(&storage, Rating::Better).unwrap();
        assert!(storage.pending_id().is_none());
    }

    #[test]
    fn clear_requires_confirmation() {
        let (_dir, storage) = test_storage();
        log_one(&storage);
        assert!(cmd_clear(&storage, false).is_err());
        assert_eq!(storage.load_logs().len(), 1);
        cmd_clear(&storage, true).unwrap();
        assert!(storage.load_logs().is_empty());
    }

    #[test]
    fn export_writes_file() {
        let (_dir, storage) = test_storage();
        log_one(&storage);
        let out = TempDir::new().unwrap();
        let path = out.path().join("logs.csv");
        cmd_export(&storage, ExportFormat::Csv, Some(path.clone())).unwrap();
        let csv = fs::read_to_string(path).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.starts_with("id,createdAtISO"));
    }

    #[test]
    fn delete_by_prefix() {
        let (_dir, storage) = test_storage();
        let keep = log_one(&storage);
        let gone = log_one(&storage);
        cmd_delete(&storage, &gone.id[..8]).unwrap();
        let remaining: Vec<String> = storage.load_logs().into_iter().map(|l| l.id).collect();
        assert_eq!(remaining, vec![keep.id]);
    }
}

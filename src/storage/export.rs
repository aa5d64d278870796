//! Log exports: full-fidelity JSON and a flat CSV table.

use std::fmt::Display;

use crate::model::{GpsSnapshot, LogRecord};

use super::logbook::LOGS_KEY;
use super::{Result, Storage, StorageError};

/// CSV columns, in order.
pub const CSV_HEADER: &str = "id,createdAtISO,updatedAtISO,status,rating,page,sailMode,\
windDirTrueFromDeg,windSpeedKt,boatMode,symptom,telltales,carBefore,carSuggested,carDelta,\
cogDeg,sogMps,accuracyM,lat,lon,logicVersion,call,why,next,ifthen";

impl Storage {
    /// Pretty-printed JSON array of every stored record.
    pub fn export_json(&self) -> Result<String> {
        to_json(&self.load_logs())
    }

    /// Every stored record as CSV, header first.
    pub fn export_csv(&self) -> Result<String> {
        to_csv(&self.load_logs())
    }
}

pub fn to_json(logs: &[LogRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(logs)?)
}

/// Renders records as CSV. The header is bare; every row field is quoted
/// and absent values are empty. Rows end in `\n` except the last.
pub fn to_csv(logs: &[LogRecord]) -> Result<String> {
    let mut out = CSV_HEADER.as_bytes().to_vec();
    out.push(b'\n');

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    for l in logs {
        writer.write_record(csv_row(l))?;
    }
    let mut out = writer.into_inner().map_err(csv::IntoInnerError::into_error)?;

    out.pop();
    String::from_utf8(out).map_err(|e| StorageError::Corrupt {
        key: LOGS_KEY,
        reason: format!("export is not UTF-8: {e}"),
    })
}

fn csv_row(l: &LogRecord) -> [String; 25] {
    let GpsSnapshot {
        lat,
        lon,
        cog_deg,
        sog_mps,
        accuracy_m,
    } = l.gps.unwrap_or_default();

    [
        l.id.clone(),
        l.created_at.to_string(),
        l.updated_at.to_string(),
        l.status.to_string(),
        opt(l.rating),
        l.page.clone(),
        l.sail_mode.to_string(),
        opt(l.wind_dir_true_from_deg),
        opt(l.wind_speed_kt),
        opt(l.boat_mode),
        l.symptom.to_string(),
        l.telltales.clone(),
        opt(l.car_before),
        opt(l.car_suggested),
        opt(l.car_delta),
        opt(cog_deg),
        opt(sog_mps),
        opt(accuracy_m),
        opt(lat),
        opt(lon),
        l.logic_version.clone(),
        l.recommendation.call.clone(),
        l.recommendation.why.clone(),
        l.recommendation.next.clone(),
        l.recommendation.if_then.clone(),
    ]
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

//! One-shot trim commands: `jib` and `main`.
//!
//! Inputs not given on the command line come from the last session. Each run
//! prints the advice, logs it as the new pending trial, and saves the inputs
//! back for next time.

use clap::Args;

use crate::engine::{Jib, Mainsail, Sail};
use crate::geometry::wrap_angle;
use crate::model::{BoatMode, GpsSnapshot, JibTelltales, MainTelltales, SailMode, Symptom};
use crate::session::Session;
use crate::storage::Storage;
use crate::trial;

use super::format::{format_advice, short_id};

#[derive(Debug, Args)]
pub struct JibArgs {
    /// Telltale reading (e.g. `leeward_stalled`, `all_flowing`).
    #[arg(default_value = "unknown")]
    pub telltales: JibTelltales,

    /// Jib car position, 1 (forward) to 24 (aft).
    /// Defaults to the last position used.
    #[arg(long)]
    pub car: Option<String>,

    #[command(flatten)]
    pub conditions: ConditionArgs,
}

#[derive(Debug, Args)]
pub struct MainArgs {
    /// Leech telltale reading (e.g. `balanced`, `too_closed`).
    #[arg(default_value = "unknown")]
    pub telltales: MainTelltales,

    #[command(flatten)]
    pub conditions: ConditionArgs,
}

/// Conditions shared by both sails.
#[derive(Debug, Args)]
pub struct ConditionArgs {
    /// Sail mode. Defaults to the last one used, or to what the course says.
    #[arg(long)]
    pub mode: Option<SailMode>,

    /// Direction the true wind blows from, in degrees. Empty clears it.
    #[arg(long, allow_hyphen_values = true)]
    pub wind_dir: Option<String>,

    /// True wind speed in knots. Empty clears it.
    #[arg(long)]
    pub wind_speed: Option<String>,

    /// Upwind intent.
    #[arg(long, default_value = "speed")]
    pub boat: BoatMode,

    /// What the boat feels like.
    #[arg(long, default_value = "normal")]
    pub symptom: Symptom,

    #[command(flatten)]
    pub gps: GpsArgs,

    /// Show the advice without logging a trial.
    #[arg(long)]
    pub no_log: bool,
}

/// A GPS reading supplied by hand or by a script.
#[derive(Debug, Args)]
pub struct GpsArgs {
    /// Course over ground, degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub cog: Option<f64>,

    /// Speed over ground, m/s.
    #[arg(long)]
    pub sog: Option<f64>,

    /// Position accuracy, meters.
    #[arg(long)]
    pub accuracy: Option<f64>,

    /// Latitude to record with the trial.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude to record with the trial.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl GpsArgs {
    /// The snapshot to store, or `None` when nothing was given.
    pub fn snapshot(&self) -> Option<GpsSnapshot> {
        let finite = |v: Option<f64>| v.filter(|n| n.is_finite());
        let snapshot = GpsSnapshot {
            lat: finite(self.lat),
            lon: finite(self.lon),
            cog_deg: finite(self.cog).map(wrap_angle),
            sog_mps: finite(self.sog),
            accuracy_m: finite(self.accuracy),
        };
        (snapshot != GpsSnapshot::default()).then_some(snapshot)
    }
}

impl ConditionArgs {
    /// Folds the given inputs into the session.
    ///
    /// Invalid numbers are reported and skipped. An explicit `--mode`
    /// overrides what the course implies.
    fn apply(&self, session: &mut Session, gps: Option<&GpsSnapshot>) {
        if let Some(dir) = &self.wind_dir {
            session.set_wind_direction(dir);
        }
        if let Some(speed) = &self.wind_speed {
            session.set_wind_speed(speed);
        }
        if let Some(mode) = session.apply_course(gps.and_then(|g| g.cog_deg)) {
            eprintln!("Course over ground reads {mode}");
        }
        if let Some(mode) = self.mode {
            session.sail_mode = mode;
        }
        session.boat_mode = self.boat;
        session.symptom = self.symptom;
    }
}

pub(super) fn cmd_jib(storage: &Storage, args: &JibArgs) -> Result<(), String> {
    let mut session = Session::load(storage);
    if let Some(car) = &args.car {
        session.set_car_position(car);
    }
    cmd_trim::<Jib>(storage, session, &args.conditions, args.telltales)
}

pub(super) fn cmd_main(storage: &Storage, args: &MainArgs) -> Result<(), String> {
    let session = Session::load(storage);
    cmd_trim::<Mainsail>(storage, session, &args.conditions, args.telltales)
}

fn cmd_trim<S: Sail>(
    storage: &Storage,
    mut session: Session,
    conditions: &ConditionArgs,
    telltales: S::Telltales,
) -> Result<(), String> {
    let gps = conditions.gps.snapshot();
    conditions.apply(&mut session, gps.as_ref());

    let observation = session.observation(telltales, S::HAS_CAR);
    let advice = trial::advise::<S>(storage, &observation);
    println!("{}", format_advice(&advice, observation.car_position));

    if !conditions.no_log {
        let record = trial::record::<S>(storage, &observation, &advice, gps);
        eprintln!(
            "Logged {} as pending. Rate it with: layline logs rate --pending <better|same|worse>",
            short_id(&record.id)
        );
    }

    session.save(storage);
    Ok(())
}

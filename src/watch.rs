//! Interactive watch mode: a line-oriented trim session.
//!
//! Every input change reprints the advice immediately and is queued in a
//! debouncer; once edits go quiet the latest state is logged as the new
//! pending trial and the pending timer is armed. The timer finalizes the
//! trial unrated if it is not rated first.
//!
//! A reader thread forwards stdin lines over a channel. Everything else
//! (evaluation, log mutation, timers) runs on the loop thread.

use std::io;
use std::marker::PhantomData;
use std::ops::ControlFlow;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::cli::format::{format_advice, format_conditions, short_id};
use crate::debounce::{Debouncer, PendingTimer};
use crate::engine::Sail;
use crate::gps::{CourseTracker, Fix, GpsFailure};
use crate::model::{
    BoatMode, GpsPermission, Observation, Rating, SailMode, Symptom, Token, parse_token,
};
use crate::session::Session;
use crate::storage::Storage;
use crate::trial;

const HELP: &str = "Commands:
  wind-dir [deg]         true wind direction (blank clears)
  wind-speed [kt]        true wind speed (blank clears)
  car <1-24>             jib car position
  mode <upwind|downwind>
  boat <speed|pointing|control>
  symptom <normal|slow|pinching|overpowered|badair|cant_hold_lane>
  telltales <reading>
  fix <lat> <lon> [cog] [sog] [accuracy]
  fix <denied|unavailable|timeout>
  rate <better|same|worse>   rate the pending trial
  show                   reprint the advice
  help
  quit";

#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Quiet period before an edit is logged.
    pub debounce: Duration,
    /// How long a logged trial waits for a rating.
    pub pending_timeout: Duration,
    /// Store lat/lon with each trial.
    pub record_position: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Command<T> {
    WindDir(String),
    WindSpeed(String),
    Car(String),
    Mode(SailMode),
    Boat(BoatMode),
    Symptom(Symptom),
    Telltales(T),
    Fix(Fix),
    FixFailed(GpsFailure),
    Rate(Rating),
    Show,
    Help,
    Quit,
}

enum Event {
    Line(String),
    Closed,
}

/// Parses one input line. Blank lines parse to `None`.
fn parse_command<T: Token>(line: &str) -> Result<Option<Command<T>>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();
    let arg = rest.first().copied().unwrap_or_default();

    let command = match head.to_ascii_lowercase().as_str() {
        "wind-dir" | "wd" => Command::WindDir(arg.to_string()),
        "wind-speed" | "ws" => Command::WindSpeed(arg.to_string()),
        "car" => Command::Car(arg.to_string()),
        "mode" => Command::Mode(parse_token(arg)?),
        "boat" => Command::Boat(parse_token(arg)?),
        "symptom" => Command::Symptom(parse_token(arg)?),
        "telltales" | "tt" => Command::Telltales(parse_token(arg)?),
        "fix" => parse_fix(&rest)?,
        "rate" => Command::Rate(parse_token(arg)?),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

fn parse_fix<T>(args: &[&str]) -> Result<Command<T>, String> {
    match args {
        ["denied"] => return Ok(Command::FixFailed(GpsFailure::PermissionDenied)),
        ["unavailable"] => return Ok(Command::FixFailed(GpsFailure::PositionUnavailable)),
        ["timeout"] => return Ok(Command::FixFailed(GpsFailure::Timeout)),
        _ => {}
    }

    let numbers = args
        .iter()
        .map(|a| {
            a.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| format!("invalid number '{a}' in fix"))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    match numbers.as_slice() {
        [lat, lon, optional @ ..] if optional.len() <= 3 => Ok(Command::Fix(Fix {
            lat: *lat,
            lon: *lon,
            heading_deg: optional.first().copied(),
            speed_mps: optional.get(1).copied(),
            accuracy_m: optional.get(2).copied(),
        })),
        _ => Err("usage: fix <lat> <lon> [cog] [sog] [accuracy]".to_string()),
    }
}

/// Session state for one sail, plus the two timers.
struct Watch<'a, S: Sail> {
    storage: &'a Storage,
    session: Session,
    telltales: S::Telltales,
    tracker: CourseTracker,
    debouncer: Debouncer<Observation<S::Telltales>>,
    timer: PendingTimer,
    record_position: bool,
    sail: PhantomData<S>,
}

impl<'a, S: Sail> Watch<'a, S> {
    fn new(storage: &'a Storage, options: &WatchOptions) -> Self {
        Self {
            storage,
            session: Session::load(storage),
            telltales: S::Telltales::default(),
            tracker: CourseTracker::new(),
            debouncer: Debouncer::new(options.debounce),
            timer: PendingTimer::new(options.pending_timeout),
            record_position: options.record_position,
            sail: PhantomData,
        }
    }

    fn observation(&self) -> Observation<S::Telltales> {
        self.session.observation(self.telltales, S::HAS_CAR)
    }

    fn show(&self) {
        println!(
            "{}",
            format_conditions(
                self.session.wind_direction_deg(),
                self.session.wind_speed_kt(),
                S::HAS_CAR.then(|| self.session.car_position()),
            )
        );

        let observation = self.observation();
        let advice = trial::advise::<S>(self.storage, &observation);
        println!("{}", format_advice(&advice, observation.car_position));

        let course = self.tracker.state();
        if let Some(error) = &course.error {
            println!("GPS:        {error}");
        } else if let Some(cog) = course.cog_deg {
            println!("GPS:        COG {cog:.0}°");
        }
    }

    /// An input changed: persist it, show fresh advice, and queue a trial.
    fn changed(&mut self, now: Instant) {
        self.session.save(self.storage);
        self.show();
        self.debouncer.push(now, self.observation());
    }

    fn handle(&mut self, now: Instant, command: Command<S::Telltales>) -> ControlFlow<()> {
        let changed = match command {
            Command::WindDir(text) => self.session.set_wind_direction(&text),
            Command::WindSpeed(text) => self.session.set_wind_speed(&text),
            Command::Car(text) if S::HAS_CAR => self.session.set_car_position(&text),
            Command::Car(_) => {
                eprintln!("the {} has no car", S::NAME);
                false
            }
            Command::Mode(mode) => {
                self.session.sail_mode = mode;
                true
            }
            Command::Boat(mode) => {
                self.session.boat_mode = mode;
                true
            }
            Command::Symptom(symptom) => {
                self.session.symptom = symptom;
                true
            }
            Command::Telltales(reading) => {
                self.telltales = reading;
                true
            }
            Command::Fix(fix) => {
                self.tracker.update(fix);
                let switched = self.session.apply_course(self.tracker.state().cog_deg);
                if let Some(mode) = switched {
                    println!("Course over ground reads {mode}");
                }
                switched.is_some()
            }
            Command::FixFailed(failure) => {
                let message = match failure {
                    GpsFailure::PermissionDenied => "location permission denied",
                    GpsFailure::PositionUnavailable => "position unavailable",
                    GpsFailure::Timeout => "position request timed out",
                };
                self.tracker.fail(failure, message);
                eprintln!("GPS: {message}");
                false
            }
            Command::Rate(rating) => {
                self.rate(rating);
                false
            }
            Command::Show => {
                self.show();
                false
            }
            Command::Help => {
                println!("{HELP}");
                false
            }
            Command::Quit => return ControlFlow::Break(()),
        };

        if changed {
            self.changed(now);
        }
        ControlFlow::Continue(())
    }

    fn rate(&mut self, rating: Rating) {
        match self.storage.rate_pending(rating) {
            Some(id) => {
                self.timer.cancel(&id);
                println!("Rated {} {rating}", short_id(&id));
            }
            None => eprintln!("no pending trial to rate"),
        }
    }

    /// Fires whatever is due: a quiet debounce logs a trial, an expired
    /// timer finalizes one.
    fn tick(&mut self, now: Instant) {
        if let Some(observation) = self.debouncer.poll(now) {
            let advice = trial::advise::<S>(self.storage, &observation);
            let gps = (self.tracker.state().permission == GpsPermission::Granted)
                .then(|| self.tracker.snapshot(self.record_position));
            let record = trial::record::<S>(self.storage, &observation, &advice, gps);
            self.timer.arm(now, record.id.clone());
            println!("Logged {} as pending", short_id(&record.id));
        }

        if let Some(id) = self.timer.poll(now) {
            self.storage.mark_unrated(&id);
            println!("Trial {} closed unrated", short_id(&id));
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        [self.debouncer.deadline(), self.timer.deadline()]
            .into_iter()
            .flatten()
            .min()
    }
}

/// Runs the session until `quit` or end of input.
///
/// An edit still inside its quiet window at exit is dropped. A trial still
/// pending at exit is finalized by the expiry sweep of a later run.
pub fn run<S: Sail>(storage: &Storage, options: &WatchOptions) {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(Event::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::Closed);
    });

    let mut watch = Watch::<S>::new(storage, options);
    println!("Watching {} trim. Type 'help' for commands.", S::NAME);
    watch.show();

    loop {
        let now = Instant::now();
        watch.tick(now);

        let event = match watch.next_deadline() {
            Some(deadline) => match rx.recv_timeout(deadline.saturating_duration_since(now)) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => Event::Closed,
            },
            None => rx.recv().unwrap_or(Event::Closed),
        };

        let line = match event {
            Event::Line(line) => line,
            Event::Closed => break,
        };
        match parse_command::<S::Telltales>(&line) {
            Ok(Some(command)) => {
                if watch.handle(Instant::now(), command).is_break() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("{e}"),
        }
    }

    if !watch.debouncer.is_idle() {
        log::debug!("dropping unlogged edit at exit");
    }
}

//! CLI interface for Layline.
//!
//! Commands split into two groups:
//!
//! - `layline jib|main|watch`: get trim advice, logging each trial as pending.
//! - `layline logs ...`: review, rate, and export past trials.
//!
//! Every invocation first finalizes pending trials whose feedback window
//! has passed.

pub(crate) mod format;
mod logs;
mod trim;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use jiff::Timestamp;

use crate::config::Config;
use crate::engine::{Jib, Mainsail};
use crate::storage::Storage;
use crate::watch::{self, WatchOptions};

use logs::LogsCommand;
use trim::{JibArgs, MainArgs};

/// Layline: sail trim advice that learns which calls worked.
#[derive(Debug, Parser)]
#[command(name = "layline", version, after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Directory holding logs and preferences.
    /// Overrides `LAYLINE_DATA_DIR` and the config file.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: one trim trial
  1. layline jib leeward_stalled --car 5 --wind-speed 11
     → prints the call and logs it as pending
  2. make the change, sail for a minute
  3. layline logs rate better --pending

Trials left unrated are closed after the pending timeout.

Interactive:
  layline watch jib
  > ws 14
  > tt top_stalled_bottom_flowing
  > rate same";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Jib trim advice from telltales, car position, and conditions.
    Jib(JibArgs),

    /// Mainsail trim advice from leech telltales and conditions.
    Main(MainArgs),

    /// Interactive session: edits are debounced into trials.
    Watch {
        sail: SailArg,

        /// Store latitude and longitude with each trial.
        #[arg(long)]
        record_position: bool,
    },

    /// Review and rate past trials.
    Logs {
        #[command(subcommand)]
        command: LogsCommand,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SailArg {
    Jib,
    Main,
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    let root = config.resolve_data_dir(cli.data_dir.as_deref())?;
    let storage = Storage::new(root);

    let finalized = storage.finalize_expired(Timestamp::now(), config.pending_timeout());
    if finalized > 0 {
        eprintln!("Closed {finalized} trial(s) unrated after the feedback window");
    }

    match cli.command {
        Command::Jib(args) => trim::cmd_jib(&storage, &args),
        Command::Main(args) => trim::cmd_main(&storage, &args),
        Command::Watch {
            sail,
            record_position,
        } => {
            let options = WatchOptions {
                debounce: config.debounce(),
                pending_timeout: config.pending_timeout(),
                record_position,
            };
            match sail {
                SailArg::Jib => watch::run::<Jib>(&storage, &options),
                SailArg::Main => watch::run::<Mainsail>(&storage, &options),
            }
            Ok(())
        }
        Command::Logs { command } => logs::run(&storage, command),
    }
}

mod cli;
mod confidence;
mod config;
mod course;
mod debounce;
mod engine;
mod geometry;
mod gps;
mod model;
mod session;
mod storage;
mod trial;
mod watch;
mod wind;

use std::process;

use config::Config;

fn main() {
    colog::init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

use canvas_mindmap::cli::{Args, run};
use clap::Parser;
use log::{LevelFilter, info};
use std::{process, str::FromStr};

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    info!(log_level:?; "Starting canvas-mindmap");

    if let Err(err) = run(args) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

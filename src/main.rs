mod camera;
mod config;
mod engine;
mod error;
mod fruit;
mod game;
mod input;
mod object;
mod render;
mod snake;
mod term;

use std::{env, fs::File, path::PathBuf};

use anyhow::Context;
use log::debug;

use crate::config::Config;
use crate::engine::Engine;

pub type TermInt = u16;
pub type Coords = (u16, u16);

fn main() -> anyhow::Result<()> {
    let config_path = env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref()).context("Error loading config")?;

    init_logging(&config)?;
    debug!("Starting with {:?}", config);

    let mut engine = Engine::new(config)?;
    // The engine loop takes care of restoring the terminal on CTRL+C
    engine.run()?;
    Ok(())
}

/// The terminal is in raw mode while playing, so logs only go to a file.
fn init_logging(config: &Config) -> anyhow::Result<()> {
    if let Some(path) = &config.log_file {
        let file = File::create(path)
            .with_context(|| format!("Error creating log file {}", path.display()))?;

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use whodunit_engine::GameConfig;

use crate::{logging, util};

use self::{auto_play::AutoPlayArg, play::PlayArg, serve::ServeArg};

mod auto_play;
mod play;
mod serve;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log filter used when `RUST_LOG` is not set
    #[clap(long, global = true, default_value = "warn")]
    log_level: String,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a case in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Let a belief-guided detective play many seeded cases
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Serve the HTTP API
    Serve(#[clap(flatten)] ServeArg),
}

/// Game tunables shared by every mode.
///
/// Values from `--config` are applied first, then individual flags.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GameConfigArg {
    /// Path to a game config file (JSON format)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Number of guesses (1-3)
    #[clap(long)]
    tries: Option<u8>,
    /// Wall-clock limit per case in seconds
    #[clap(long)]
    time_limit: Option<u64>,
    /// Keep beliefs unchanged after an incorrect guess
    #[clap(long, default_value_t = false)]
    no_belief_updates: bool,
}

impl GameConfigArg {
    pub(crate) fn resolve(&self) -> anyhow::Result<GameConfig> {
        let Self {
            config,
            tries,
            time_limit,
            no_belief_updates,
        } = self;

        let mut resolved = match config {
            Some(path) => util::read_json_file::<GameConfig, _>("game config", path)?,
            None => GameConfig::default(),
        };
        if let Some(tries) = tries {
            resolved.tries = *tries;
        }
        if let Some(secs) = time_limit {
            resolved.time_limit_secs = Some(*secs);
        }
        if *no_belief_updates {
            resolved.update_beliefs_on_guess = false;
        }
        resolved.validate().context("Invalid game config")?;
        Ok(resolved)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    logging::init_logging(&args.log_level)?;
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::Serve(arg) => serve::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let arg = GameConfigArg {
            tries: Some(2),
            time_limit: Some(300),
            no_belief_updates: true,
            ..GameConfigArg::default()
        };
        let config = arg.resolve().unwrap();
        assert_eq!(config.tries, 2);
        assert_eq!(config.time_limit_secs, Some(300));
        assert!(!config.update_beliefs_on_guess);
    }

    #[test]
    fn rejects_out_of_range_tries() {
        let arg = GameConfigArg {
            tries: Some(4),
            ..GameConfigArg::default()
        };
        assert!(arg.resolve().is_err());
    }

    #[test]
    fn parses_subcommands() {
        let args = CommandArgs::try_parse_from([
            "whodunit",
            "auto-play",
            "--games",
            "10",
            "--tries",
            "2",
        ])
        .unwrap();
        assert!(matches!(args.mode, Some(Mode::AutoPlay(_))));
    }
}

use std::{net::SocketAddr, num::NonZeroUsize};

use anyhow::Context as _;
use whodunit_engine::SessionRegistry;

use super::GameConfigArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ServeArg {
    #[clap(flatten)]
    game: GameConfigArg,
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:5000")]
    addr: SocketAddr,
    /// Number of concurrent games kept; the oldest is dropped when full
    #[arg(long, default_value = "1")]
    capacity: NonZeroUsize,
}

pub(crate) fn run(arg: &ServeArg) -> anyhow::Result<()> {
    let ServeArg {
        game,
        addr,
        capacity,
    } = arg;

    let config = game.resolve()?;
    let registry = SessionRegistry::new(config, *capacity);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    runtime
        .block_on(whodunit_server::serve(*addr, registry))
        .with_context(|| format!("Server on {addr} stopped"))
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::super::{CommandArgs, Mode};

    #[test]
    fn serve_defaults() {
        let args = CommandArgs::try_parse_from(["whodunit", "serve"]).unwrap();
        let Some(Mode::Serve(arg)) = args.mode else {
            panic!("expected serve mode");
        };
        assert_eq!(arg.addr.port(), 5000);
        assert_eq!(arg.capacity.get(), 1);
    }
}

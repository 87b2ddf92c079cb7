use std::io;

use anyhow::Result;
use clap::Parser;

use qformat_cli::{cli::Cli, run};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _r = env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .format_target(false)
        .format_timestamp(None)
        .try_init();

    run(cli, &mut io::stdout().lock())
}

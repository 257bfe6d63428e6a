use std::io;

use anyhow::{Result, anyhow};
use clap_complete::{Shell, generate};

use crate::cli::{CliArgs, CompletionsArgs, build_cli};

const BIN_NAME: &str = "sqlpf";

pub fn run(_args: &CliArgs, cmd: &CompletionsArgs) -> Result<()> {
    let shell = cmd
        .shell
        .or_else(Shell::from_env)
        .ok_or_else(|| anyhow!("--shell is required (could not detect it from $SHELL)"))?;

    let mut cli = build_cli(true);
    generate(shell, &mut cli, BIN_NAME, &mut io::stdout());
    Ok(())
}

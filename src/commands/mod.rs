mod common;
mod completions;
mod config;
mod help;
mod partition_functions;

use anyhow::Result;

use crate::cli::{CliArgs, CommandKind};

pub fn dispatch(args: &CliArgs) -> Result<()> {
    match &args.command {
        CommandKind::Help { all, command } => help::run(*all, command.as_deref()),
        CommandKind::PartitionFunctions(cmd) => partition_functions::run(args, cmd),
        CommandKind::Config(_) => config::run(args),
        CommandKind::Completions(cmd) => completions::run(args, cmd),
    }
}

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use clap_complete::Shell;

#[derive(Debug, Clone)]
pub struct OutputFlags {
    pub json: bool,
    pub markdown: bool,
    pub pretty: bool,
}

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub profile: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout_ms: Option<u64>,
    pub encrypt: Option<bool>,
    pub trust_cert: Option<bool>,
    pub output: OutputFlags,
    pub verbose: u8,
    pub quiet: bool,
    pub command: CommandKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Help { all: bool, command: Option<String> },
    PartitionFunctions(PartitionFunctionsArgs),
    Config(ConfigArgs),
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartitionFunctionsArgs {
    pub instances: Vec<String>,
    pub databases: Vec<String>,
    pub exclude_databases: Vec<String>,
    pub partition_functions: Vec<String>,
    pub enable_exception: bool,
    pub all_columns: bool,
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigArgs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionsArgs {
    pub shell: Option<Shell>,
}

pub fn build_cli(show_all: bool) -> Command {
    let mut cmd = Command::new("sqlpf")
        .about("Inventory SQL Server partition functions across instances and databases")
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .disable_help_subcommand(true)
        .subcommand_value_name("COMMAND");

    cmd = add_global_args(cmd);

    cmd = cmd.subcommand(command_help());
    cmd = cmd.subcommand(command_partition_functions(show_all));
    cmd = cmd.subcommand(command_config(show_all));
    cmd = cmd.subcommand(command_completions(show_all));

    cmd
}

pub fn parse_args() -> CliArgs {
    let matches = build_cli(false).get_matches();
    parse_matches(&matches)
}

pub fn parse_from<I, T>(argv: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_cli(false).try_get_matches_from(argv)?;
    Ok(parse_matches(&matches))
}

fn add_global_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("config")
            .long("config")
            .value_name("PATH")
            .value_hint(ValueHint::FilePath)
            .global(true)
            .help("Override config file location"),
    )
    .arg(
        Arg::new("env-file")
            .long("env-file")
            .value_name("PATH")
            .value_hint(ValueHint::FilePath)
            .global(true)
            .help("Load environment variables from file (default: .env)"),
    )
    .arg(
        Arg::new("profile")
            .long("profile")
            .value_name("NAME")
            .global(true)
            .help("Select connection profile"),
    )
    .arg(
        Arg::new("port")
            .long("port")
            .value_name("PORT")
            .value_parser(clap::value_parser!(u16))
            .global(true)
            .help("Port for default instances without an explicit port (default: 1433)"),
    )
    .arg(
        Arg::new("user")
            .long("user")
            .value_name("USER")
            .global(true)
            .help("SQL login name"),
    )
    .arg(
        Arg::new("password")
            .long("password")
            .value_name("PASS")
            .global(true)
            .help("SQL login password"),
    )
    .arg(
        Arg::new("timeout")
            .long("timeout")
            .value_name("MS")
            .value_parser(clap::value_parser!(u64))
            .global(true)
            .help("Connection timeout in milliseconds"),
    )
    .arg(
        Arg::new("encrypt")
            .long("encrypt")
            .value_parser(clap::value_parser!(bool))
            .global(true)
            .help("Enable connection encryption"),
    )
    .arg(
        Arg::new("trust-cert")
            .long("trust-cert")
            .value_parser(clap::value_parser!(bool))
            .global(true)
            .help("Trust server certificate"),
    )
    .arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Output as JSON"),
    )
    .arg(
        Arg::new("markdown")
            .long("markdown")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Force markdown table output"),
    )
    .arg(
        Arg::new("pretty")
            .long("pretty")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Force pretty-printed table output"),
    )
    .arg(
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .global(true)
            .help("Increase log detail (-v info, -vv debug, -vvv trace)"),
    )
    .arg(
        Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Suppress non-error output"),
    )
}

fn command_help() -> Command {
    Command::new("help")
        .about("Show help for commands")
        .arg(
            Arg::new("all")
                .long("all")
                .action(ArgAction::SetTrue)
                .help("Show all commands, including advanced ones"),
        )
        .arg(Arg::new("command").value_name("COMMAND"))
}

fn command_core(
    name: &'static str,
    about: &'static str,
    aliases: &'static [&'static str],
    _show_all: bool,
) -> Command {
    let mut cmd = Command::new(name).about(about);
    for alias in aliases {
        cmd = cmd.visible_alias(*alias);
    }
    cmd
}

fn command_advanced(
    name: &'static str,
    about: &'static str,
    aliases: &'static [&'static str],
    show_all: bool,
) -> Command {
    let mut cmd = Command::new(name).about(about);
    for alias in aliases {
        cmd = cmd.visible_alias(*alias);
    }
    if !show_all {
        cmd = cmd.hide(true);
    }
    cmd
}

fn list_arg(id: &'static str, value_name: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name(value_name)
        .action(ArgAction::Append)
        .help(help)
}

fn command_partition_functions(show_all: bool) -> Command {
    command_core(
        "partition-functions",
        "List partition functions with their instance and database",
        &["pf", "partition-function"],
        show_all,
    )
    .arg(
        Arg::new("instances")
            .index(1)
            .value_name("SQLINSTANCE")
            .num_args(0..)
            .action(ArgAction::Append)
            .help("Target instances (host, host\\NAME, host,port); '-' reads them from stdin"),
    )
    .arg(list_arg(
        "database",
        "name",
        "Only scan these databases (repeatable or comma-separated)",
    ))
    .arg(list_arg(
        "exclude-database",
        "name",
        "Skip these databases (repeatable or comma-separated)",
    ))
    .arg(list_arg(
        "partition-function",
        "name",
        "Only return these partition functions (repeatable or comma-separated)",
    ))
    .arg(
        Arg::new("enable-exception")
            .long("enable-exception")
            .action(ArgAction::SetTrue)
            .help("Fail with a non-zero exit when any instance cannot be reached"),
    )
    .arg(
        Arg::new("all-columns")
            .long("all-columns")
            .action(ArgAction::SetTrue)
            .help("Show every catalog column instead of the default view"),
    )
    .arg(
        Arg::new("csv")
            .long("csv")
            .value_name("file")
            .value_hint(ValueHint::FilePath)
            .help("Also write the rows to a CSV file"),
    )
}

fn command_config(show_all: bool) -> Command {
    command_core("config", "Display resolved config", &[], show_all)
}

fn command_completions(show_all: bool) -> Command {
    command_advanced("completions", "Generate shell completions", &[], show_all).arg(
        Arg::new("shell")
            .long("shell")
            .value_name("name")
            .value_parser(clap::value_parser!(Shell))
            .help("Target shell (default: detected from $SHELL)"),
    )
}

fn split_list(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| {
            values
                .flat_map(|value| value.split(','))
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_matches(matches: &ArgMatches) -> CliArgs {
    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let env_file = matches.get_one::<String>("env-file").map(PathBuf::from);
    let profile = matches.get_one::<String>("profile").cloned();
    let port = matches.get_one::<u16>("port").copied();
    let user = matches.get_one::<String>("user").cloned();
    let password = matches.get_one::<String>("password").cloned();
    let timeout_ms = matches.get_one::<u64>("timeout").copied();
    let encrypt = matches.get_one::<bool>("encrypt").copied();
    let trust_cert = matches.get_one::<bool>("trust-cert").copied();
    let output = OutputFlags {
        json: matches.get_flag("json"),
        markdown: matches.get_flag("markdown"),
        pretty: matches.get_flag("pretty"),
    };
    let verbose = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");

    let command = match matches.subcommand() {
        Some(("help", sub_m)) => CommandKind::Help {
            all: sub_m.get_flag("all"),
            command: sub_m.get_one::<String>("command").cloned(),
        },
        Some(("partition-functions", sub_m)) => {
            CommandKind::PartitionFunctions(PartitionFunctionsArgs {
                instances: sub_m
                    .get_many::<String>("instances")
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default(),
                databases: split_list(sub_m, "database"),
                exclude_databases: split_list(sub_m, "exclude-database"),
                partition_functions: split_list(sub_m, "partition-function"),
                enable_exception: sub_m.get_flag("enable-exception"),
                all_columns: sub_m.get_flag("all-columns"),
                csv: sub_m.get_one::<String>("csv").map(PathBuf::from),
            })
        }
        Some(("config", _)) => CommandKind::Config(ConfigArgs),
        Some(("completions", sub_m)) => CommandKind::Completions(CompletionsArgs {
            shell: sub_m.get_one::<Shell>("shell").copied(),
        }),
        _ => CommandKind::Help {
            all: false,
            command: None,
        },
    };

    CliArgs {
        config_path,
        env_file,
        profile,
        port,
        user,
        password,
        timeout_ms,
        encrypt,
        trust_cert,
        output,
        verbose,
        quiet,
        command,
    }
}

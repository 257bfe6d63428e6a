use std::io;

use anyhow::Result;
use tracing::debug;

use crate::cli::{CliArgs, PartitionFunctionsArgs};
use crate::commands::common;
use crate::config::{OutputFormat, ResolvedConfig};
use crate::db::TdsConnector;
use crate::error::{AppError, ErrorKind};
use crate::instance::{self, InstanceRef};
use crate::output::{TableOptions, csv, json as json_out, table};
use crate::scan::{ScanOptions, ScanReport, Scanner, record};

const STDIN_MARKER: &str = "-";

enum InstanceSource {
    Listed(InstanceRef),
    Stdin,
}

pub fn run(args: &CliArgs, cmd: &PartitionFunctionsArgs) -> Result<()> {
    let resolved = common::load_config(args)?;
    let format = common::output_format(args, &resolved);
    let sources = instance_sources(cmd, &resolved)?;
    let options = scan_options(cmd, &resolved);
    let credential = common::credential(&resolved);
    credential.validate()?;
    let connector = TdsConnector::new(resolved.connection.clone());

    debug!(?options, "starting partition function scan");
    let report = tokio::runtime::Runtime::new()?.block_on(async {
        Scanner::new(&connector, &credential, &options)
            .scan(instance_stream(sources))
            .await
    });

    let result_set = record::to_result_set(&report.records, record::view(cmd.all_columns));
    let csv_rows = match cmd.csv.as_ref() {
        Some(path) => Some((path, csv::write_result_set(path, &result_set)?)),
        None => None,
    };

    if matches!(format, OutputFormat::Json) {
        let mut payload = json_out::scan_report_to_json(&report);
        if let Some((path, _)) = &csv_rows {
            payload["csvPath"] = serde_json::Value::String(path.display().to_string());
        }
        let body = json_out::emit_json_value(&payload, common::json_pretty(&resolved))?;
        if !args.quiet {
            println!("{}", body);
        }
    } else if !args.quiet {
        let options = TableOptions {
            footer: Some(summary_line(&report)),
            ..TableOptions::default()
        };
        println!("{}", table::render_result_set_table(&result_set, format, &options));
        if let Some((path, rows)) = &csv_rows {
            println!("\nCSV written ({} rows): {}", rows, path.display());
        }
    }

    if report.failed() {
        return Err(AppError::new(ErrorKind::Connection, failure_message(&report)).into());
    }
    Ok(())
}

fn scan_options(cmd: &PartitionFunctionsArgs, resolved: &ResolvedConfig) -> ScanOptions {
    ScanOptions {
        databases: common::or_default(&cmd.databases, &resolved.filters.databases),
        exclude_databases: common::or_default(
            &cmd.exclude_databases,
            &resolved.filters.exclude_databases,
        ),
        partition_functions: cmd.partition_functions.clone(),
        enable_exception: cmd.enable_exception,
    }
}

/// Listed instances are parsed up front so a typo fails before any
/// connection is attempted; stdin is only read once the scan reaches it.
fn instance_sources(
    cmd: &PartitionFunctionsArgs,
    resolved: &ResolvedConfig,
) -> Result<Vec<InstanceSource>> {
    let listed = if cmd.instances.is_empty() {
        &resolved.connection.instances
    } else {
        &cmd.instances
    };

    let mut sources = Vec::new();
    for value in listed {
        if value.trim() == STDIN_MARKER {
            sources.push(InstanceSource::Stdin);
        } else {
            sources.extend(
                instance::parse_list([value])?
                    .into_iter()
                    .map(InstanceSource::Listed),
            );
        }
    }

    if sources.is_empty() {
        return Err(AppError::new(
            ErrorKind::Config,
            "No SQL instance specified. Pass SQLINSTANCE, '-' for stdin, or set instances in the profile/SQL_INSTANCE.",
        )
        .into());
    }
    Ok(sources)
}

fn instance_stream(sources: Vec<InstanceSource>) -> impl Iterator<Item = InstanceRef> {
    sources
        .into_iter()
        .flat_map(|source| -> Box<dyn Iterator<Item = InstanceRef>> {
            match source {
                InstanceSource::Listed(instance) => Box::new(std::iter::once(instance)),
                InstanceSource::Stdin => Box::new(instance::read_instances(io::stdin().lock())),
            }
        })
}

fn summary_line(report: &ScanReport) -> String {
    let mut line = format!(
        "{} partition function(s) from {} instance(s)",
        report.records.len(),
        report.instances_scanned
    );
    if !report.warnings.is_empty() {
        line.push_str(&format!(", {} warning(s)", report.warnings.len()));
    }
    line
}

fn failure_message(report: &ScanReport) -> String {
    let instances = report
        .errors
        .iter()
        .map(|notice| notice.instance.as_str())
        .collect::<Vec<_>>();
    match report.errors.as_slice() {
        [only] => only.message.clone(),
        _ => format!(
            "Failed connecting to {} instances: {}",
            instances.len(),
            instances.join(", ")
        ),
    }
}

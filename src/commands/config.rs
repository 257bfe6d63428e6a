use std::io::{self, Write};

use anyhow::Result;

use crate::cli::CliArgs;
use crate::commands::common;
use crate::config::OutputFormat;
use crate::output::{TableOptions, json, table};

const MASK: &str = "***";

pub fn run(args: &CliArgs) -> Result<()> {
    let resolved = common::load_config(args)?;
    let format = common::output_format(args, &resolved);

    if args.quiet {
        return Ok(());
    }

    if matches!(format, OutputFormat::Json) {
        let payload = json::config_to_json(&resolved);
        let body = json::emit_json_value(&payload, common::json_pretty(&resolved))?;
        writeln!(io::stdout(), "{}", body)?;
        return Ok(());
    }

    let connection = &resolved.connection;
    let none = || "(none)".to_string();
    let mut rows = vec![
        (
            "configPath".to_string(),
            resolved
                .config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(none),
        ),
        ("profileName".to_string(), resolved.profile_name.clone()),
        (
            "instances".to_string(),
            if connection.instances.is_empty() {
                none()
            } else {
                connection.instances.join(", ")
            },
        ),
        (
            "port".to_string(),
            connection
                .port
                .map(|p| p.to_string())
                .unwrap_or_else(none),
        ),
    ];
    if let Some(user) = &connection.user {
        rows.push(("user".to_string(), user.clone()));
    }
    if connection.password.is_some() {
        rows.push(("password".to_string(), MASK.to_string()));
    }
    rows.extend([
        ("encrypt".to_string(), connection.encrypt.to_string()),
        ("trustCert".to_string(), connection.trust_cert.to_string()),
        ("timeoutMs".to_string(), connection.timeout_ms.to_string()),
    ]);
    if !resolved.filters.databases.is_empty() {
        rows.push(("databases".to_string(), resolved.filters.databases.join(", ")));
    }
    if !resolved.filters.exclude_databases.is_empty() {
        rows.push((
            "excludeDatabases".to_string(),
            resolved.filters.exclude_databases.join(", "),
        ));
    }

    let rendered = table::render_key_value_table("Config", &rows, format, &TableOptions::default());
    writeln!(io::stdout(), "{}", rendered)?;
    Ok(())
}

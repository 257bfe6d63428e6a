use serde_json::json;

use crate::config::ResolvedConfig;
use crate::scan::ScanReport;

const MASK: &str = "***";

pub fn emit_json_value(value: &serde_json::Value, pretty: bool) -> anyhow::Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

pub fn error_json(message: &str, kind: &str) -> serde_json::Value {
    json!({
        "error": {
            "message": message,
            "kind": kind,
        }
    })
}

pub fn scan_report_to_json(report: &ScanReport) -> serde_json::Value {
    json!({
        "success": !report.failed(),
        "instancesScanned": report.instances_scanned,
        "count": report.records.len(),
        "partitionFunctions": report.records,
        "warnings": report.warnings,
        "errors": report.errors,
    })
}

pub fn config_to_json(resolved: &ResolvedConfig) -> serde_json::Value {
    json!({
        "configPath": resolved.config_path.as_ref().map(|p| p.display().to_string()),
        "profileName": resolved.profile_name,
        "connection": {
            "instances": resolved.connection.instances,
            "port": resolved.connection.port,
            "user": resolved.connection.user,
            "password": resolved.connection.password.as_ref().map(|_| MASK),
            "encrypt": resolved.connection.encrypt,
            "trustCert": resolved.connection.trust_cert,
            "timeoutMs": resolved.connection.timeout_ms,
        },
        "filters": {
            "databases": resolved.filters.databases,
            "excludeDatabases": resolved.filters.exclude_databases,
        },
        "settings": {
            "output": {
                "defaultFormat": resolved.settings.output.default_format.as_str(),
                "json": {
                    "pretty": resolved.settings.output.json.pretty,
                },
            }
        }
    })
}

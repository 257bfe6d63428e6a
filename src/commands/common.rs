use anyhow::Result;

use crate::catalog::Credential;
use crate::cli::CliArgs;
use crate::config::OutputFormat;
use crate::config::{self, CliOverrides, ResolvedConfig};
use crate::error::{AppError, ErrorKind};
use crate::output;

pub fn overrides_from_args(args: &CliArgs) -> CliOverrides {
    CliOverrides {
        config_path: args.config_path.clone(),
        env_file: args.env_file.clone(),
        profile: args.profile.clone(),
        port: args.port,
        user: args.user.clone(),
        password: args.password.clone(),
        timeout_ms: args.timeout_ms,
        encrypt: args.encrypt,
        trust_cert: args.trust_cert,
    }
}

pub fn load_config(args: &CliArgs) -> Result<ResolvedConfig> {
    let overrides = overrides_from_args(args);
    config::load_from_system(&overrides)
        .map_err(|err| AppError::new(ErrorKind::Config, err.to_string()).into())
}

pub fn output_format(args: &CliArgs, resolved: &ResolvedConfig) -> OutputFormat {
    output::select_format(&args.output, &resolved.settings)
}

pub fn json_pretty(resolved: &ResolvedConfig) -> bool {
    resolved.settings.output.json.pretty
}

pub fn credential(resolved: &ResolvedConfig) -> Credential {
    Credential {
        user: resolved.connection.user.clone(),
        password: resolved.connection.password.clone(),
    }
}

/// Command-line values win; otherwise the profile's list applies.
pub fn or_default(values: &[String], fallback: &[String]) -> Vec<String> {
    if values.is_empty() {
        fallback.to_vec()
    } else {
        values.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_list_wins_over_profile() {
        let cli = vec!["db1".to_string()];
        let profile = vec!["db2".to_string()];
        assert_eq!(or_default(&cli, &profile), cli);
        assert_eq!(or_default(&[], &profile), profile);
    }
}

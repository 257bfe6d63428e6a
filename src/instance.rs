use std::fmt;
use std::io::BufRead;

use tracing::warn;

use crate::error::{AppError, ErrorKind};

/// Service name SQL Server reports for the default (unnamed) instance.
pub const DEFAULT_INSTANCE_NAME: &str = "MSSQLSERVER";

/// A target SQL Server endpoint as typed by the user.
///
/// Accepted forms: `host`, `host\NAME`, `host,port`, `host:port` and
/// `host\NAME,port`. An optional `tcp:` prefix is ignored, and `.` or
/// `(local)` are rewritten to `localhost`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceRef {
    pub host: String,
    pub instance: Option<String>,
    pub port: Option<u16>,
}

impl InstanceRef {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            instance: None,
            port: None,
        }
    }

    pub fn parse(input: &str) -> Result<Self, AppError> {
        let trimmed = input.trim();
        let trimmed = trimmed
            .strip_prefix("tcp:")
            .or_else(|| trimmed.strip_prefix("TCP:"))
            .unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(invalid(input, "empty instance name"));
        }

        let (target, port) = split_port(trimmed).map_err(|reason| invalid(input, reason))?;

        let (host, instance) = match target.split_once('\\') {
            Some((host, instance)) => (host, Some(instance)),
            None => (target, None),
        };

        let host = host.trim();
        if host.is_empty() {
            return Err(invalid(input, "missing host"));
        }
        let host = match host {
            "." | "(local)" => "localhost",
            other => other,
        };

        let instance = match instance.map(str::trim) {
            Some("") => return Err(invalid(input, "missing instance name after '\\'")),
            Some(name) if name.eq_ignore_ascii_case(DEFAULT_INSTANCE_NAME) => None,
            Some(name) => Some(name.to_string()),
            None => None,
        };

        Ok(Self {
            host: host.to_string(),
            instance,
            port,
        })
    }
}

fn split_port(input: &str) -> Result<(&str, Option<u16>), &'static str> {
    let split = match input.rsplit_once(',') {
        Some(pair) => Some(pair),
        // A single colon is treated as host:port; more than one is left alone
        // so bare IPv6 literals still parse as hosts.
        None if input.matches(':').count() == 1 => input.rsplit_once(':'),
        None => None,
    };

    match split {
        Some((target, port)) => {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| "port must be a number between 0 and 65535")?;
            Ok((target, Some(port)))
        }
        None => Ok((input, None)),
    }
}

fn invalid(input: &str, reason: &str) -> AppError {
    AppError::new(
        ErrorKind::Config,
        format!("Invalid SQL instance '{}': {}", input, reason),
    )
}

impl fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.host)?;
        if let Some(instance) = &self.instance {
            write!(f, "\\{}", instance)?;
        }
        if let Some(port) = self.port {
            write!(f, ",{}", port)?;
        }
        Ok(())
    }
}

/// Parses instance strings, splitting each value on whitespace and `;` since
/// commas already separate host from port.
pub fn parse_list<I, S>(values: I) -> Result<Vec<InstanceRef>, AppError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .flat_map(|value| {
            value
                .as_ref()
                .split(|c: char| c.is_whitespace() || c == ';')
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .map(|value| InstanceRef::parse(&value))
        .collect()
}

/// Lazily reads one instance per line. Blank lines and `#` comments are
/// skipped; unparsable lines are logged and skipped.
pub fn read_instances<R: BufRead>(reader: R) -> impl Iterator<Item = InstanceRef> {
    reader.lines().map_while(Result::ok).filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        match InstanceRef::parse(line) {
            Ok(instance) => Some(instance),
            Err(err) => {
                warn!("{}", err);
                None
            }
        }
    })
}

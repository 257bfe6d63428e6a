use std::future::Future;
use std::time::Duration;

use tiberius::SqlBrowser;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::catalog::Credential;
use crate::config::ConnectionSettings;
use crate::db::connection::{Endpoint, build_config, endpoint};
use crate::error::AppError;
use crate::instance::InstanceRef;

pub type TdsClient = tiberius::Client<Compat<TcpStream>>;

/// Connect to one SQL Server instance.
///
/// # Arguments
///
/// * `settings` - Resolved connection settings (TLS flags, timeout, default port).
/// * `instance` - Target host, optional named instance and port.
/// * `credential` - SQL login, or none for the driver default.
///
/// # Errors
///
/// Returns a `Config` error for an unusable credential, and a `Connection`
/// error if SQL Browser lookup, TCP connect or login fails or the configured
/// timeout elapses.
pub async fn connect(
    settings: &ConnectionSettings,
    instance: &InstanceRef,
    credential: &Credential,
) -> Result<TdsClient, AppError> {
    let config = build_config(settings, instance, credential)?;
    let limit = if settings.timeout_ms == 0 {
        None
    } else {
        Some(Duration::from_millis(settings.timeout_ms))
    };

    let tcp = match endpoint(settings, instance) {
        Endpoint::Port(_) => {
            let connecting = TcpStream::connect(config.get_addr());
            with_timeout(limit, "Connection", connecting)
                .await?
                .map_err(|err| AppError::connection(err.to_string()))?
        }
        Endpoint::Browser(_) => {
            let resolving = TcpStream::connect_named(&config);
            with_timeout(limit, "SQL Browser lookup", resolving)
                .await?
                .map_err(|err| AppError::connection(err.to_string()))?
        }
    };
    tcp.set_nodelay(true)
        .map_err(|err| AppError::connection(err.to_string()))?;

    let login = tiberius::Client::connect(config, tcp.compat_write());
    let client = with_timeout(limit, "Login", login)
        .await?
        .map_err(|err| AppError::connection(err.to_string()))?;
    Ok(client)
}

// `timeout` wraps the future in an outer Result for Elapsed vs the inner error.
async fn with_timeout<F: Future>(
    limit: Option<Duration>,
    stage: &str,
    future: F,
) -> Result<F::Output, AppError> {
    match limit {
        Some(duration) => timeout(duration, future).await.map_err(|_| {
            AppError::connection(format!(
                "{} timed out after {} ms",
                stage,
                duration.as_millis()
            ))
        }),
        None => Ok(future.await),
    }
}

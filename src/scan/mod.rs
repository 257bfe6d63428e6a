//! The partition-function scan: connect to each instance, walk its accessible
//! databases and project every matching partition function into a
//! [`PartitionFunctionRecord`].
//!
//! Problems are scoped as narrowly as possible. A failed connection skips one
//! instance, an inaccessible or unreadable database skips one database, and
//! neither stops the batch.

pub mod filter;
pub mod record;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::catalog::{Connector, Credential, DatabaseInfo, Session};
use crate::error::AppError;
use crate::instance::InstanceRef;

pub use record::{PartitionFunctionRecord, project};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub databases: Vec<String>,
    pub exclude_databases: Vec<String>,
    pub partition_functions: Vec<String>,
    /// Report connection failures as errors instead of warnings.
    pub enable_exception: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    Connection,
    Inaccessible,
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub kind: NoticeKind,
    pub instance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    pub message: String,
}

impl Notice {
    fn connection(instance: &InstanceRef, err: &AppError) -> Self {
        Self {
            kind: NoticeKind::Connection,
            instance: instance.to_string(),
            database: None,
            message: format!("Failure connecting to {}: {}", instance, err),
        }
    }

    fn inaccessible(
        instance: &InstanceRef,
        database: &str,
        current: Option<&DatabaseInfo>,
    ) -> Self {
        let reason = match current {
            None => "no longer listed".to_string(),
            Some(db) if db.is_online() => "no access".to_string(),
            Some(db) => db.state.clone(),
        };
        Self {
            kind: NoticeKind::Inaccessible,
            instance: instance.to_string(),
            database: Some(database.to_string()),
            message: format!(
                "Database {} on {} is not accessible ({}). Skipping.",
                database, instance, reason
            ),
        }
    }

    fn query(instance: &InstanceRef, database: Option<&str>, err: &AppError) -> Self {
        let message = match database {
            Some(db) => format!("Failed reading database {} on {}: {}", db, instance, err),
            None => format!("Failed listing databases on {}: {}", instance, err),
        };
        Self {
            kind: NoticeKind::Query,
            instance: instance.to_string(),
            database: database.map(str::to_string),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceScan {
    pub instance: InstanceRef,
    pub records: Vec<PartitionFunctionRecord>,
    pub warnings: Vec<Notice>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub instances_scanned: usize,
    pub records: Vec<PartitionFunctionRecord>,
    pub warnings: Vec<Notice>,
    pub errors: Vec<Notice>,
}

impl ScanReport {
    pub fn failed(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub struct Scanner<'a, C> {
    connector: &'a C,
    credential: &'a Credential,
    options: &'a ScanOptions,
}

impl<'a, C: Connector> Scanner<'a, C> {
    pub fn new(connector: &'a C, credential: &'a Credential, options: &'a ScanOptions) -> Self {
        Self {
            connector,
            credential,
            options,
        }
    }

    /// Scans instances in order. The iterator is consumed lazily, so
    /// instances can be fed from a stream such as stdin.
    pub async fn scan<I>(&self, instances: I) -> ScanReport
    where
        I: IntoIterator<Item = InstanceRef>,
    {
        let mut report = ScanReport::default();
        for instance in instances {
            match self.scan_instance(&instance).await {
                Ok(scan) => {
                    report.instances_scanned += 1;
                    report.records.extend(scan.records);
                    report.warnings.extend(scan.warnings);
                }
                Err(notice) if self.options.enable_exception => {
                    error!("{}", notice.message);
                    report.errors.push(notice);
                }
                Err(notice) => {
                    warn!("{}", notice.message);
                    report.warnings.push(notice);
                }
            }
        }
        report
    }

    /// Scans one instance. Only a connection failure is returned as `Err`;
    /// database-level problems are collected as warnings on the result.
    pub async fn scan_instance(&self, instance: &InstanceRef) -> Result<InstanceScan, Notice> {
        debug!(instance = %instance, "connecting");
        let mut session = self
            .connector
            .connect(instance, self.credential)
            .await
            .map_err(|err| Notice::connection(instance, &err))?;
        let identity = session.identity().clone();

        let mut scan = InstanceScan {
            instance: instance.clone(),
            records: Vec::new(),
            warnings: Vec::new(),
        };

        let databases = match session.databases().await {
            Ok(databases) => databases,
            Err(err) => {
                push_warning(&mut scan.warnings, Notice::query(instance, None, &err));
                return Ok(scan);
            }
        };

        let selected = filter::select_databases(
            databases,
            &self.options.databases,
            &self.options.exclude_databases,
        );
        debug!(instance = %instance, databases = selected.len(), "databases selected");

        for database in selected {
            let name = database.name.as_str();
            match session.recheck_database(name).await {
                Ok(Some(current)) if current.is_accessible => {}
                Ok(current) => {
                    push_warning(
                        &mut scan.warnings,
                        Notice::inaccessible(instance, name, current.as_ref()),
                    );
                    continue;
                }
                Err(err) => {
                    push_warning(&mut scan.warnings, Notice::query(instance, Some(name), &err));
                    continue;
                }
            }

            let functions = match session.partition_functions(name).await {
                Ok(functions) => functions,
                Err(err) => {
                    push_warning(&mut scan.warnings, Notice::query(instance, Some(name), &err));
                    continue;
                }
            };

            let functions =
                filter::select_partition_functions(functions, &self.options.partition_functions);
            if functions.is_empty() {
                info!(
                    "No partition functions exist in the {} database on {}",
                    name, instance
                );
                continue;
            }

            scan.records.extend(
                functions
                    .iter()
                    .map(|function| record::project(&identity, name, function)),
            );
        }

        Ok(scan)
    }
}

fn push_warning(warnings: &mut Vec<Notice>, notice: Notice) {
    warn!("{}", notice.message);
    warnings.push(notice);
}

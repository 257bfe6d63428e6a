//! Collaborators the scan pipeline is written against.
//!
//! [`Connector`] turns an instance reference into a [`Session`]; a session
//! exposes the server identity plus read-only views over the database and
//! partition-function catalogs. The TDS implementation lives in
//! [`crate::db::session`]; tests substitute in-memory fakes.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{AppError, ErrorKind};
use crate::instance::{DEFAULT_INSTANCE_NAME, InstanceRef};

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Credential {
    pub fn sql_login(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            password: Some(password.into()),
        }
    }

    /// A login name without a password cannot authenticate anywhere, so it is
    /// rejected before any instance is contacted.
    pub fn validate(&self) -> Result<(), AppError> {
        match (&self.user, &self.password) {
            (Some(user), None) => Err(AppError::new(
                ErrorKind::Config,
                format!(
                    "Password is required for SQL authentication (user: {})",
                    user
                ),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub computer_name: String,
    pub instance_name: String,
}

impl ServerIdentity {
    pub fn new(computer_name: impl Into<String>, instance_name: Option<&str>) -> Self {
        let instance_name = instance_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_INSTANCE_NAME);
        Self {
            computer_name: computer_name.into(),
            instance_name: instance_name.to_string(),
        }
    }

    /// Identity assumed from what the caller typed, used when the server
    /// does not report its own machine name.
    pub fn from_instance(instance: &InstanceRef) -> Self {
        Self::new(instance.host.clone(), instance.instance.as_deref())
    }

    pub fn is_default_instance(&self) -> bool {
        self.instance_name.eq_ignore_ascii_case(DEFAULT_INSTANCE_NAME)
    }

    /// Canonical `computer` or `computer\instance` name.
    pub fn sql_instance(&self) -> String {
        if self.is_default_instance() {
            self.computer_name.clone()
        } else {
            format!("{}\\{}", self.computer_name, self.instance_name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub name: String,
    pub is_accessible: bool,
    pub state: String,
}

pub const ONLINE_STATE: &str = "ONLINE";

impl DatabaseInfo {
    pub fn online(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_accessible: true,
            state: ONLINE_STATE.to_string(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.state.eq_ignore_ascii_case(ONLINE_STATE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RangeType {
    Left,
    Right,
}

impl RangeType {
    pub fn from_boundary_on_right(on_right: bool) -> Self {
        if on_right { RangeType::Right } else { RangeType::Left }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RangeType::Left => "LEFT",
            RangeType::Right => "RIGHT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartitionFunctionInfo {
    pub id: i32,
    pub name: String,
    pub create_date: NaiveDateTime,
    pub number_of_partitions: i32,
    pub range_type: RangeType,
    #[serde(rename = "Type")]
    pub function_type: String,
    pub is_system: bool,
}

#[allow(async_fn_in_trait)]
pub trait Connector {
    type Session: Session;

    async fn connect(
        &self,
        instance: &InstanceRef,
        credential: &Credential,
    ) -> Result<Self::Session, AppError>;
}

#[allow(async_fn_in_trait)]
pub trait Session {
    fn identity(&self) -> &ServerIdentity;

    /// Every database the server lists, accessible or not.
    async fn databases(&mut self) -> Result<Vec<DatabaseInfo>, AppError>;

    /// Re-reads a single database right before its catalog is queried.
    /// `None` means the database is no longer listed.
    async fn recheck_database(
        &mut self,
        database: &str,
    ) -> Result<Option<DatabaseInfo>, AppError>;

    async fn partition_functions(
        &mut self,
        database: &str,
    ) -> Result<Vec<PartitionFunctionInfo>, AppError>;
}

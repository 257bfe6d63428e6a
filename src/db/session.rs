use chrono::NaiveDateTime;
use tiberius::{Query, Row};
use tracing::debug;

use crate::catalog::{
    Connector, Credential, DatabaseInfo, ONLINE_STATE, PartitionFunctionInfo, RangeType,
    ServerIdentity, Session,
};
use crate::config::ConnectionSettings;
use crate::db::client::{self, TdsClient};
use crate::db::executor::{self, optional, required};
use crate::db::queries;
use crate::error::AppError;
use crate::instance::InstanceRef;

pub struct TdsConnector {
    settings: ConnectionSettings,
}

impl TdsConnector {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self { settings }
    }
}

impl Connector for TdsConnector {
    type Session = TdsSession;

    async fn connect(
        &self,
        instance: &InstanceRef,
        credential: &Credential,
    ) -> Result<TdsSession, AppError> {
        let mut client = client::connect(&self.settings, instance, credential).await?;
        let identity = read_identity(&mut client, instance).await?;
        debug!(
            instance = %instance,
            sql_instance = %identity.sql_instance(),
            "connected"
        );
        Ok(TdsSession { client, identity })
    }
}

pub struct TdsSession {
    client: TdsClient,
    identity: ServerIdentity,
}

impl Session for TdsSession {
    fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    async fn databases(&mut self) -> Result<Vec<DatabaseInfo>, AppError> {
        let rows = executor::fetch_rows(Query::new(queries::DATABASES), &mut self.client).await?;
        rows.iter().map(database_from_row).collect()
    }

    async fn recheck_database(
        &mut self,
        database: &str,
    ) -> Result<Option<DatabaseInfo>, AppError> {
        let mut query = Query::new(queries::DATABASE_ACCESS);
        query.bind(database);
        let rows = executor::fetch_rows(query, &mut self.client).await?;
        rows.first().map(database_from_row).transpose()
    }

    async fn partition_functions(
        &mut self,
        database: &str,
    ) -> Result<Vec<PartitionFunctionInfo>, AppError> {
        let sql = queries::partition_functions(database);
        let rows = executor::fetch_rows(Query::new(sql), &mut self.client).await?;
        rows.iter().map(partition_function_from_row).collect()
    }
}

async fn read_identity(
    client: &mut TdsClient,
    instance: &InstanceRef,
) -> Result<ServerIdentity, AppError> {
    let rows = executor::fetch_rows(Query::new(queries::SERVER_IDENTITY), client).await?;
    let Some(row) = rows.first() else {
        return Ok(ServerIdentity::from_instance(instance));
    };
    let machine = optional::<&str>(row, "machineName")?;
    let instance_name = optional::<&str>(row, "instanceName")?;
    Ok(match machine {
        Some(machine) => ServerIdentity::new(machine, instance_name),
        None => ServerIdentity::from_instance(instance),
    })
}

fn access_from_row(row: &Row) -> Result<bool, AppError> {
    let has_access = required::<i32>(row, "hasAccess")?;
    let state = optional::<&str>(row, "stateDesc")?.unwrap_or_default();
    Ok(has_access == 1 && state.eq_ignore_ascii_case(ONLINE_STATE))
}

fn database_from_row(row: &Row) -> Result<DatabaseInfo, AppError> {
    Ok(DatabaseInfo {
        name: required::<&str>(row, "name")?.to_string(),
        is_accessible: access_from_row(row)?,
        state: optional::<&str>(row, "stateDesc")?
            .unwrap_or_default()
            .to_string(),
    })
}

fn partition_function_from_row(row: &Row) -> Result<PartitionFunctionInfo, AppError> {
    Ok(PartitionFunctionInfo {
        id: required::<i32>(row, "functionId")?,
        name: required::<&str>(row, "name")?.to_string(),
        create_date: required::<NaiveDateTime>(row, "createDate")?,
        number_of_partitions: required::<i32>(row, "fanout")?,
        range_type: RangeType::from_boundary_on_right(required::<bool>(row, "boundaryOnRight")?),
        function_type: optional::<&str>(row, "typeDesc")?
            .unwrap_or_default()
            .to_string(),
        is_system: required::<bool>(row, "isSystem")?,
    })
}

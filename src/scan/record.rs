use serde::Serialize;

use crate::catalog::{PartitionFunctionInfo, ServerIdentity};
use crate::db::types::{Column, ResultSet, Value};

const CREATE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A partition function annotated with where it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartitionFunctionRecord {
    pub computer_name: String,
    pub instance_name: String,
    pub sql_instance: String,
    pub database: String,
    #[serde(flatten)]
    pub function: PartitionFunctionInfo,
}

pub fn project(
    identity: &ServerIdentity,
    database: &str,
    function: &PartitionFunctionInfo,
) -> PartitionFunctionRecord {
    PartitionFunctionRecord {
        computer_name: identity.computer_name.clone(),
        instance_name: identity.instance_name.clone(),
        sql_instance: identity.sql_instance(),
        database: database.to_string(),
        function: function.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ComputerName,
    InstanceName,
    SqlInstance,
    Database,
    CreateDate,
    Name,
    NumberOfPartitions,
    Id,
    RangeType,
    Type,
    IsSystem,
}

pub const DEFAULT_VIEW: &[Field] = &[
    Field::ComputerName,
    Field::InstanceName,
    Field::SqlInstance,
    Field::Database,
    Field::CreateDate,
    Field::Name,
    Field::NumberOfPartitions,
];

pub const FULL_VIEW: &[Field] = &[
    Field::ComputerName,
    Field::InstanceName,
    Field::SqlInstance,
    Field::Database,
    Field::CreateDate,
    Field::Name,
    Field::NumberOfPartitions,
    Field::Id,
    Field::RangeType,
    Field::Type,
    Field::IsSystem,
];

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::ComputerName => "ComputerName",
            Field::InstanceName => "InstanceName",
            Field::SqlInstance => "SqlInstance",
            Field::Database => "Database",
            Field::CreateDate => "CreateDate",
            Field::Name => "Name",
            Field::NumberOfPartitions => "NumberOfPartitions",
            Field::Id => "Id",
            Field::RangeType => "RangeType",
            Field::Type => "Type",
            Field::IsSystem => "IsSystem",
        }
    }

    pub fn value(self, record: &PartitionFunctionRecord) -> Value {
        let function = &record.function;
        match self {
            Field::ComputerName => Value::Text(record.computer_name.clone()),
            Field::InstanceName => Value::Text(record.instance_name.clone()),
            Field::SqlInstance => Value::Text(record.sql_instance.clone()),
            Field::Database => Value::Text(record.database.clone()),
            Field::CreateDate => {
                Value::Text(function.create_date.format(CREATE_DATE_FORMAT).to_string())
            }
            Field::Name => Value::Text(function.name.clone()),
            Field::NumberOfPartitions => Value::Int(function.number_of_partitions as i64),
            Field::Id => Value::Int(function.id as i64),
            Field::RangeType => Value::Text(function.range_type.as_str().to_string()),
            Field::Type => Value::Text(function.function_type.clone()),
            Field::IsSystem => Value::Bool(function.is_system),
        }
    }
}

pub fn view(all_columns: bool) -> &'static [Field] {
    if all_columns { FULL_VIEW } else { DEFAULT_VIEW }
}

pub fn to_result_set(records: &[PartitionFunctionRecord], fields: &[Field]) -> ResultSet {
    let columns = fields
        .iter()
        .map(|field| Column {
            name: field.name().to_string(),
        })
        .collect();
    let rows = records
        .iter()
        .map(|record| fields.iter().map(|field| field.value(record)).collect())
        .collect();
    ResultSet { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RangeType;
    use chrono::NaiveDate;

    fn pf01() -> PartitionFunctionInfo {
        PartitionFunctionInfo {
            id: 65537,
            name: "pf01".to_string(),
            create_date: NaiveDate::from_ymd_opt(2020, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .expect("date"),
            number_of_partitions: 4,
            range_type: RangeType::Left,
            function_type: "RANGE".to_string(),
            is_system: false,
        }
    }

    #[test]
    fn projects_identifying_fields() {
        let identity = ServerIdentity::new("srv1", None);
        let record = project(&identity, "db1", &pf01());
        assert_eq!(record.computer_name, "srv1");
        assert_eq!(record.instance_name, "MSSQLSERVER");
        assert_eq!(record.sql_instance, "srv1");
        assert_eq!(record.database, "db1");
        assert_eq!(record.function, pf01());
    }

    #[test]
    fn serializes_pascal_case_fields() {
        let identity = ServerIdentity::new("srv1", Some("BI"));
        let value = serde_json::to_value(project(&identity, "db1", &pf01())).expect("json");
        assert_eq!(value["SqlInstance"], r"srv1\BI");
        assert_eq!(value["Database"], "db1");
        assert_eq!(value["Name"], "pf01");
        assert_eq!(value["NumberOfPartitions"], 4);
        assert_eq!(value["CreateDate"], "2020-01-01T00:00:00");
        assert_eq!(value["RangeType"], "LEFT");
        assert_eq!(value["Type"], "RANGE");
    }

    #[test]
    fn default_view_has_seven_columns() {
        let identity = ServerIdentity::new("srv1", None);
        let records = vec![project(&identity, "db1", &pf01())];
        let rs = to_result_set(&records, view(false));
        let headers = rs.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
        assert_eq!(
            headers,
            vec![
                "ComputerName",
                "InstanceName",
                "SqlInstance",
                "Database",
                "CreateDate",
                "Name",
                "NumberOfPartitions"
            ]
        );
        assert_eq!(rs.rows[0][4], Value::Text("2020-01-01 00:00:00".to_string()));
        assert_eq!(rs.rows[0][6], Value::Int(4));
    }

    #[test]
    fn full_view_adds_catalog_columns() {
        let identity = ServerIdentity::new("srv1", None);
        let records = vec![project(&identity, "db1", &pf01())];
        let rs = to_result_set(&records, view(true));
        assert_eq!(rs.columns.len(), 11);
        assert_eq!(rs.rows[0][8], Value::Text("LEFT".to_string()));
        assert_eq!(rs.rows[0][10], Value::Bool(false));
    }
}

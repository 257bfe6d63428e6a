pub const SERVER_IDENTITY: &str = r#"
SELECT
    CAST(SERVERPROPERTY('MachineName') AS nvarchar(128)) AS machineName,
    CAST(SERVERPROPERTY('InstanceName') AS nvarchar(128)) AS instanceName
"#;

pub const DATABASES: &str = r#"
SELECT
    name AS name,
    CAST(ISNULL(HAS_DBACCESS(name), 0) AS int) AS hasAccess,
    state_desc AS stateDesc
FROM sys.databases
ORDER BY name;
"#;

pub const DATABASE_ACCESS: &str = r#"
SELECT
    name AS name,
    CAST(ISNULL(HAS_DBACCESS(name), 0) AS int) AS hasAccess,
    state_desc AS stateDesc
FROM sys.databases
WHERE name = @P1;
"#;

/// Partition functions live in each database's own catalog, so the query is
/// built per database with a bracket-quoted three-part name.
pub fn partition_functions(database: &str) -> String {
    format!(
        r#"
SELECT
    pf.function_id AS functionId,
    pf.name AS name,
    pf.type_desc AS typeDesc,
    pf.fanout AS fanout,
    pf.boundary_value_on_right AS boundaryOnRight,
    pf.is_system AS isSystem,
    pf.create_date AS createDate
FROM {}.sys.partition_functions pf
ORDER BY pf.name;
"#,
        quote_name(database)
    )
}

/// Equivalent of T-SQL `QUOTENAME` with bracket delimiters.
pub fn quote_name(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

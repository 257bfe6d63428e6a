use tiberius::{FromSql, Query, Row};

use crate::db::client::TdsClient;
use crate::error::AppError;

pub async fn fetch_rows(query: Query<'_>, client: &mut TdsClient) -> Result<Vec<Row>, AppError> {
    let stream = query
        .query(client)
        .await
        .map_err(|err| AppError::query(err.to_string()))?;
    stream
        .into_first_result()
        .await
        .map_err(|err| AppError::query(err.to_string()))
}

pub fn optional<'a, T>(row: &'a Row, column: &str) -> Result<Option<T>, AppError>
where
    T: FromSql<'a>,
{
    row.try_get::<T, _>(column)
        .map_err(|err| AppError::query(format!("column {}: {}", column, err)))
}

pub fn required<'a, T>(row: &'a Row, column: &str) -> Result<T, AppError>
where
    T: FromSql<'a>,
{
    optional(row, column)?
        .ok_or_else(|| AppError::query(format!("column {} was NULL", column)))
}

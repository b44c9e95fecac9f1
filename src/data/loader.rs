// ============================================================
// Layer 4 — SQL Server Loader
// ============================================================
// Runs the five fixed read queries against the warehouse database
// and materialises each result set as a Vec of domain records.
//
// Connection lifecycle:
//   One TDS connection is opened at the start of load_all(),
//   used serially for the five queries, and closed before
//   load_all() returns. Nothing is pooled and nothing is retried;
//   any failure aborts the run with the name of the failing query.
//
// The queries CAST every column to a fixed SQL type so row
// decoding does not depend on how a given site declared its keys
// (INT vs VARCHAR) or measures (DECIMAL vs FLOAT).

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tiberius::{Client, Config, Row};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::domain::error::PipelineError;
use crate::domain::records::{Item, Location, Task, TaskDetail, WarehouseSnapshot, Worker};
use crate::domain::traits::WarehouseSource;

type DbClient = Client<Compat<TcpStream>>;

// ─── Queries ──────────────────────────────────────────────────────────────────

pub const LOCN_HDR_SQL: &str = "\
SELECT CAST(LOCN_ID AS NVARCHAR(64)) AS LOCN_ID,
       CAST(X_COORDINATE AS FLOAT) AS X_COORDINATE,
       CAST(Y_COORDINATE AS FLOAT) AS Y_COORDINATE
FROM LOCN_HDR";

pub const ITEMS_SQL: &str = "\
SELECT CAST(ITEM_ID AS NVARCHAR(64)) AS ITEM_ID,
       CAST(PRODUCT_CLASS AS NVARCHAR(64)) AS PRODUCT_CLASS,
       CAST(WEIGHT AS FLOAT) AS WEIGHT,
       CAST(VOLUME AS FLOAT) AS VOLUME
FROM ITEMS";

pub const USERS_SQL: &str = "\
SELECT CAST(USER_ID AS NVARCHAR(64)) AS USER_ID,
       CAST(DEPARTMENT_CODE AS NVARCHAR(64)) AS DEPARTMENT_CODE,
       CAST(SHIFT_ID AS NVARCHAR(64)) AS SHIFT_ID,
       CAST(HIRE_DATE AS DATETIME2) AS HIRE_DATE
FROM USERS";

pub const TASK_HDR_SQL: &str = "\
SELECT CAST(TASK_ID AS NVARCHAR(64)) AS TASK_ID,
       CAST(TASK_TYPE AS NVARCHAR(64)) AS TASK_TYPE,
       CAST(USER_ID AS NVARCHAR(64)) AS USER_ID,
       CAST(EQUIPMENT_ID AS NVARCHAR(64)) AS EQUIPMENT_ID,
       CAST(CREATED_DATE_TIME AS DATETIME2) AS CREATED_DATE_TIME,
       CAST(COMPLETED_DATE_TIME AS DATETIME2) AS COMPLETED_DATE_TIME
FROM TASK_HDR";

pub const TASK_DTL_SQL: &str = "\
SELECT CAST(TASK_DTL_ID AS NVARCHAR(64)) AS TASK_DTL_ID,
       CAST(TASK_ID AS NVARCHAR(64)) AS TASK_ID,
       CAST(SEQ_NBR AS BIGINT) AS SEQ_NBR,
       CAST(PULL_LOCN_ID AS NVARCHAR(64)) AS PULL_LOCN_ID,
       CAST(ITEM_ID AS NVARCHAR(64)) AS ITEM_ID,
       CAST(QTY_PULLD AS FLOAT) AS QTY_PULLD
FROM TASK_DTL";

// ─── SqlServerLoader ──────────────────────────────────────────────────────────

/// Loads the five source tables from SQL Server.
/// Implements the WarehouseSource trait from Layer 3.
pub struct SqlServerLoader {
    /// ADO.NET style connection string, e.g.
    /// `server=tcp:db.local,1433;database=WMS;user=...;password=...`
    connection_string: String,
}

impl SqlServerLoader {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self { connection_string: connection_string.into() }
    }

    async fn load_async(&self) -> Result<WarehouseSnapshot> {
        let mut client = connect(&self.connection_string).await?;

        let locations    = fetch(&mut client, "LOCN_HDR", LOCN_HDR_SQL, location_from_row).await?;
        let items        = fetch(&mut client, "ITEMS",    ITEMS_SQL,    item_from_row).await?;
        let workers      = fetch(&mut client, "USERS",    USERS_SQL,    worker_from_row).await?;
        let tasks        = fetch(&mut client, "TASK_HDR", TASK_HDR_SQL, task_from_row).await?;
        let task_details = fetch(&mut client, "TASK_DTL", TASK_DTL_SQL, detail_from_row).await?;

        // Release the connection before any processing starts
        if let Err(e) = client.close().await {
            tracing::warn!("Closing the database connection failed: {}", e);
        }

        Ok(WarehouseSnapshot { locations, items, workers, tasks, task_details })
    }
}

impl WarehouseSource for SqlServerLoader {
    fn load_all(&self) -> Result<WarehouseSnapshot> {
        // The load phase is the only async part of the pipeline, so it
        // gets its own single-threaded runtime that dies with it.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Cannot start the database runtime")?;

        let snapshot = runtime.block_on(self.load_async())?;
        tracing::info!("Loaded from SQL Server: {}", snapshot.summary());
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        // Never log the password
        let host = self
            .connection_string
            .split(';')
            .find(|part| {
                let key = part.trim().to_ascii_lowercase();
                key.starts_with("server=") || key.starts_with("data source=")
            })
            .unwrap_or("server=<unspecified>");
        format!("SQL Server ({})", host.trim())
    }
}

async fn connect(connection_string: &str) -> Result<DbClient, PipelineError> {
    let config = Config::from_ado_string(connection_string)
        .map_err(|e| PipelineError::Connection(e.to_string()))?;

    let tcp = TcpStream::connect(config.get_addr())
        .await
        .map_err(|e| PipelineError::Connection(e.to_string()))?;
    tcp.set_nodelay(true)
        .map_err(|e| PipelineError::Connection(e.to_string()))?;

    let client = Client::connect(config, tcp.compat_write())
        .await
        .map_err(|e| PipelineError::Connection(e.to_string()))?;

    tracing::debug!("Database connection opened");
    Ok(client)
}

/// Run one query and decode every row of its first result set.
async fn fetch<T>(
    client: &mut DbClient,
    query:  &'static str,
    sql:    &str,
    decode: fn(&Row) -> Result<T, PipelineError>,
) -> Result<Vec<T>, PipelineError> {
    let rows = client
        .simple_query(sql)
        .await
        .map_err(|e| PipelineError::Query { query, message: e.to_string() })?
        .into_first_result()
        .await
        .map_err(|e| PipelineError::Query { query, message: e.to_string() })?;

    tracing::debug!("{}: {} rows", query, rows.len());
    rows.iter().map(decode).collect()
}

// ─── Row decoding ─────────────────────────────────────────────────────────────

fn location_from_row(row: &Row) -> Result<Location, PipelineError> {
    const T: &str = "LOCN_HDR";
    Ok(Location {
        locn_id: text(row, 0, T, "LOCN_ID")?,
        x:       real(row, 1, T, "X_COORDINATE")?,
        y:       real(row, 2, T, "Y_COORDINATE")?,
    })
}

fn item_from_row(row: &Row) -> Result<Item, PipelineError> {
    const T: &str = "ITEMS";
    Ok(Item {
        item_id:       text(row, 0, T, "ITEM_ID")?,
        product_class: optional_text(row, 1, T)?.unwrap_or_default(),
        weight:        real(row, 2, T, "WEIGHT")?,
        volume:        real(row, 3, T, "VOLUME")?,
    })
}

fn worker_from_row(row: &Row) -> Result<Worker, PipelineError> {
    const T: &str = "USERS";
    Ok(Worker {
        user_id:         text(row, 0, T, "USER_ID")?,
        department_code: text(row, 1, T, "DEPARTMENT_CODE")?,
        shift_id:        text(row, 2, T, "SHIFT_ID")?,
        hire_date:       timestamp(row, 3, T)?
            .ok_or(PipelineError::MissingValue { table: T, column: "HIRE_DATE" })?,
    })
}

fn task_from_row(row: &Row) -> Result<Task, PipelineError> {
    const T: &str = "TASK_HDR";
    Ok(Task {
        task_id:      text(row, 0, T, "TASK_ID")?,
        task_type:    text(row, 1, T, "TASK_TYPE")?,
        user_id:      text(row, 2, T, "USER_ID")?,
        // manual picks carry no equipment
        equipment_id: optional_text(row, 3, T)?.unwrap_or_default(),
        created:      timestamp(row, 4, T)?
            .ok_or(PipelineError::MissingValue { table: T, column: "CREATED_DATE_TIME" })?,
        completed:    timestamp(row, 5, T)?,
    })
}

fn detail_from_row(row: &Row) -> Result<TaskDetail, PipelineError> {
    const T: &str = "TASK_DTL";
    let seq_nbr = row
        .try_get::<i64, _>(2)
        .map_err(|e| PipelineError::Query { query: T, message: e.to_string() })?
        .ok_or(PipelineError::MissingValue { table: T, column: "SEQ_NBR" })?;
    Ok(TaskDetail {
        task_dtl_id:  text(row, 0, T, "TASK_DTL_ID")?,
        task_id:      text(row, 1, T, "TASK_ID")?,
        seq_nbr,
        pull_locn_id: text(row, 3, T, "PULL_LOCN_ID")?,
        item_id:      text(row, 4, T, "ITEM_ID")?,
        qty_pulled:   real(row, 5, T, "QTY_PULLD")?,
    })
}

fn optional_text(row: &Row, idx: usize, table: &'static str) -> Result<Option<String>, PipelineError> {
    row.try_get::<&str, _>(idx)
        .map(|v| v.map(str::to_owned))
        .map_err(|e| PipelineError::Query { query: table, message: e.to_string() })
}

fn text(row: &Row, idx: usize, table: &'static str, column: &'static str) -> Result<String, PipelineError> {
    optional_text(row, idx, table)?.ok_or(PipelineError::MissingValue { table, column })
}

fn real(row: &Row, idx: usize, table: &'static str, column: &'static str) -> Result<f64, PipelineError> {
    row.try_get::<f64, _>(idx)
        .map_err(|e| PipelineError::Query { query: table, message: e.to_string() })?
        .ok_or(PipelineError::MissingValue { table, column })
}

fn timestamp(row: &Row, idx: usize, table: &'static str) -> Result<Option<NaiveDateTime>, PipelineError> {
    row.try_get::<NaiveDateTime, _>(idx)
        .map_err(|e| PipelineError::Query { query: table, message: e.to_string() })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_select_declared_columns() {
        let expected: [(&str, &[&str]); 5] = [
            (LOCN_HDR_SQL, &["LOCN_ID", "X_COORDINATE", "Y_COORDINATE", "FROM LOCN_HDR"]),
            (ITEMS_SQL,    &["ITEM_ID", "PRODUCT_CLASS", "WEIGHT", "VOLUME", "FROM ITEMS"]),
            (USERS_SQL,    &["USER_ID", "DEPARTMENT_CODE", "SHIFT_ID", "HIRE_DATE", "FROM USERS"]),
            (TASK_HDR_SQL, &["TASK_ID", "TASK_TYPE", "EQUIPMENT_ID", "CREATED_DATE_TIME",
                             "COMPLETED_DATE_TIME", "FROM TASK_HDR"]),
            (TASK_DTL_SQL, &["TASK_DTL_ID", "SEQ_NBR", "PULL_LOCN_ID", "QTY_PULLD", "FROM TASK_DTL"]),
        ];
        for (sql, columns) in expected {
            for column in columns {
                assert!(sql.contains(column), "{column} missing from:\n{sql}");
            }
        }
    }

    #[test]
    fn test_describe_hides_credentials() {
        let loader = SqlServerLoader::new(
            "server=tcp:db.local,1433;database=WMS;user=sa;password=hunter2",
        );
        let d = loader.describe();
        assert!(d.contains("db.local"));
        assert!(!d.contains("hunter2"));
    }

    #[test]
    fn test_unreachable_server_is_a_connection_error() {
        // Port 1 on loopback refuses immediately
        let loader = SqlServerLoader::new(
            "server=tcp:127.0.0.1,1;user=sa;password=x;TrustServerCertificate=true",
        );
        let err = loader.load_all().unwrap_err();
        let pipeline = err.downcast_ref::<PipelineError>();
        assert!(matches!(pipeline, Some(PipelineError::Connection(_))), "got: {err:#}");
    }
}

//! The SQLite-backed request store.

use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, Row, params, types::Type};

use passgate_core::diff::EditedFields;
use passgate_core::error::StoreError;
use passgate_core::model::{ActorId, DraftRequest, Request, RequestId, Status};
use passgate_core::store::RequestStore;

/// Request store and actor directory over one SQLite connection.
pub struct SqliteStore {
    pub(crate) conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the store at `path` and migrate it.
    ///
    /// # Errors
    ///
    /// Returns an error if opening/configuring/migrating the database fails.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: crate::open_connection(path)?,
        })
    }

    /// In-memory store for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if configuring/migrating the database fails.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        crate::migrations::migrate(&mut conn)?;
        Ok(Self { conn })
    }

    fn row_exists(&self, id: RequestId) -> Result<bool, StoreError> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM requests WHERE id = ?1)",
                params![id.0],
                |row| row.get(0),
            )
            .map_err(unavailable)
    }
}

pub(crate) fn unavailable(err: rusqlite::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn map_request(row: &Row<'_>) -> rusqlite::Result<Request> {
    let status_raw: String = row.get("status")?;
    let status = status_raw.parse::<Status>().map_err(|parse_err| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(parse_err))
    })?;

    let people_count: Option<i64> = row.get("people_count")?;
    let people_count = people_count
        .map(u32::try_from)
        .transpose()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(err)))?;

    let version: i64 = row.get("version")?;
    let version = u64::try_from(version).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(err))
    })?;

    let edited_raw: String = row.get("edited_fields")?;

    Ok(Request {
        id: RequestId(row.get("id")?),
        user_id: ActorId(row.get("user_id")?),
        operator_id: row.get::<_, Option<i64>>("operator_id")?.map(ActorId),
        division: row.get("division")?,
        direction: row.get("direction")?,
        checkpoint: row.get("checkpoint")?,
        date_start: row.get("date_start")?,
        date_end: row.get("date_end")?,
        time_start: row.get("time_start")?,
        time_end: row.get("time_end")?,
        car_brand: row.get("car_brand")?,
        people_count,
        leader_name: row.get("leader_name")?,
        cargo: row.get("cargo")?,
        purpose: row.get("purpose")?,
        status,
        edited_fields: EditedFields::from_delimited(&edited_raw),
        reason: row.get("reason")?,
        version,
    })
}

const SELECT_COLUMNS: &str = "SELECT id, user_id, operator_id, division, direction, checkpoint,
            date_start, date_end, time_start, time_end, car_brand, people_count,
            leader_name, cargo, purpose, status, edited_fields, reason, version
     FROM requests";

impl RequestStore for SqliteStore {
    fn get(&self, id: RequestId) -> Result<Request, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id.0], map_request)
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(id),
                other => unavailable(other),
            })
    }

    fn create(&self, user: ActorId, draft: &DraftRequest) -> Result<Request, StoreError> {
        let created_at_us = chrono::Utc::now().timestamp_micros();
        self.conn
            .execute(
                "INSERT INTO requests (
                    user_id, division, direction, checkpoint,
                    date_start, date_end, time_start, time_end,
                    car_brand, people_count, leader_name, cargo,
                    purpose, status, edited_fields, version, created_at_us
                 ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                    ?13, 'new', '', 1, ?14
                 )",
                params![
                    user.0,
                    draft.division,
                    draft.direction,
                    draft.checkpoint,
                    draft.date_start,
                    draft.date_end,
                    draft.time_start,
                    draft.time_end,
                    draft.car_brand,
                    draft.people_count.map(i64::from),
                    draft.leader_name,
                    draft.cargo,
                    draft.purpose,
                    created_at_us,
                ],
            )
            .map_err(unavailable)?;

        let id = RequestId(self.conn.last_insert_rowid());
        tracing::debug!(request = %id, user = %user, "request row created");
        self.get(id)
    }

    fn update(&self, row: &Request, expected_version: u64) -> Result<Request, StoreError> {
        let expected = i64::try_from(expected_version)
            .map_err(|_| StoreError::Unavailable("version out of range".to_string()))?;
        let changed = self
            .conn
            .execute(
                "UPDATE requests SET
                    division = ?1, direction = ?2, checkpoint = ?3,
                    date_start = ?4, date_end = ?5, time_start = ?6, time_end = ?7,
                    car_brand = ?8, people_count = ?9, leader_name = ?10, cargo = ?11,
                    purpose = ?12, status = ?13, edited_fields = ?14, reason = ?15,
                    operator_id = ?16, version = version + 1
                 WHERE id = ?17 AND version = ?18",
                params![
                    row.division,
                    row.direction,
                    row.checkpoint,
                    row.date_start,
                    row.date_end,
                    row.time_start,
                    row.time_end,
                    row.car_brand,
                    row.people_count.map(i64::from),
                    row.leader_name,
                    row.cargo,
                    row.purpose,
                    row.status.to_string(),
                    row.edited_fields.to_delimited(),
                    row.reason,
                    row.operator_id.map(|op| op.0),
                    row.id.0,
                    expected,
                ],
            )
            .map_err(unavailable)?;

        if changed == 0 {
            // Disambiguate a stale write from a missing row.
            return if self.row_exists(row.id)? {
                Err(StoreError::Conflict(row.id))
            } else {
                Err(StoreError::NotFound(row.id))
            };
        }
        self.get(row.id)
    }

    fn list_by_operator_and_date_range(
        &self,
        operator: ActorId,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> Result<Vec<Request>, StoreError> {
        // The schedule view deliberately includes requests worked by other
        // operators; free-form rows (no start date, purpose only) ride along
        // with every window.
        tracing::debug!(operator = %operator, %from, %to, "schedule range query");
        let sql = format!(
            "{SELECT_COLUMNS}
             WHERE (
                     (date_start >= ?1 AND date_start <= ?2)
                     OR (date_start IS NULL AND purpose IS NOT NULL)
                 )
             ORDER BY id ASC"
        );
        let mut stmt = self.conn.prepare(&sql).map_err(unavailable)?;
        let rows = stmt
            .query_map(params![from.to_string(), to.to_string()], map_request)
            .map_err(unavailable)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(unavailable)?;
        Ok(rows)
    }

    fn list_all(&self) -> Result<Vec<Request>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY id ASC");
        let mut stmt = self.conn.prepare(&sql).map_err(unavailable)?;
        let rows = stmt
            .query_map([], map_request)
            .map_err(unavailable)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(unavailable)?;
        Ok(rows)
    }
}

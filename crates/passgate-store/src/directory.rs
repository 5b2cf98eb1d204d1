//! The actor directory over the same SQLite database.
//!
//! The engine only reads from here; the mutating surface (upsert, role
//! changes, block flags) is the admin tooling's, exposed as inherent
//! methods on [`SqliteStore`].

use rusqlite::{Row, params, types::Type};

use passgate_core::error::StoreError;
use passgate_core::model::{Actor, ActorId, Role};
use passgate_core::store::ActorDirectory;

use crate::store::{SqliteStore, unavailable};

fn map_actor(row: &Row<'_>) -> rusqlite::Result<Actor> {
    let role_raw: String = row.get("role")?;
    let role = role_raw.parse::<Role>().map_err(|parse_err| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(parse_err))
    })?;
    Ok(Actor {
        id: ActorId(row.get("actor_id")?),
        username: row.get("username")?,
        full_name: row.get("full_name")?,
        role,
        blocked: row.get("blocked")?,
    })
}

const SELECT_ACTOR: &str =
    "SELECT actor_id, username, full_name, role, blocked FROM actors";

impl SqliteStore {
    /// Insert or replace a directory entry.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the write fails.
    pub fn upsert_actor(&self, actor: &Actor) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO actors (actor_id, username, full_name, role, blocked)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(actor_id) DO UPDATE SET
                    username = excluded.username,
                    full_name = excluded.full_name,
                    role = excluded.role,
                    blocked = excluded.blocked",
                params![
                    actor.id.0,
                    actor.username,
                    actor.full_name,
                    actor.role.to_string(),
                    actor.blocked,
                ],
            )
            .map_err(unavailable)?;
        Ok(())
    }

    /// Change one actor's role. Returns `false` when the id is unknown.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the write fails.
    pub fn set_actor_role(&self, id: ActorId, role: Role) -> Result<bool, StoreError> {
        let changed = self
            .conn
            .execute(
                "UPDATE actors SET role = ?1 WHERE actor_id = ?2",
                params![role.to_string(), id.0],
            )
            .map_err(unavailable)?;
        Ok(changed == 1)
    }

    /// Set or clear the block flag. Returns `false` when the id is unknown.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the write fails.
    pub fn set_actor_blocked(&self, id: ActorId, blocked: bool) -> Result<bool, StoreError> {
        let changed = self
            .conn
            .execute(
                "UPDATE actors SET blocked = ?1 WHERE actor_id = ?2",
                params![blocked, id.0],
            )
            .map_err(unavailable)?;
        Ok(changed == 1)
    }

    /// Every directory entry, ordered by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the read fails.
    pub fn list_actors(&self) -> Result<Vec<Actor>, StoreError> {
        let sql = format!("{SELECT_ACTOR} ORDER BY actor_id ASC");
        let mut stmt = self.conn.prepare(&sql).map_err(unavailable)?;
        let actors = stmt
            .query_map([], map_actor)
            .map_err(unavailable)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(unavailable)?;
        Ok(actors)
    }

    fn list_by_role(&self, role: Role) -> Result<Vec<Actor>, StoreError> {
        let sql = format!("{SELECT_ACTOR} WHERE role = ?1 ORDER BY actor_id ASC");
        let mut stmt = self.conn.prepare(&sql).map_err(unavailable)?;
        let actors = stmt
            .query_map(params![role.to_string()], map_actor)
            .map_err(unavailable)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(unavailable)?;
        Ok(actors)
    }
}

impl ActorDirectory for SqliteStore {
    fn get_actor(&self, id: ActorId) -> Result<Option<Actor>, StoreError> {
        let sql = format!("{SELECT_ACTOR} WHERE actor_id = ?1");
        match self.conn.query_row(&sql, params![id.0], map_actor) {
            Ok(actor) => Ok(Some(actor)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(unavailable(other)),
        }
    }

    fn list_operators(&self) -> Result<Vec<Actor>, StoreError> {
        self.list_by_role(Role::Operator)
    }

    fn list_admins(&self) -> Result<Vec<Actor>, StoreError> {
        self.list_by_role(Role::Admin)
    }
}

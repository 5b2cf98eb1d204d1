//! Collaborator contracts: the request store and the actor directory.
//!
//! The engine reads a row, validates against that snapshot, and writes the
//! new row through [`RequestStore::update`] with the version it read. A store
//! must compare-and-set on that version — never blind-overwrite — so a
//! concurrent writer surfaces as [`StoreError::Conflict`] and the caller
//! retries against fresh state.
//!
//! [`MemoryStore`]/[`MemoryDirectory`] implement both contracts in memory
//! with the same versioning semantics, for tests and embedders.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::model::{Actor, ActorId, DraftRequest, Request, RequestId, Role, Status};

/// Transactional key-value-by-id store for request rows.
pub trait RequestStore {
    /// Fetch one request.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] for an unknown id.
    fn get(&self, id: RequestId) -> Result<Request, StoreError>;

    /// Persist a new submission with status `New`, an empty edited set, and
    /// version 1. Returns the stored row including the assigned id.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the store cannot be reached.
    fn create(&self, user: ActorId, draft: &DraftRequest) -> Result<Request, StoreError>;

    /// Atomically replace the row if its version still equals
    /// `expected_version`; bumps the version by one. Returns the stored row.
    ///
    /// # Errors
    ///
    /// [`StoreError::Conflict`] when the row changed since it was read,
    /// [`StoreError::NotFound`] for an unknown id.
    fn update(&self, row: &Request, expected_version: u64) -> Result<Request, StoreError>;

    /// Requests whose `date_start` falls in `[from, to]` (ISO dates compare
    /// lexically), plus every free-form request regardless of date. The view
    /// deliberately includes requests worked by other operators; the id is
    /// accepted for the interface and tracing only.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the store cannot be reached.
    fn list_by_operator_and_date_range(
        &self,
        operator: ActorId,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> Result<Vec<Request>, StoreError>;

    /// Every request row, ordered by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the store cannot be reached.
    fn list_all(&self) -> Result<Vec<Request>, StoreError>;
}

/// Read access to the external actor directory.
///
/// The engine looks actors up at decision time and never creates them;
/// role and block state are mutated through directory-owned admin surfaces.
pub trait ActorDirectory {
    /// Look one actor up; `None` for an id the directory has never seen.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the directory cannot be reached.
    fn get_actor(&self, id: ActorId) -> Result<Option<Actor>, StoreError>;

    /// All actors carrying the operator role.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the directory cannot be reached.
    fn list_operators(&self) -> Result<Vec<Actor>, StoreError>;

    /// All actors carrying the admin role.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the directory cannot be reached.
    fn list_admins(&self) -> Result<Vec<Actor>, StoreError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: i64,
    rows: BTreeMap<i64, Request>,
}

/// In-memory [`RequestStore`] with the same CAS semantics as the SQLite
/// implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))
    }
}

impl RequestStore for MemoryStore {
    fn get(&self, id: RequestId) -> Result<Request, StoreError> {
        self.lock()?
            .rows
            .get(&id.0)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn create(&self, user: ActorId, draft: &DraftRequest) -> Result<Request, StoreError> {
        let mut inner = self.lock()?;
        inner.next_id += 1;
        let id = RequestId(inner.next_id);
        let row = Request {
            id,
            user_id: user,
            operator_id: None,
            division: draft.division.clone(),
            direction: draft.direction.clone(),
            checkpoint: draft.checkpoint.clone(),
            date_start: draft.date_start.clone(),
            date_end: draft.date_end.clone(),
            time_start: draft.time_start.clone(),
            time_end: draft.time_end.clone(),
            car_brand: draft.car_brand.clone(),
            people_count: draft.people_count,
            leader_name: draft.leader_name.clone(),
            cargo: draft.cargo.clone(),
            purpose: draft.purpose.clone(),
            status: Status::New,
            edited_fields: crate::diff::EditedFields::new(),
            reason: None,
            version: 1,
        };
        inner.rows.insert(id.0, row.clone());
        Ok(row)
    }

    fn update(&self, row: &Request, expected_version: u64) -> Result<Request, StoreError> {
        let mut inner = self.lock()?;
        let current = inner
            .rows
            .get_mut(&row.id.0)
            .ok_or(StoreError::NotFound(row.id))?;
        if current.version != expected_version {
            return Err(StoreError::Conflict(row.id));
        }
        let mut stored = row.clone();
        stored.version = expected_version + 1;
        *current = stored.clone();
        Ok(stored)
    }

    fn list_by_operator_and_date_range(
        &self,
        operator: ActorId,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> Result<Vec<Request>, StoreError> {
        tracing::debug!(operator = %operator, %from, %to, "memory range scan");
        let from = from.to_string();
        let to = to.to_string();
        Ok(self
            .lock()?
            .rows
            .values()
            .filter(|row| {
                // Undated rows with a purpose ride along with every window,
                // matching the SQL store's free-form branch.
                row.date_start.as_deref().map_or_else(
                    || !row.purpose.trim().is_empty(),
                    |d| from.as_str() <= d && d <= to.as_str(),
                )
            })
            .cloned()
            .collect())
    }

    fn list_all(&self) -> Result<Vec<Request>, StoreError> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }
}

/// In-memory [`ActorDirectory`] for tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    actors: Mutex<BTreeMap<i64, Actor>>,
}

impl MemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a directory entry.
    ///
    /// # Panics
    ///
    /// Panics if the directory lock is poisoned.
    pub fn upsert(&self, actor: Actor) {
        self.actors
            .lock()
            .expect("memory directory poisoned")
            .insert(actor.id.0, actor);
    }

    fn by_role(&self, role: Role) -> Result<Vec<Actor>, StoreError> {
        Ok(self
            .actors
            .lock()
            .map_err(|_| StoreError::Unavailable("memory directory poisoned".to_string()))?
            .values()
            .filter(|actor| actor.role == role)
            .cloned()
            .collect())
    }
}

impl ActorDirectory for MemoryDirectory {
    fn get_actor(&self, id: ActorId) -> Result<Option<Actor>, StoreError> {
        Ok(self
            .actors
            .lock()
            .map_err(|_| StoreError::Unavailable("memory directory poisoned".to_string()))?
            .get(&id.0)
            .cloned())
    }

    fn list_operators(&self) -> Result<Vec<Actor>, StoreError> {
        self.by_role(Role::Operator)
    }

    fn list_admins(&self) -> Result<Vec<Actor>, StoreError> {
        self.by_role(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::{ActorDirectory, MemoryDirectory, MemoryStore, RequestStore};
    use crate::error::StoreError;
    use crate::model::{Actor, ActorId, DraftRequest, RequestId, Role, Status};

    #[test]
    fn create_assigns_sequential_ids_and_version_one() {
        let store = MemoryStore::new();
        let first = store
            .create(ActorId(42), &DraftRequest::free_form("first"))
            .expect("create");
        let second = store
            .create(ActorId(42), &DraftRequest::free_form("second"))
            .expect("create");
        assert_eq!(first.id, RequestId(1));
        assert_eq!(second.id, RequestId(2));
        assert_eq!(first.version, 1);
        assert_eq!(first.status, Status::New);
        assert!(first.edited_fields.is_empty());
    }

    #[test]
    fn update_bumps_version_and_detects_staleness() {
        let store = MemoryStore::new();
        let row = store
            .create(ActorId(42), &DraftRequest::free_form("cas"))
            .expect("create");

        let mut changed = row.clone();
        changed.status = Status::Duplicated;
        let stored = store.update(&changed, row.version).expect("first write");
        assert_eq!(stored.version, 2);

        // Second writer still holds version 1.
        let err = store.update(&changed, row.version).expect_err("stale");
        assert_eq!(err, StoreError::Conflict(row.id));
    }

    #[test]
    fn get_unknown_is_not_found() {
        let store = MemoryStore::new();
        assert_eq!(
            store.get(RequestId(99)).expect_err("missing"),
            StoreError::NotFound(RequestId(99))
        );
    }

    #[test]
    fn range_listing_includes_free_form_rows() {
        let store = MemoryStore::new();
        let mut dated = DraftRequest::free_form("dated trip");
        dated.checkpoint = Some("north gate".to_string());
        dated.date_start = Some("2024-05-10".to_string());
        store.create(ActorId(1), &dated).expect("create dated");

        let mut outside = dated.clone();
        outside.date_start = Some("2024-07-01".to_string());
        store.create(ActorId(1), &outside).expect("create outside");

        store
            .create(ActorId(2), &DraftRequest::free_form("whenever possible"))
            .expect("create free-form");

        let from = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).expect("date");
        let to = chrono::NaiveDate::from_ymd_opt(2024, 5, 31).expect("date");
        let listed = store
            .list_by_operator_and_date_range(ActorId(7), from, to)
            .expect("list");
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|r| r.date_start.is_some()));
        assert!(listed.iter().any(|r| r.is_free_form()));
    }

    #[test]
    fn directory_filters_by_role() {
        let directory = MemoryDirectory::new();
        directory.upsert(Actor::new(ActorId(1), Role::Admin));
        directory.upsert(Actor::new(ActorId(7), Role::Operator));
        directory.upsert(Actor::new(ActorId(8), Role::Operator));
        directory.upsert(Actor::new(ActorId(42), Role::User));

        assert_eq!(directory.list_admins().expect("admins").len(), 1);
        assert_eq!(directory.list_operators().expect("operators").len(), 2);
        assert!(
            directory
                .get_actor(ActorId(42))
                .expect("lookup")
                .is_some_and(|a| a.role == Role::User)
        );
        assert!(directory.get_actor(ActorId(99)).expect("lookup").is_none());
    }
}

//! passgate-core: request lifecycle engine and collaborator contracts.
//!
//! The engine ([`engine::Engine`]) owns the status state machine for
//! checkpoint-crossing requests: transition legality, role checks, field
//! mutations, operator assignment, and notification-intent output. Everything
//! around it is a contract — [`store::RequestStore`], [`store::ActorDirectory`],
//! [`dispatch::NotificationDispatcher`] — implemented elsewhere.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::EngineError`] results from the engine;
//!   `anyhow::Result` at I/O edges such as config loading.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod config;
pub mod diff;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod model;
pub mod store;
pub mod window;

pub use diff::EditedFields;
pub use engine::{Action, Engine, NotificationIntent, Outcome, Payload, Template};
pub use error::{EngineError, StoreError};
pub use model::{
    Actor, ActorId, DraftRequest, EditableField, Request, RequestId, Role, Status,
};
pub use store::{ActorDirectory, MemoryDirectory, MemoryStore, RequestStore};
pub use window::AllowedWindow;

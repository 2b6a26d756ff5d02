//! Shared domain types for the club booking backend.
//!
//! Contains the entity models, status enums with their transition rules,
//! request/response payloads, and ID/time utilities used by `club-server`.
//! Database derives (`sqlx::FromRow`, `sqlx::Type`) are gated behind the
//! `db` feature so clients can consume the models without pulling in sqlx.

pub mod models;
pub mod util;

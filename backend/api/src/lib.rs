//! Bountyboard REST backend.
//!
//! Thin HTTP handlers over a SQLite data layer: validate the session, shape
//! a query, apply one domain transition from [`bountyboard_core`], return
//! JSON.  All multi-row updates (tranche appends, winner toggles) run in a
//! single database transaction; best-effort side effects (notifications)
//! run post-commit in their own failure boundary.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod notify;
pub mod price;

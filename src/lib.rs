//! Linkdeck - operator console for a short-link redirect service
//!
//! This library implements the console core for managing redirect records
//! over the link-management HTTP API: lifecycle operations (create, edit,
//! soft delete, restore, permanent delete), batch delete/export with
//! per-item failure tolerance, CSV/JSON bulk import, and search.
//!
//! # Architecture
//! - `models`: link record, status state machine, target tagged union
//! - `gateway`: API contract trait with HTTP and in-memory implementations
//! - `console`: session state, creation wizard, batch engine, import
//!   pipeline, search composer, and the UI-agnostic controller
//! - `interfaces`: CLI bound to the controller
//! - `config`: file + environment configuration
//! - `errors`: the console-wide error taxonomy

pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod gateway;
pub mod interfaces;
pub mod models;
pub mod utils;

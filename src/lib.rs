//! `ScheduleBuddy` - scheduling core for a tutor and class planner
//!
//! This crate expands recurring classes into concrete dates, computes and
//! classifies reminders, derives payment display statuses, and keeps each
//! user's records in a small key-value store polled by a reminder job.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Correctness
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Style consistency
    clippy::enum_glob_use,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
)]

/// Configuration management for the database and application settings
pub mod config;
/// Core scheduling logic - recurrence, reminders, payments, schedule views
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Domain records and their status enums
pub mod models;
/// Periodic session-expiry and reminder-dispatch job
pub mod poller;
/// User-scoped key-value storage
pub mod store;

#[cfg(test)]
pub mod test_utils;

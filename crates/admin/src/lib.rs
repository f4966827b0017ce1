//! `carecms-admin` library crate.
//!
//! The screen-side half of the back office: list controllers, debounced
//! search, form submission, notifications and the session context. The
//! command-line entrypoint lives in `main.rs`.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod details;
pub mod error;
pub mod notify;
pub mod screens;
pub mod session;
pub mod submit;

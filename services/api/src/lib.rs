//! Internship management API.
//!
//! This crate primarily ships the `ims-api` binary, but we expose a small
//! library surface to enable integration testing and reuse.

pub mod api;
pub mod assignment;
pub mod config;
pub mod db;
pub mod state;
pub mod store;

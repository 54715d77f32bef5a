//! Customer Success account platform: company records, the CSV bulk-import
//! pipeline, and the HTTP surface that exposes them.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod error;
pub mod import;
pub mod telemetry;

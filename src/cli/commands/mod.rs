//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod backup;
pub mod backup_ids;
pub mod init;
pub mod list;
pub mod session;
pub mod validate;

//! # ago-backup - ArcGIS Online content backup
//!
//! ago-backup exports hosted feature layers and web maps from an ArcGIS
//! Online (or Enterprise) portal into local packages, one directory per item.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Enumerating** the signed-in user's folders and backupable items
//! - **Selecting** items by number or by pasted item IDs
//! - **Resolving** every destination inside a single base directory, rejecting
//!   subpaths that would escape it
//! - **Exporting** items one at a time and reporting each outcome
//!
//! ## Architecture
//!
//! ago-backup follows a layered architecture:
//!
//! - [`cli`] - Command-line interface, console and ID-list front ends
//! - [`core`] - Business logic (sandbox, naming, selection, orchestration)
//! - [`adapters`] - The content store capability and its ArcGIS REST client
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration and credentials loading
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ago_backup::adapters::{arcgis::ArcGisPortal, ContentStore};
//! use ago_backup::config::{load_config, Credentials};
//! use ago_backup::core::backup::BackupOrchestrator;
//! use ago_backup::core::directory::ContentDirectory;
//! use ago_backup::core::sandbox::{BackupBase, PathSandbox};
//! use ago_backup::domain::Selection;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("ago-backup.toml")?;
//!
//!     let store: Arc<dyn ContentStore> = Arc::new(ArcGisPortal::new(config.portal.clone())?);
//!     let session = store
//!         .authenticate(&Credentials::new("alice", "s3cret".to_string())?)
//!         .await?;
//!
//!     let directory = ContentDirectory::new(store.clone());
//!     let folders = directory.list_folders(&session).await?;
//!     let items = directory.list_items(&session, &folders[0]).await?;
//!
//!     let sandbox = PathSandbox::new(
//!         BackupBase::new(&config.backup.base_path)?,
//!         config.backup.naming.policy(),
//!     );
//!     let report = BackupOrchestrator::new(store, sandbox)
//!         .run_backup(&session, &Selection::new(items)?, None)
//!         .await?;
//!
//!     println!("Exported {} items", report.succeeded_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Path Sandboxing
//!
//! User-supplied subpaths are normalized without touching the filesystem and
//! must stay inside the base directory:
//!
//! ```rust
//! use ago_backup::core::naming::NamingScheme;
//! use ago_backup::core::sandbox::{BackupBase, PathSandbox};
//! use ago_backup::domain::BackupError;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let base = BackupBase::new(std::env::temp_dir().join("ago-backup-doc"))?;
//! let sandbox = PathSandbox::new(base, NamingScheme::Dated.policy());
//!
//! assert!(sandbox.resolve("nightly/2026").is_ok());
//! assert!(matches!(
//!     sandbox.resolve("../../etc"),
//!     Err(BackupError::PathTraversal { .. })
//! ));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Error Handling
//!
//! Every fallible library call returns [`domain::Result`] with a
//! [`domain::BackupError`]. Per-item export failures are not errors: they are
//! recorded in the [`core::backup::BackupReport`] and the run continues.
//!
//! ## Logging
//!
//! ago-backup uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(items = 3, "Starting backup");
//! warn!(item_id = "7d44b88c", "Could not checksum exported package");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

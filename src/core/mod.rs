//! Core business logic for ago-backup.
//!
//! # Modules
//!
//! - [`sandbox`] - Destination resolution inside the backup base directory
//! - [`naming`] - Default destination layouts
//! - [`directory`] - Folder and item enumeration for selection
//! - [`selection`] - Parsing of index and identifier input
//! - [`backup`] - Per-item export orchestration and reporting
//! - [`frontend`] - The front-end capability and the shared run driver
//! - [`verification`] - Package checksums
//!
//! # Backup Workflow
//!
//! 1. **Authenticate** against the portal (adapter)
//! 2. **List** folders and backupable items
//! 3. **Select** items by number or by pasted identifiers
//! 4. **Resolve** each destination inside the base directory
//! 5. **Export** items one at a time, recording each outcome
//! 6. **Report** succeeded, failed and not-attempted items
//!
//! # Example
//!
//! ```rust,no_run
//! use ago_backup::adapters::{arcgis::ArcGisPortal, ContentStore};
//! use ago_backup::config::{Credentials, PortalConfig};
//! use ago_backup::core::backup::BackupOrchestrator;
//! use ago_backup::core::directory::ContentDirectory;
//! use ago_backup::core::naming::NamingScheme;
//! use ago_backup::core::sandbox::{BackupBase, PathSandbox};
//! use ago_backup::domain::Selection;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store: Arc<dyn ContentStore> = Arc::new(ArcGisPortal::new(PortalConfig::default())?);
//! let session = store
//!     .authenticate(&Credentials::new("alice", "s3cret".to_string())?)
//!     .await?;
//!
//! let directory = ContentDirectory::new(store.clone());
//! let folders = directory.list_folders(&session).await?;
//! let items = directory.list_items(&session, &folders[0]).await?;
//!
//! let sandbox = PathSandbox::new(BackupBase::new("./backups")?, NamingScheme::Dated.policy());
//! let orchestrator = BackupOrchestrator::new(store, sandbox);
//! let report = orchestrator
//!     .run_backup(&session, &Selection::new(items)?, None)
//!     .await?;
//!
//! println!("Exported: {}", report.succeeded_count());
//! println!("Failed: {}", report.failed_count());
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod directory;
pub mod frontend;
pub mod naming;
pub mod sandbox;
pub mod selection;
pub mod verification;

//! External system integrations for ago-backup.
//!
//! - [`store`] - The [`ContentStore`] capability the backup core consumes
//! - [`arcgis`] - ArcGIS Online / ArcGIS Enterprise implementation
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the remote service and
//! enable testing with in-memory implementations. The core never sees HTTP
//! types; it talks to `Arc<dyn ContentStore>`.
//!
//! ```rust,no_run
//! use ago_backup::adapters::{arcgis::ArcGisPortal, ContentStore};
//! use ago_backup::config::PortalConfig;
//! use std::sync::Arc;
//!
//! # fn example() -> ago_backup::domain::Result<()> {
//! let store: Arc<dyn ContentStore> = Arc::new(ArcGisPortal::new(PortalConfig::default())?);
//! println!("Portal: {}", store.base_url());
//! # Ok(())
//! # }
//! ```

pub mod arcgis;
pub mod store;

pub use store::{ContentStore, Session};

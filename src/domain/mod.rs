//! Domain models and types for ago-backup.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ItemId`], [`FolderId`])
//! - **Content models** ([`Folder`], [`Item`], [`ItemKind`])
//! - **Selections** ([`Selection`]) built from user input
//! - **Error types** ([`BackupError`], [`FailureKind`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Item and folder identifiers are distinct newtypes, so one cannot be passed
//! where the other is expected:
//!
//! ```rust
//! use ago_backup::domain::{FolderId, ItemId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let item_id = ItemId::new("7d44b88c41994bad97dcd78268e01398")?;
//! let folder_id = FolderId::new("0f1e2d3c4b5a")?;
//!
//! // This won't compile:
//! // let wrong: ItemId = folder_id;
//! # Ok(())
//! # }
//! ```

pub mod content;
pub mod context;
pub mod errors;
pub mod ids;
pub mod result;
pub mod selection;

// Re-export commonly used types for convenience
pub use content::{Folder, FolderRef, Item, ItemKind, ROOT_FOLDER_TITLE};
pub use context::ResultExt;
pub use errors::{BackupError, FailureKind};
pub use ids::{FolderId, ItemId};
pub use result::Result;
pub use selection::Selection;

//! ArcGIS portal adapter
//!
//! Implements [`ContentStore`](crate::adapters::ContentStore) against the
//! ArcGIS sharing REST API, plus the wire models it needs.

pub mod client;
pub mod models;

pub use client::{create_package_file, ArcGisPortal};

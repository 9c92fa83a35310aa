//! Post-export package verification
//!
//! Records the size and SHA-256 of each written package.

pub mod checksum;

pub use checksum::{digest_file, PackageDigest};

//! Keyring maintenance for GnuPG.
//!
//! This crate enumerates the public keys in a GPG keyring, tests each one
//! against a set of deletion criteria (revoked, expired, validity or
//! owner-trust threshold, membership in a list file) and deletes the
//! matches, driving `gpg` as a subprocess and parsing its colon-format
//! output into Rust types.
//!
//! # Example
//!
//! ```no_run
//! use keywarden::{AuditCriteria, Auditor, Keyring, ScanOptions};
//!
//! #[tokio::main]
//! async fn main() -> keywarden::Result<()> {
//!     let auditor = Auditor::new(AuditCriteria {
//!         revoked: true,
//!         expired: true,
//!         ..Default::default()
//!     });
//!
//!     let keyring = Keyring::new();
//!     let options = ScanOptions { dry_run: true, ..Default::default() };
//!     let report = keywarden::scan(&keyring, &auditor, &options, |event| {
//!         println!("{event:?}");
//!     })
//!     .await?;
//!     println!("{} key(s) would be deleted", report.matched);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Requirements
//!
//! - `gpg` available on the PATH
//! - Read access to the GPG home directory; write access for deletions

mod audit;
mod backup;
mod error;
mod keyid;
mod keyring;
mod list;
mod parse;
mod scan;
mod stats;
mod types;

pub use audit::{AuditCriteria, AuditMode, Auditor};
pub use backup::{backup_keyring, BackupOptions};
pub use error::{Error, Result};
pub use keyid::short_key_id;
pub use keyring::{DeleteOutcome, Keyring};
pub use list::KeyIdList;
pub use scan::{scan, ScanEvent, ScanOptions, ScanReport};
pub use stats::KeyStatistics;
pub use types::{KeyRecord, TrustLevel};

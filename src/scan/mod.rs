//! Directory scanning engine
//!
//! [`ScanSettings`] captures raw, user-facing options. [`ScanConfig`]
//! resolves them against the selected output preset into a validated plan,
//! and [`Scanner`] executes that plan over one or more scan roots.

mod config;
mod walker;

pub use config::{ScanConfig, ScanSettings};
pub use walker::Scanner;

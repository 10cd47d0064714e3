//! Harvest - Scan directory trees into ordered playlists and file lists

pub mod error;
pub mod extensions;
pub mod fileops;
pub mod observer;
pub mod paths;
pub mod presets;
pub mod scan;
pub mod sort;
pub mod template;
pub mod writer;

pub use error::{ConfigError, FileOpError, HookError, ScanError};
pub use extensions::ExtensionPolicy;
pub use fileops::{FileOps, Overwrite, RemoveOptions, TransferOptions};
pub use observer::{EntryOutcome, GlobFilter, Relocate, RelocateAction, ScanObserver};
pub use paths::PathStyle;
pub use presets::OutputType;
pub use scan::{ScanConfig, ScanSettings, Scanner};
pub use sort::{natural_cmp, natural_key};
pub use template::{LineTemplate, PathTemplate};
pub use writer::ListWriter;

//! Post-scan observers
//!
//! Observers are injected into the scanner at construction and see results
//! after each walk: a filter phase right after each root is scanned, and an
//! output phase over the combined results of all roots. The output phase
//! gets a [`FileOps`] handle so an observer can relocate the files it sees.

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::{ConfigError, HookError};
use crate::fileops::{FileOps, TransferOptions};
use crate::paths::PathStyle;

/// What an output-phase observer decided for one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryOutcome {
    /// Replacement entry text; `None` keeps the current text.
    pub output_entry: Option<String>,
    /// Drop the entry from the results.
    pub skip_entry: bool,
}

impl EntryOutcome {
    /// Keep the entry unchanged.
    pub fn keep() -> Self {
        Self::default()
    }

    /// Replace the entry text.
    pub fn replace(entry: impl Into<String>) -> Self {
        Self {
            output_entry: Some(entry.into()),
            skip_entry: false,
        }
    }

    /// Drop the entry.
    pub fn skip() -> Self {
        Self {
            output_entry: None,
            skip_entry: true,
        }
    }
}

/// Hook points around a scan. Both methods default to pass-through.
pub trait ScanObserver {
    /// Filter phase, applied per scan root right after its walk. Entries
    /// answered `false` are dropped.
    fn should_include(
        &mut self,
        _entry: &str,
        _scan_root: &Path,
        _ops: &FileOps,
    ) -> Result<bool, HookError> {
        Ok(true)
    }

    /// Output phase, applied once over the combined results of all roots.
    /// `cur_dir` is the process working directory the entries are taken to
    /// be relative to.
    fn transform_output(
        &mut self,
        _entry: &str,
        _cur_dir: &Path,
        _dry_run: bool,
        _ops: &FileOps,
    ) -> Result<EntryOutcome, HookError> {
        Ok(EntryOutcome::keep())
    }
}

/// Keeps entries matching any of the given glob patterns.
#[derive(Debug, Clone)]
pub struct GlobFilter {
    patterns: Vec<Pattern>,
}

impl GlobFilter {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            compiled.push(Pattern::new(pattern).map_err(|e| ConfigError::BadPattern {
                pattern: pattern.clone(),
                source: e,
            })?);
        }
        Ok(Self { patterns: compiled })
    }
}

impl ScanObserver for GlobFilter {
    fn should_include(
        &mut self,
        entry: &str,
        _scan_root: &Path,
        _ops: &FileOps,
    ) -> Result<bool, HookError> {
        Ok(self.patterns.iter().any(|p| p.matches(entry)))
    }
}

/// Whether a [`Relocate`] observer copies or moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocateAction {
    Copy,
    Move,
}

/// Copies or moves every listed file into a destination directory while the
/// entries themselves stay in the results.
#[derive(Debug, Clone)]
pub struct Relocate {
    action: RelocateAction,
    dest: PathBuf,
    style: PathStyle,
    flatten: bool,
}

impl Relocate {
    pub fn new(action: RelocateAction, dest: impl Into<PathBuf>, style: PathStyle) -> Self {
        Self {
            action,
            dest: dest.into(),
            style,
            flatten: false,
        }
    }

    /// Drop directory structure: everything lands directly in the
    /// destination.
    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }
}

impl ScanObserver for Relocate {
    fn transform_output(
        &mut self,
        entry: &str,
        cur_dir: &Path,
        _dry_run: bool,
        ops: &FileOps,
    ) -> Result<EntryOutcome, HookError> {
        let rel = self.style.to_path(entry);
        let src = if rel.is_absolute() {
            rel.clone()
        } else {
            cur_dir.join(&rel)
        };
        // Absolute entries cannot be re-rooted; fall back to the bare name.
        let dest = if self.flatten || rel.is_absolute() {
            match rel.file_name() {
                Some(name) => self.dest.join(name),
                None => return Ok(EntryOutcome::keep()),
            }
        } else {
            self.dest.join(&rel)
        };
        let options = TransferOptions::default();
        match self.action {
            RelocateAction::Copy => ops.copy_file(&src, &dest, &options)?,
            RelocateAction::Move => ops.move_file(&src, &dest, &options)?,
        }
        Ok(EntryOutcome::keep())
    }
}

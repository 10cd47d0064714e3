//! Dry-run-aware file operations for observers

use std::fs;
use std::path::Path;

use fs_extra::file::CopyOptions as FsCopyOptions;

use crate::error::FileOpError;

/// Overwrite policy when a destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overwrite {
    /// Replace the destination.
    #[default]
    Always,
    /// Keep the destination and skip the operation.
    Skip,
    /// Fail the operation.
    Fail,
}

/// Options for [`FileOps::copy_file`] and [`FileOps::move_file`].
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    pub overwrite: Overwrite,
    /// Report failures instead of returning them.
    pub skip_errors: bool,
    /// Treat a missing source as a no-op instead of an error.
    pub skip_missing: bool,
}

/// Options for [`FileOps::remove_file`].
#[derive(Debug, Clone)]
pub struct RemoveOptions {
    /// Report failures instead of returning them.
    pub skip_errors: bool,
    /// Also remove parent directories left empty, up to the first non-empty
    /// one.
    pub remove_empty_dirs: bool,
}

impl Default for RemoveOptions {
    fn default() -> Self {
        Self {
            skip_errors: false,
            remove_empty_dirs: true,
        }
    }
}

/// File operations honoring dry-run mode. In dry-run nothing is mutated;
/// the intended action is reported instead.
#[derive(Debug, Clone)]
pub struct FileOps {
    dry_run: bool,
}

impl FileOps {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Copy `src` to `dest`, creating parent directories as needed.
    pub fn copy_file(
        &self,
        src: &Path,
        dest: &Path,
        options: &TransferOptions,
    ) -> Result<(), FileOpError> {
        self.transfer(src, dest, options, false)
    }

    /// Move `src` to `dest`, creating parent directories as needed.
    pub fn move_file(
        &self,
        src: &Path,
        dest: &Path,
        options: &TransferOptions,
    ) -> Result<(), FileOpError> {
        self.transfer(src, dest, options, true)
    }

    /// Remove a file; optionally clean up parent directories left empty.
    pub fn remove_file(&self, path: &Path, options: &RemoveOptions) -> Result<(), FileOpError> {
        match self.try_remove(path, options) {
            Err(e) if options.skip_errors => {
                log::error!("Cannot remove \"{}\": {}", path.display(), e);
                Ok(())
            }
            other => other,
        }
    }

    fn transfer(
        &self,
        src: &Path,
        dest: &Path,
        options: &TransferOptions,
        moving: bool,
    ) -> Result<(), FileOpError> {
        match self.try_transfer(src, dest, options, moving) {
            Err(e) if options.skip_errors => {
                log::error!(
                    "Cannot {} \"{}\" to \"{}\": {}",
                    if moving { "move" } else { "copy" },
                    src.display(),
                    dest.display(),
                    e
                );
                Ok(())
            }
            other => other,
        }
    }

    fn try_transfer(
        &self,
        src: &Path,
        dest: &Path,
        options: &TransferOptions,
        moving: bool,
    ) -> Result<(), FileOpError> {
        if !src.exists() {
            if options.skip_missing {
                log::info!("\"{}\" does not exist, skipped.", src.display());
                return Ok(());
            }
            return Err(FileOpError::MissingSource(src.to_path_buf()));
        }
        if dest.exists() {
            match options.overwrite {
                Overwrite::Always => {}
                Overwrite::Skip => {
                    log::info!("\"{}\" already exists, skipped.", dest.display());
                    return Ok(());
                }
                Overwrite::Fail => {
                    return Err(FileOpError::DestinationExists(dest.to_path_buf()));
                }
            }
        }

        let verb = if moving { "Moving" } else { "Copying" };
        if self.dry_run {
            log::info!(
                "{} \"{}\" to \"{}\" skipped (dry run).",
                verb,
                src.display(),
                dest.display()
            );
            return Ok(());
        }
        log::info!("{} \"{}\" to \"{}\".", verb, src.display(), dest.display());

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| FileOpError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        let fs_options = FsCopyOptions {
            overwrite: matches!(options.overwrite, Overwrite::Always),
            skip_exist: matches!(options.overwrite, Overwrite::Skip),
            ..FsCopyOptions::new()
        };
        if moving {
            fs_extra::file::move_file(src, dest, &fs_options)?;
        } else {
            fs_extra::file::copy(src, dest, &fs_options)?;
        }
        Ok(())
    }

    fn try_remove(&self, path: &Path, options: &RemoveOptions) -> Result<(), FileOpError> {
        if self.dry_run {
            log::info!("Removing \"{}\" skipped (dry run).", path.display());
            return Ok(());
        }
        log::info!("Removing \"{}\".", path.display());
        fs::remove_file(path)?;
        if options.remove_empty_dirs {
            let mut dir = path.parent();
            while let Some(d) = dir {
                if d.as_os_str().is_empty() || !is_empty_dir(d) {
                    break;
                }
                log::info!("Removing empty directory \"{}\".", d.display());
                fs::remove_dir(d)?;
                dir = d.parent();
            }
        }
        Ok(())
    }
}

fn is_empty_dir(dir: &Path) -> bool {
    match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => false,
    }
}

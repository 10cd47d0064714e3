//! Recursive scan engine
//!
//! The scanner walks one root at a time, depth first, visiting entries in
//! natural order. Per directory it can materialize up to three artifacts:
//! a list of the directory's own files, a list of its whole subtree, and a
//! centralized copy of the subtree list inside the lists folder. Child
//! results bubble up re-based onto the child's directory name, so every
//! level sees its subtree as relative paths.
//!
//! The walk never changes the process working directory; relative artifact
//! paths resolve against the scan root it was called with.

use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::error::ScanError;
use crate::fileops::FileOps;
use crate::observer::ScanObserver;
use crate::paths::{absolutize, escape_list_name};
use crate::sort::natural_key;
use crate::template::{PathTemplate, PathVars};
use crate::writer::ListWriter;

use super::config::ScanConfig;

/// Recursive scanner materializing list artifacts.
pub struct Scanner<'a> {
    config: &'a ScanConfig,
    writer: ListWriter,
    observers: Vec<Box<dyn ScanObserver>>,
    ops: FileOps,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a ScanConfig) -> Self {
        let writer = ListWriter::new(config.encoding)
            .with_write_empty(config.write_empty_lists)
            .with_dry_run(config.dry_run)
            .with_entry_template(config.entry_template.clone())
            .with_content_template(config.content_template.clone());
        Self {
            config,
            writer,
            observers: Vec::new(),
            ops: FileOps::new(config.dry_run),
        }
    }

    /// Attach an observer. Observers run in attachment order.
    pub fn with_observer(mut self, observer: Box<dyn ScanObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Walk one scan root and return its entries, filtered by the
    /// observers' filter phase.
    pub fn scan_root(&mut self, root: &Path) -> Result<Vec<String>, ScanError> {
        let prefix = self.resolve_prefix(root);
        log::info!("Scanning directory tree \"{}\".", root.display());
        if let Some(p) = &prefix {
            log::debug!("Prefix for centralized lists: \"{}\"", p);
        }
        let entries = self.walk_dir(root, Path::new(""), prefix.as_deref(), 0)?;
        self.filter_entries(entries, root)
    }

    /// Apply the observers' output phase over combined results.
    pub fn transform_entries(&mut self, entries: Vec<String>) -> Result<Vec<String>, ScanError> {
        if self.observers.is_empty() {
            return Ok(entries);
        }
        let cur_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut current = entry;
            let mut skip = false;
            for observer in &mut self.observers {
                log::debug!("Applying output hook to \"{}\".", current);
                match observer.transform_output(
                    &current,
                    &cur_dir,
                    self.config.dry_run,
                    &self.ops,
                ) {
                    Ok(outcome) => {
                        if let Some(replacement) = outcome.output_entry {
                            current = replacement;
                        }
                        if outcome.skip_entry {
                            skip = true;
                            break;
                        }
                    }
                    Err(e) => {
                        if self.config.ignore_hook_errors {
                            log::error!(
                                "Output hook failed on \"{}\", entry kept: {}",
                                current,
                                e
                            );
                        } else {
                            return Err(ScanError::OutputHook {
                                entry: current,
                                source: e,
                            });
                        }
                    }
                }
            }
            if !skip {
                out.push(current);
            }
        }
        Ok(out)
    }

    /// The prefix put before entries in centralized lists. Defaults to the
    /// scan root relative to the lists folder, or the absolute root when no
    /// relative path exists between them.
    fn resolve_prefix(&self, root: &Path) -> Option<String> {
        match (&self.config.prefix, &self.config.lists_folder) {
            (Some(prefix), _) => Some(prefix.clone()),
            (None, Some(folder)) => {
                let abs_root = absolutize(root);
                let derived = pathdiff::diff_paths(&abs_root, folder).unwrap_or(abs_root);
                Some(derived.to_string_lossy().into_owned())
            }
            (None, None) => None,
        }
    }

    fn walk_dir(
        &self,
        root: &Path,
        rel_dir: &Path,
        prefix: Option<&str>,
        depth: usize,
    ) -> Result<Vec<String>, ScanError> {
        let raw_dir = rel_dir.to_string_lossy().into_owned();
        let dot_dir = if raw_dir.is_empty() {
            ".".to_string()
        } else {
            raw_dir.clone()
        };

        if self.is_excluded(rel_dir) {
            log::info!("Folder \"{}\" excluded from scanning.", dot_dir);
            return Ok(Vec::new());
        }
        log::info!("Scanning folder \"{}\".", dot_dir);

        let abs_dir = root.join(rel_dir);
        let mut subdirs = Vec::new();
        let mut files = Vec::new();
        for (name, is_dir) in self.list_dir(&abs_dir)? {
            if is_dir {
                subdirs.push(name);
            } else if self.config.policy.is_included(&name, &abs_dir) {
                files.push(name);
            }
        }
        let own_files = files.len();

        if let Some(template) = &self.config.per_folder_template {
            let path = self.folder_artifact_path(template, root, rel_dir, &raw_dir, &dot_dir, prefix);
            self.writer.write(&path, &files);
        }

        let mut children_with_content = 0;
        if self.config.recursive {
            for name in &subdirs {
                let child = self.walk_dir(root, &rel_dir.join(name), prefix, depth + 1)?;
                if !child.is_empty() {
                    children_with_content += 1;
                }
                files.extend(child);
            }
        }

        if let Some(template) = &self.config.per_subtree_template {
            let path = self.folder_artifact_path(template, root, rel_dir, &raw_dir, &dot_dir, prefix);
            self.writer.write(&path, &files);
        }

        if let (Some(folder), Some(template)) =
            (&self.config.lists_folder, &self.config.lists_template)
        {
            let default_path = folder
                .join(escape_list_name(&raw_dir))
                .to_string_lossy()
                .into_owned();
            let vars = PathVars {
                default_path: &default_path,
                raw_dir: &raw_dir,
                dot_dir: &dot_dir,
                extension: &self.config.list_extension,
                prefix: prefix.unwrap_or(""),
                lists_folder: &self.lists_folder_display(),
            };
            let path = self.resolve_artifact(root, &template.render(&vars));
            // A directory whose subtree is already covered by its parent's
            // list carries no information of its own. The top-level call is
            // never considered redundant.
            let redundant = self.config.suppress_redundant
                && depth > 0
                && children_with_content <= 1
                && own_files == 0;
            if redundant {
                log::info!("Writing redundant list \"{}\" skipped.", path.display());
            } else {
                // Without a prefix the entries stay relative to this very
                // directory; with one they are pushed out to full paths.
                let mut dir_prefix = String::new();
                if let Some(p) = prefix.filter(|p| !p.is_empty()) {
                    dir_prefix.push_str(p);
                    if !raw_dir.is_empty() {
                        dir_prefix.push(self.config.style.separator());
                        dir_prefix.push_str(&raw_dir);
                    }
                }
                let entries: Vec<String> = files
                    .iter()
                    .map(|f| self.config.style.join(&dir_prefix, f))
                    .collect();
                self.writer.write(&path, &entries);
            }
        }

        match rel_dir.file_name() {
            Some(base) => {
                let base = base.to_string_lossy();
                Ok(files
                    .iter()
                    .map(|f| self.config.style.join(&base, f))
                    .collect())
            }
            None => Ok(files),
        }
    }

    /// List `dir` as (name, is_dir) pairs in natural order. Symlinked
    /// directories are not followed, keeping cycles out of the walk.
    fn list_dir(&self, dir: &Path) -> Result<Vec<(String, bool)>, ScanError> {
        let read = match fs::read_dir(dir) {
            Ok(read) => read,
            Err(e) => {
                if self.config.ignore_scan_errors {
                    log::error!("Cannot scan directory \"{}\": {}. Ignored.", dir.display(), e);
                    return Ok(Vec::new());
                }
                return Err(ScanError::ReadDir {
                    path: dir.to_path_buf(),
                    source: e,
                });
            }
        };
        let mut items = Vec::new();
        for entry in read {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if self.config.ignore_scan_errors {
                        log::error!(
                            "Cannot read an entry of \"{}\": {}. Ignored.",
                            dir.display(),
                            e
                        );
                        continue;
                    }
                    return Err(ScanError::ReadDir {
                        path: dir.to_path_buf(),
                        source: e,
                    });
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    if self.config.ignore_scan_errors {
                        log::error!(
                            "Cannot inspect \"{}\": {}. Ignored.",
                            entry.path().display(),
                            e
                        );
                        continue;
                    }
                    return Err(ScanError::ReadDir {
                        path: dir.to_path_buf(),
                        source: e,
                    });
                }
            };
            if file_type.is_dir() {
                items.push((name, true));
            } else if file_type.is_symlink() && entry.path().is_dir() {
                log::debug!(
                    "Symlinked directory \"{}\" not followed.",
                    entry.path().display()
                );
            } else {
                items.push((name, false));
            }
        }
        items.sort_by_cached_key(|(name, _)| natural_key(name));
        Ok(items)
    }

    fn filter_entries(
        &mut self,
        entries: Vec<String>,
        root: &Path,
    ) -> Result<Vec<String>, ScanError> {
        if self.observers.is_empty() {
            return Ok(entries);
        }
        let mut kept = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut include = true;
            for observer in &mut self.observers {
                log::debug!("Checking include filter for \"{}\".", entry);
                match observer.should_include(&entry, root, &self.ops) {
                    Ok(true) => {}
                    Ok(false) => {
                        include = false;
                        break;
                    }
                    Err(e) => {
                        if self.config.ignore_hook_errors {
                            log::error!(
                                "Filter hook failed on \"{}\", entry dropped: {}",
                                entry,
                                e
                            );
                            include = false;
                            break;
                        }
                        return Err(ScanError::FilterHook { entry, source: e });
                    }
                }
            }
            if include {
                kept.push(entry);
            }
        }
        Ok(kept)
    }

    /// Artifact path for the per-folder and per-subtree levels. The default
    /// `{path}` points into the scanned directory, named after it.
    fn folder_artifact_path(
        &self,
        template: &PathTemplate,
        root: &Path,
        rel_dir: &Path,
        raw_dir: &str,
        dot_dir: &str,
        prefix: Option<&str>,
    ) -> PathBuf {
        let base = match rel_dir.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            // The top level is named after the root directory itself, even
            // when the root was given as "." or "..".
            None => absolutize(root)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        let default_path = format!("{}{}{}", dot_dir, MAIN_SEPARATOR, base);
        let vars = PathVars {
            default_path: &default_path,
            raw_dir,
            dot_dir,
            extension: &self.config.list_extension,
            prefix: prefix.unwrap_or(""),
            lists_folder: &self.lists_folder_display(),
        };
        self.resolve_artifact(root, &template.render(&vars))
    }

    /// Rendered artifact paths resolve against the scan root unless they
    /// are already absolute.
    fn resolve_artifact(&self, root: &Path, rendered: &str) -> PathBuf {
        let path = Path::new(rendered);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    fn is_excluded(&self, rel_dir: &Path) -> bool {
        let key = if rel_dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            rel_dir
        };
        self.config.excluded_dirs.iter().any(|x| x == key)
    }

    fn lists_folder_display(&self) -> String {
        self.config
            .lists_folder
            .as_deref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

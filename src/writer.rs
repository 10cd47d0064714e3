//! List artifact writing
//!
//! One [`ListWriter`] writes (or cleans up) a single artifact per call. A
//! failing artifact is reported and contained; it never aborts the
//! surrounding scan. Dry-run keeps the filesystem untouched while still
//! reporting what would happen.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use thiserror::Error;

use crate::template::LineTemplate;

#[derive(Debug, Error)]
enum WriteError {
    #[error("cannot create directory \"{}\": {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("content cannot be encoded as {0}")]
    Unencodable(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Writes list artifacts honoring encoding, templates, the write-empty
/// policy and dry-run mode.
#[derive(Debug, Clone)]
pub struct ListWriter {
    encoding: &'static Encoding,
    write_empty: bool,
    dry_run: bool,
    entry_template: Option<LineTemplate>,
    content_template: Option<LineTemplate>,
}

impl ListWriter {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            write_empty: false,
            dry_run: false,
            entry_template: None,
            content_template: None,
        }
    }

    /// Also write lists that would be empty.
    pub fn with_write_empty(mut self, write_empty: bool) -> Self {
        self.write_empty = write_empty;
        self
    }

    /// Report intended writes without touching the filesystem.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Template applied to each entry line.
    pub fn with_entry_template(mut self, template: Option<LineTemplate>) -> Self {
        self.entry_template = template;
        self
    }

    /// Template wrapped around the joined list body.
    pub fn with_content_template(mut self, template: Option<LineTemplate>) -> Self {
        self.content_template = template;
        self
    }

    /// Write (or clean up) the artifact at `path` from `lines`.
    ///
    /// A stale file at `path` is removed even when nothing new is due, so
    /// lists written by earlier runs do not outlive their content.
    pub fn write(&self, path: &Path, lines: &[String]) {
        if let Err(e) = self.write_inner(path, lines) {
            log::error!("Cannot write list \"{}\": {}", path.display(), e);
        }
    }

    fn write_inner(&self, path: &Path, lines: &[String]) -> Result<(), WriteError> {
        let due = !lines.is_empty() || self.write_empty;

        if due {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    log::info!("Creating new directory \"{}\".", parent.display());
                    if !self.dry_run {
                        fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                            path: parent.to_path_buf(),
                            source: e,
                        })?;
                    }
                }
            }
            log::info!(
                "Writing list \"{}\" ({} entries).",
                path.display(),
                lines.len()
            );
        }

        if path.exists() {
            log::debug!("Removing existing file \"{}\".", path.display());
            if !self.dry_run {
                if let Err(e) = fs::remove_file(path) {
                    log::error!(
                        "Cannot remove existing file \"{}\": {}. Ignored.",
                        path.display(),
                        e
                    );
                }
            }
        }

        if !due {
            log::debug!("Skipping empty list \"{}\".", path.display());
            return Ok(());
        }
        if self.dry_run {
            log::info!("Writing list \"{}\" skipped (dry run).", path.display());
            return Ok(());
        }

        let rendered = self.render(lines);
        log::debug!("List \"{}\" content:\n{}", path.display(), rendered);
        let (encoded, _, had_errors) = self.encoding.encode(&rendered);
        if !had_errors {
            fs::write(path, &encoded)?;
            return Ok(());
        }
        if self.content_template.is_some() {
            // A wrapped body cannot be salvaged line by line.
            return Err(WriteError::Unencodable(self.encoding.name()));
        }
        self.write_fallback(path, lines)
    }

    /// Salvage what encodes, one line at a time, and report the rest.
    fn write_fallback(&self, path: &Path, lines: &[String]) -> Result<(), WriteError> {
        let mut file = fs::File::create(path)?;
        for line in lines {
            let mut rendered = match &self.entry_template {
                Some(template) => template.render(line),
                None => line.clone(),
            };
            rendered.push('\n');
            let (encoded, _, had_errors) = self.encoding.encode(&rendered);
            if had_errors {
                log::error!(
                    "Entry \"{}\" cannot be encoded as {} and was left out of \"{}\".",
                    line,
                    self.encoding.name(),
                    path.display()
                );
            } else {
                file.write_all(&encoded)?;
            }
        }
        Ok(())
    }

    fn render(&self, lines: &[String]) -> String {
        let body = match &self.entry_template {
            Some(template) => lines
                .iter()
                .map(|line| template.render(line))
                .collect::<Vec<_>>()
                .join("\n"),
            None => lines.join("\n"),
        };
        match &self.content_template {
            Some(template) => template.render(&body),
            None => body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_8, WINDOWS_1252};
    use tempfile::TempDir;

    fn lines(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn writes_joined_lines_without_trailing_newline() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("list.m3u");
        ListWriter::new(UTF_8).write(&path, &lines(&["a.mp3", "b.mp3"]));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a.mp3\nb.mp3");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("deep/nested/list.m3u");
        ListWriter::new(UTF_8).write(&path, &lines(&["a.mp3"]));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a.mp3");
    }

    #[test]
    fn empty_list_is_not_written_but_stale_file_is_removed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("list.m3u");
        fs::write(&path, "stale").unwrap();
        ListWriter::new(UTF_8).write(&path, &[]);
        assert!(!path.exists());
    }

    #[test]
    fn write_empty_produces_an_empty_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("list.m3u");
        ListWriter::new(UTF_8)
            .with_write_empty(true)
            .write(&path, &[]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn dry_run_leaves_everything_alone() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("list.m3u");
        fs::write(&path, "stale").unwrap();
        ListWriter::new(UTF_8)
            .with_dry_run(true)
            .write(&path, &lines(&["a.mp3"]));
        assert_eq!(fs::read_to_string(&path).unwrap(), "stale");

        let fresh = tmp.path().join("fresh/list.m3u");
        ListWriter::new(UTF_8)
            .with_dry_run(true)
            .write(&fresh, &lines(&["a.mp3"]));
        assert!(!fresh.exists());
        assert!(!tmp.path().join("fresh").exists());
    }

    #[test]
    fn entry_and_content_templates_shape_the_output() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("list.m3u8");
        ListWriter::new(UTF_8)
            .with_entry_template(Some(LineTemplate::parse("# {}").unwrap()))
            .with_content_template(Some(LineTemplate::parse("#EXTM3U\n{}").unwrap()))
            .write(&path, &lines(&["a.mp3", "b.mp3"]));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "#EXTM3U\n# a.mp3\n# b.mp3"
        );
    }

    #[test]
    fn narrow_encoding_produces_narrow_bytes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("list.m3u");
        ListWriter::new(WINDOWS_1252).write(&path, &lines(&["café.mp3"]));
        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes, b"caf\xe9.mp3");
    }

    #[test]
    fn unencodable_entries_are_dropped_line_by_line() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("list.m3u");
        ListWriter::new(WINDOWS_1252).write(&path, &lines(&["plain.mp3", "snow☃.mp3"]));
        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes, b"plain.mp3\n");
    }

    #[test]
    fn unencodable_content_with_a_template_fails_the_artifact() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("list.m3u8");
        fs::write(&path, "stale").unwrap();
        ListWriter::new(WINDOWS_1252)
            .with_content_template(Some(LineTemplate::parse("#EXTM3U\n{}").unwrap()))
            .write(&path, &lines(&["snow☃.mp3"]));
        // The stale file is gone and nothing replaced it.
        assert!(!path.exists());
    }
}

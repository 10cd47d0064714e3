//! Path-style reformatting and small path helpers

use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

/// Platform path-list separator, as used in PATH-style variables.
#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: char = ';';
/// Platform path-list separator, as used in PATH-style variables.
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: char = ':';

/// Separator style applied to entry strings in written lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathStyle {
    /// Platform-native separators, entries left untouched.
    #[default]
    Native,
    /// Forward slashes.
    Unix,
    /// Backslashes.
    Windows,
}

impl PathStyle {
    /// The separator character this style joins with.
    pub fn separator(&self) -> char {
        match self {
            PathStyle::Native => MAIN_SEPARATOR,
            PathStyle::Unix => '/',
            PathStyle::Windows => '\\',
        }
    }

    /// Rewrite separators in `s` to this style. Idempotent; `Native` is the
    /// identity.
    pub fn apply(&self, s: &str) -> String {
        match self {
            PathStyle::Native => s.to_string(),
            PathStyle::Unix => s.replace('\\', "/"),
            PathStyle::Windows => s.replace('/', "\\"),
        }
    }

    /// Join `base` and `entry` with this style's separator and restyle the
    /// result. An empty base yields the restyled entry alone.
    pub fn join(&self, base: &str, entry: &str) -> String {
        if base.is_empty() {
            self.apply(entry)
        } else {
            self.apply(&format!("{}{}{}", base, self.separator(), entry))
        }
    }

    /// Interpret a styled entry string as a native path.
    pub fn to_path(&self, entry: &str) -> PathBuf {
        match self {
            PathStyle::Native => PathBuf::from(entry),
            _ => entry.split(self.separator()).collect(),
        }
    }
}

/// Encode a relative directory into a flat artifact file name: separators
/// and drive colons become underscores. The scan root itself maps to "".
pub fn escape_list_name(relative_dir: &str) -> String {
    relative_dir.replace(['\\', '/', ':'], "_")
}

/// Make `path` absolute against the current directory and resolve `.` and
/// `..` components textually, without touching the filesystem.
pub fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            _ => out.push(component.as_os_str()),
        }
    }
    out
}

//! Extension-based candidate filtering

use std::collections::HashSet;
use std::path::Path;

/// Include/ignore policy for candidate files.
///
/// Both sets hold lowercased entries that are either `.ext` suffixes or
/// whole file names (so `makefile` can be matched despite having no
/// extension). An absent include set means every file is a candidate; an
/// absent ignore set ignores nothing. The ignore set is only consulted when
/// all files are included; a concrete include set decides by membership
/// alone.
#[derive(Debug, Clone, Default)]
pub struct ExtensionPolicy {
    include: Option<HashSet<String>>,
    ignore: Option<HashSet<String>>,
}

/// How a candidate fared against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Allowed.
    Include,
    /// Not in the include set.
    Exclude,
    /// Matched the ignore set while all files were otherwise allowed; worth
    /// a warning because the file was only dropped by the ignore list.
    Ignored,
}

impl ExtensionPolicy {
    pub fn new(include: Option<HashSet<String>>, ignore: Option<HashSet<String>>) -> Self {
        Self { include, ignore }
    }

    /// A policy that lets everything through.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Classify a file name against the policy.
    pub fn check(&self, file_name: &str) -> Verdict {
        let name = file_name.to_lowercase();
        let ext = extension_of(&name);
        match &self.include {
            Some(include) => {
                if include.contains(&name) || include.contains(&ext) {
                    Verdict::Include
                } else {
                    Verdict::Exclude
                }
            }
            None => match &self.ignore {
                Some(ignore) if ignore.contains(&name) || ignore.contains(&ext) => {
                    Verdict::Ignored
                }
                _ => Verdict::Include,
            },
        }
    }

    /// True when the file passes. Ignore-set hits are reported.
    pub fn is_included(&self, file_name: &str, dir: &Path) -> bool {
        match self.check(file_name) {
            Verdict::Include => true,
            Verdict::Exclude => false,
            Verdict::Ignored => {
                log::warn!(
                    "File \"{}\" has an extension configured to be skipped. Ignored.",
                    dir.join(file_name).display()
                );
                false
            }
        }
    }

    /// Human-readable summary of the policy.
    pub fn describe(&self) -> String {
        match (&self.include, &self.ignore) {
            (None, None) => "all files".to_string(),
            (None, Some(ignore)) => format!("all files except {}", sorted_csv(ignore)),
            (Some(include), _) => sorted_csv(include),
        }
    }
}

fn sorted_csv(set: &HashSet<String>) -> String {
    let mut entries: Vec<&str> = set.iter().map(String::as_str).collect();
    entries.sort_unstable();
    entries.join(",")
}

/// Lowercased final `.ext` of a name; empty when there is none.
fn extension_of(lower_name: &str) -> String {
    match Path::new(lower_name).extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => String::new(),
    }
}

/// Parse a comma-separated extension spec into a policy set. Entries are
/// trimmed and lowercased; empty entries are kept, so a spec like `",.mp3"`
/// also matches names without any extension.
pub fn parse_extension_set(spec: &str) -> HashSet<String> {
    spec.split(',').map(|t| t.trim().to_lowercase()).collect()
}

//! Scanner configuration

use std::path::PathBuf;

use encoding_rs::Encoding;

use crate::error::ConfigError;
use crate::extensions::{ExtensionPolicy, parse_extension_set};
use crate::paths::{PathStyle, absolutize};
use crate::presets::{OutputType, resolve_extension_spec};
use crate::template::{LineTemplate, PathTemplate};

/// Raw scan settings, before preset resolution.
///
/// `None` means "use the preset default"; an explicit empty string disables
/// the corresponding behavior ("all files" for `extensions`, "ignore
/// nothing" for `ignore`, "artifact level off" for the path templates).
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub roots: Vec<PathBuf>,
    pub excluded_dirs: Vec<PathBuf>,
    pub output_type: Option<OutputType>,
    pub extensions: Option<String>,
    pub ignore: Option<String>,
    pub path_style: Option<PathStyle>,
    pub lists_folder: Option<PathBuf>,
    pub prefix: Option<String>,
    pub encoding: Option<String>,
    pub per_folder_template: Option<String>,
    pub per_subtree_template: Option<String>,
    pub lists_template: Option<String>,
    pub entry_template: Option<String>,
    pub content_template: Option<String>,
    pub recursive: bool,
    pub suppress_redundant: bool,
    pub write_empty_lists: bool,
    pub dry_run: bool,
    pub ignore_scan_errors: bool,
    pub ignore_hook_errors: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            excluded_dirs: Vec::new(),
            output_type: None,
            extensions: None,
            ignore: None,
            path_style: None,
            lists_folder: None,
            prefix: None,
            encoding: None,
            per_folder_template: None,
            per_subtree_template: None,
            lists_template: None,
            entry_template: None,
            content_template: None,
            recursive: true,
            suppress_redundant: true,
            write_empty_lists: false,
            dry_run: false,
            ignore_scan_errors: false,
            ignore_hook_errors: false,
        }
    }
}

/// Resolved configuration driving a scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub roots: Vec<PathBuf>,
    pub excluded_dirs: Vec<PathBuf>,
    pub policy: ExtensionPolicy,
    pub style: PathStyle,
    pub list_extension: String,
    pub per_folder_template: Option<PathTemplate>,
    pub per_subtree_template: Option<PathTemplate>,
    pub lists_template: Option<PathTemplate>,
    pub lists_folder: Option<PathBuf>,
    pub entry_template: Option<LineTemplate>,
    pub content_template: Option<LineTemplate>,
    pub encoding: &'static Encoding,
    pub prefix: Option<String>,
    pub recursive: bool,
    pub suppress_redundant: bool,
    pub write_empty_lists: bool,
    pub dry_run: bool,
    pub ignore_scan_errors: bool,
    pub ignore_hook_errors: bool,
}

impl ScanConfig {
    /// Resolve raw settings against the selected preset.
    pub fn resolve(settings: ScanSettings) -> Result<Self, ConfigError> {
        let preset = settings.output_type.map(|t| t.preset());

        // A user-supplied centralized template has nowhere to put its
        // artifacts without a folder; preset-supplied ones just stay off.
        if settings
            .lists_template
            .as_deref()
            .is_some_and(|t| !t.is_empty())
            && settings.lists_folder.is_none()
        {
            return Err(ConfigError::ListsTemplateWithoutFolder);
        }

        let list_extension = preset
            .as_ref()
            .map(|p| p.list_extension)
            .unwrap_or_default()
            .to_string();

        let include = match settings.extensions.as_deref() {
            Some("") => None,
            Some(spec) => Some(parse_extension_set(&resolve_extension_spec(
                spec,
                preset.as_ref(),
            ))),
            None => preset
                .as_ref()
                .and_then(|p| p.extensions.as_deref())
                .map(parse_extension_set),
        };
        let ignore = match settings.ignore.as_deref() {
            Some("") => None,
            Some(spec) => Some(parse_extension_set(spec)),
            None => preset.as_ref().and_then(|p| p.ignore).map(parse_extension_set),
        };
        let policy = ExtensionPolicy::new(include, ignore);

        let style = settings
            .path_style
            .or_else(|| preset.as_ref().and_then(|p| p.path_style))
            .unwrap_or_default();

        let label = settings
            .encoding
            .or_else(|| preset.as_ref().and_then(|p| p.encoding).map(str::to_string))
            .unwrap_or_else(|| "utf-8".to_string());
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or(ConfigError::UnknownEncoding(label))?;

        let per_folder_template =
            resolve_path_template(settings.per_folder_template.as_deref(), None)?;
        let per_subtree_template = resolve_path_template(
            settings.per_subtree_template.as_deref(),
            preset.as_ref().and_then(|p| p.per_subtree),
        )?;
        let lists_template = resolve_path_template(
            settings.lists_template.as_deref(),
            preset.as_ref().and_then(|p| p.lists),
        )?;
        let entry_template = resolve_line_template(settings.entry_template.as_deref(), None)?;
        let content_template = resolve_line_template(
            settings.content_template.as_deref(),
            preset.as_ref().and_then(|p| p.content),
        )?;

        Ok(ScanConfig {
            roots: settings.roots,
            excluded_dirs: settings.excluded_dirs,
            policy,
            style,
            list_extension,
            per_folder_template,
            per_subtree_template,
            lists_template,
            lists_folder: settings.lists_folder.map(|p| absolutize(&p)),
            entry_template,
            content_template,
            encoding,
            prefix: settings.prefix,
            recursive: settings.recursive,
            suppress_redundant: settings.suppress_redundant,
            write_empty_lists: settings.write_empty_lists,
            dry_run: settings.dry_run,
            ignore_scan_errors: settings.ignore_scan_errors,
            ignore_hook_errors: settings.ignore_hook_errors,
        })
    }

    /// Report the resolved configuration at debug level.
    pub fn log_summary(&self) {
        log::debug!("Directory trees: {:?}", self.roots);
        log::debug!("Excluded directories: {:?}", self.excluded_dirs);
        log::debug!("Included files: {}", self.policy.describe());
        log::debug!("List extension: {:?}", self.list_extension);
        log::debug!("Path style: {:?}", self.style);
        log::debug!("Encoding: {}", self.encoding.name());
        log::debug!(
            "Lists folder: {}",
            self.lists_folder
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        log::debug!(
            "Prefix: {}",
            self.prefix.as_deref().unwrap_or("derived from lists folder")
        );
        log::debug!(
            "Templates: folder={:?} subtree={:?} lists={:?} entry={:?} content={:?}",
            self.per_folder_template.as_ref().map(|t| t.as_str()),
            self.per_subtree_template.as_ref().map(|t| t.as_str()),
            self.lists_template.as_ref().map(|t| t.as_str()),
            self.entry_template.as_ref().map(|t| t.as_str()),
            self.content_template.as_ref().map(|t| t.as_str()),
        );
        log::debug!(
            "Flags: recursive={} suppress_redundant={} write_empty={} dry_run={}",
            self.recursive,
            self.suppress_redundant,
            self.write_empty_lists,
            self.dry_run,
        );
    }
}

fn resolve_path_template(
    user: Option<&str>,
    preset: Option<&str>,
) -> Result<Option<PathTemplate>, ConfigError> {
    let raw = match user {
        Some("") => None,
        Some(template) => Some(template),
        None => preset,
    };
    Ok(match raw {
        Some(template) => Some(PathTemplate::parse(template)?),
        None => None,
    })
}

fn resolve_line_template(
    user: Option<&str>,
    preset: Option<&str>,
) -> Result<Option<LineTemplate>, ConfigError> {
    let raw = match user {
        Some("") => None,
        Some(template) => Some(template),
        None => preset,
    };
    Ok(match raw {
        Some(template) => Some(LineTemplate::parse(template)?),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::Verdict;

    #[test]
    fn defaults_resolve_to_a_bare_config() {
        let config = ScanConfig::resolve(ScanSettings::default()).unwrap();
        assert_eq!(config.policy.check("anything.xyz"), Verdict::Include);
        assert_eq!(config.style, PathStyle::Native);
        assert_eq!(config.list_extension, "");
        assert!(config.per_subtree_template.is_none());
        assert!(config.lists_template.is_none());
        assert_eq!(config.encoding.name(), "UTF-8");
    }

    #[test]
    fn m3u_preset_fills_the_gaps() {
        let settings = ScanSettings {
            output_type: Some(OutputType::M3u),
            ..Default::default()
        };
        let config = ScanConfig::resolve(settings).unwrap();
        assert_eq!(config.style, PathStyle::Unix);
        assert_eq!(config.list_extension, ".m3u");
        assert_eq!(config.policy.check("song.mp3"), Verdict::Include);
        assert_eq!(config.policy.check("cover.jpg"), Verdict::Exclude);
        assert!(config.per_subtree_template.is_some());
        // No lists folder was configured, so the preset's centralized
        // template stays unused but present.
        assert!(config.lists_template.is_some());
        assert!(config.lists_folder.is_none());
    }

    #[test]
    fn explicit_empty_strings_disable_preset_defaults() {
        let settings = ScanSettings {
            output_type: Some(OutputType::M3u),
            extensions: Some(String::new()),
            ignore: Some(String::new()),
            per_subtree_template: Some(String::new()),
            ..Default::default()
        };
        let config = ScanConfig::resolve(settings).unwrap();
        assert_eq!(config.policy.check("cover.jpg"), Verdict::Include);
        assert!(config.per_subtree_template.is_none());
    }

    #[test]
    fn user_lists_template_requires_a_folder() {
        let settings = ScanSettings {
            lists_template: Some("{path}{ext}".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ScanConfig::resolve(settings),
            Err(ConfigError::ListsTemplateWithoutFolder)
        ));
    }

    #[test]
    fn preset_lists_template_alone_is_fine() {
        let settings = ScanSettings {
            output_type: Some(OutputType::FileList),
            ..Default::default()
        };
        assert!(ScanConfig::resolve(settings).is_ok());
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        let settings = ScanSettings {
            encoding: Some("utf-99".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ScanConfig::resolve(settings),
            Err(ConfigError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn bad_template_fields_are_rejected() {
        let settings = ScanSettings {
            per_subtree_template: Some("{bogus}".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ScanConfig::resolve(settings),
            Err(ConfigError::Template(_))
        ));
    }

    #[test]
    fn extension_placeholders_resolve_before_parsing() {
        let settings = ScanSettings {
            output_type: Some(OutputType::Music),
            extensions: Some("{default},.aac".to_string()),
            ..Default::default()
        };
        let config = ScanConfig::resolve(settings).unwrap();
        assert_eq!(config.policy.check("a.aac"), Verdict::Include);
        assert_eq!(config.policy.check("a.mp3"), Verdict::Include);
        assert_eq!(config.policy.check("a.txt"), Verdict::Exclude);
    }

    #[test]
    fn m3u_ext_pins_utf8() {
        let settings = ScanSettings {
            output_type: Some(OutputType::M3uExt),
            ..Default::default()
        };
        let config = ScanConfig::resolve(settings).unwrap();
        assert_eq!(config.encoding.name(), "UTF-8");
        assert!(config.content_template.is_some());
    }
}

//! Output-type presets
//!
//! An output type bundles the defaults for one kind of list (extension
//! filter, list extension, path style, templates, encoding). Every value a
//! preset contributes can still be overridden individually.

use crate::paths::PathStyle;

/// Picture file extensions matched by the `pictures` preset.
pub const PICTURE_EXTENSIONS: &str = ".jpg,.jpeg,.bmp,.gif,.png,.tif,.tiff,.dvi";

/// Movie file extensions matched by the `movies` preset.
pub const MOVIE_EXTENSIONS: &str = ".mov,.mp4,.avi,.mpg,.mpeg,.mkv,.wmv,.webm,.mts,.vob";

/// Music file extensions matched by the `music` and m3u presets.
pub const MUSIC_EXTENSIONS: &str = ".wma,.mpa,.wav,.mp3,.m4a,.ogg,.flac,.au";

/// Extensions the m3u presets drop from music trees, mostly artwork,
/// metadata and other playlists.
pub const MUSIC_IGNORE: &str = ".txt,.jpg,.bmp,.gif,.png,.tif,.tiff,.ini,.m3u,.lst,.cue,\
.nfo,.sfv,.pdf,.doc,.rtf,.xls,.xlsx,.html,.htm,.url,.pls,.ape,.apl";

/// Output type selected with `-t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    Pictures,
    Movies,
    Music,
    Media,
    FileList,
    M3u,
    M3uExt,
}

/// Defaults contributed by an output type.
#[derive(Debug, Clone)]
pub struct Preset {
    pub list_extension: &'static str,
    pub extensions: Option<String>,
    pub ignore: Option<&'static str>,
    pub path_style: Option<PathStyle>,
    pub per_subtree: Option<&'static str>,
    pub lists: Option<&'static str>,
    pub content: Option<&'static str>,
    pub encoding: Option<&'static str>,
}

impl Preset {
    fn plain(list_extension: &'static str, extensions: Option<String>) -> Self {
        Preset {
            list_extension,
            extensions,
            ignore: None,
            path_style: None,
            per_subtree: None,
            lists: None,
            content: None,
            encoding: None,
        }
    }

    fn m3u(list_extension: &'static str) -> Self {
        Preset {
            list_extension,
            extensions: Some(MUSIC_EXTENSIONS.to_string()),
            ignore: Some(MUSIC_IGNORE),
            path_style: Some(PathStyle::Unix),
            per_subtree: Some("{path}{ext}"),
            lists: Some("{path}{ext}"),
            content: None,
            encoding: None,
        }
    }
}

impl OutputType {
    /// The defaults this type contributes.
    pub fn preset(&self) -> Preset {
        match self {
            OutputType::Pictures => Preset::plain(".lst", Some(PICTURE_EXTENSIONS.to_string())),
            OutputType::Movies => Preset::plain(".lst", Some(MOVIE_EXTENSIONS.to_string())),
            OutputType::Music => Preset::plain(".lst", Some(MUSIC_EXTENSIONS.to_string())),
            OutputType::Media => Preset::plain(
                ".lst",
                Some(format!(
                    "{PICTURE_EXTENSIONS},{MOVIE_EXTENSIONS},{MUSIC_EXTENSIONS}"
                )),
            ),
            OutputType::FileList => {
                let mut preset = Preset::plain(".lst", None);
                preset.lists = Some("{path}{ext}");
                preset
            }
            OutputType::M3u => Preset::m3u(".m3u"),
            OutputType::M3uExt => {
                let mut preset = Preset::m3u(".m3u8");
                preset.content = Some("#EXTM3U\n{}");
                preset.encoding = Some("utf-8");
                preset
            }
        }
    }
}

/// Expand the named placeholders an extension spec may embed: `{default}`
/// (the preset's include set), `{list}` (the preset's list extension), and
/// the `{pictures}` / `{movies}` / `{music}` constants.
pub fn resolve_extension_spec(spec: &str, preset: Option<&Preset>) -> String {
    let default = preset.and_then(|p| p.extensions.as_deref()).unwrap_or("");
    let list_extension = preset.map(|p| p.list_extension).unwrap_or("");
    spec.replace("{default}", default)
        .replace("{list}", list_extension)
        .replace("{pictures}", PICTURE_EXTENSIONS)
        .replace("{movies}", MOVIE_EXTENSIONS)
        .replace("{music}", MUSIC_EXTENSIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn m3u_preset_targets_unix_playlists() {
        let preset = OutputType::M3u.preset();
        assert_eq!(preset.list_extension, ".m3u");
        assert_eq!(preset.path_style, Some(PathStyle::Unix));
        assert_eq!(preset.per_subtree, Some("{path}{ext}"));
        assert_eq!(preset.lists, Some("{path}{ext}"));
        assert!(preset.content.is_none());
    }

    #[test]
    fn m3u_ext_adds_header_and_encoding() {
        let preset = OutputType::M3uExt.preset();
        assert_eq!(preset.list_extension, ".m3u8");
        assert_eq!(preset.content, Some("#EXTM3U\n{}"));
        assert_eq!(preset.encoding, Some("utf-8"));
    }

    #[test]
    fn media_is_the_union_of_the_three_sets() {
        let preset = OutputType::Media.preset();
        let extensions = preset.extensions.unwrap();
        assert!(extensions.contains(".jpg"));
        assert!(extensions.contains(".avi"));
        assert!(extensions.contains(".flac"));
    }

    #[test]
    fn file_list_takes_all_files_into_centralized_lists() {
        let preset = OutputType::FileList.preset();
        assert!(preset.extensions.is_none());
        assert_eq!(preset.lists, Some("{path}{ext}"));
        assert!(preset.per_subtree.is_none());
    }

    #[test]
    fn placeholders_expand_against_the_preset() {
        let preset = OutputType::Music.preset();
        let spec = resolve_extension_spec("{default},.aac", Some(&preset));
        assert_eq!(spec, format!("{MUSIC_EXTENSIONS},.aac"));
        assert_eq!(
            resolve_extension_spec("{list}", Some(&preset)),
            ".lst"
        );
        assert_eq!(
            resolve_extension_spec("{pictures}", None),
            PICTURE_EXTENSIONS
        );
    }

    #[test]
    fn placeholders_without_a_preset_expand_empty() {
        assert_eq!(resolve_extension_spec("{default}", None), "");
    }
}

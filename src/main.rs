//! CLI entry point for harvest

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use encoding_rs::Encoding;
use harvest::paths::absolutize;
use harvest::{
    GlobFilter, OutputType, PathStyle, Relocate, RelocateAction, ScanConfig, ScanSettings, Scanner,
};

/// Output preset selecting extension, filter and template defaults
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TypeArg {
    /// Picture files into `.lst` lists
    Pictures,
    /// Movie files into `.lst` lists
    Movies,
    /// Music files into `.lst` lists
    Music,
    /// Pictures, movies and music combined
    Media,
    /// Every file into centralized `.lst` lists
    FileList,
    /// Music files into `.m3u` playlists with unix separators
    M3u,
    /// Extended `.m3u8` playlists with an #EXTM3U header, UTF-8 encoded
    M3uExt,
}

impl From<TypeArg> for OutputType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Pictures => OutputType::Pictures,
            TypeArg::Movies => OutputType::Movies,
            TypeArg::Music => OutputType::Music,
            TypeArg::Media => OutputType::Media,
            TypeArg::FileList => OutputType::FileList,
            TypeArg::M3u => OutputType::M3u,
            TypeArg::M3uExt => OutputType::M3uExt,
        }
    }
}

/// Path separator style for list entries
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Platform-native separators
    Native,
    /// Forward slashes
    Unix,
    /// Backslashes
    Windows,
}

impl From<ModeArg> for PathStyle {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Native => PathStyle::Native,
            ModeArg::Unix => PathStyle::Unix,
            ModeArg::Windows => PathStyle::Windows,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(about = "Scan directory trees into ordered playlists and file lists")]
#[command(version)]
struct Args {
    /// Directory tree to scan, or a file whose lines are appended to the
    /// results (can be used multiple times; scanned in order)
    #[arg(short = 'd', long = "directory", value_name = "DIR", default_value = ".")]
    directory: Vec<PathBuf>,

    /// Relative directory to exclude from scanning (can be used multiple times)
    #[arg(short = 'x', long = "exclude-dir", value_name = "DIR")]
    exclude_dir: Vec<PathBuf>,

    /// Comma-separated extensions or file names to include; placeholders
    /// {default}, {list}, {pictures}, {movies}, {music} expand against the
    /// preset. Empty string includes every file
    #[arg(short = 'e', long = "extensions", value_name = "EXTS")]
    extensions: Option<String>,

    /// Comma-separated extensions or file names to skip with a warning when
    /// every file is included. Empty string skips none
    #[arg(short = 'i', long = "ignore", value_name = "EXTS")]
    ignore: Option<String>,

    /// Do not descend into subdirectories
    #[arg(short = 'N', long = "no-subdirs")]
    no_subdirs: bool,

    /// Output preset: pictures, movies, music, media, file-list, m3u, m3u-ext
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    output_type: Option<TypeArg>,

    /// Path separator style for list entries: native, unix, windows
    #[arg(short = 'm', long = "mode", value_name = "MODE")]
    mode: Option<ModeArg>,

    /// Folder collecting one centralized list per scanned directory
    #[arg(short = 'l', long = "lists-folder", value_name = "DIR")]
    lists_folder: Option<PathBuf>,

    /// Prefix put before entries in centralized lists (default: the scan
    /// root relative to the lists folder)
    #[arg(short = 'p', long = "prefix", value_name = "PREFIX")]
    prefix: Option<String>,

    /// Text encoding for written lists (e.g. utf-8, windows-1252)
    #[arg(short = 'E', long = "encoding", value_name = "LABEL")]
    encoding: Option<String>,

    /// Text encoding for list files given as scan roots
    #[arg(long = "input-encoding", value_name = "LABEL")]
    input_encoding: Option<String>,

    /// Write lists even when they would be empty
    #[arg(short = 'W', long = "write-empty-lists")]
    write_empty_lists: bool,

    /// Write centralized lists even for directories whose subtree is fully
    /// covered by the parent's list
    #[arg(long = "write-redundant-lists")]
    write_redundant_lists: bool,

    /// Report intended actions without touching the filesystem
    #[arg(short = 'D', long = "dry-run")]
    dry_run: bool,

    /// Where the combined results go: "-" for stdout, a path to write them
    /// there, empty string to suppress them
    #[arg(short = 'o', long = "output", value_name = "TARGET")]
    output: Option<String>,

    /// Convert result entries to absolute paths
    #[arg(short = 'a', long = "abs-path")]
    abs_path: bool,

    /// Path template for the list of a directory's own files
    /// (fields: {path} {dir} {dotdir} {ext} {prefix} {sep} {pathsep} {lists})
    #[arg(long = "fmt-folder", value_name = "TEMPLATE")]
    fmt_folder: Option<String>,

    /// Path template for the list of a directory's whole subtree
    #[arg(long = "fmt-subtree", value_name = "TEMPLATE")]
    fmt_subtree: Option<String>,

    /// Path template for centralized lists inside the lists folder
    #[arg(long = "fmt-lists", value_name = "TEMPLATE")]
    fmt_lists: Option<String>,

    /// Template applied to each list entry; {} is the entry
    #[arg(long = "fmt-entry", value_name = "TEMPLATE")]
    fmt_entry: Option<String>,

    /// Template applied around the joined list body; {} is the body
    #[arg(long = "fmt", value_name = "TEMPLATE", conflicts_with = "fmt_template")]
    fmt: Option<String>,

    /// Read the body template from a file instead
    #[arg(long = "fmt-template", value_name = "FILE")]
    fmt_template: Option<PathBuf>,

    /// Keep only result entries matching this glob pattern
    /// (can be used multiple times; any match keeps the entry)
    #[arg(long = "filter-glob", value_name = "PATTERN")]
    filter_glob: Vec<String>,

    /// Copy each listed file into DIR
    #[arg(long = "copy-to", value_name = "DIR", conflicts_with = "move_to")]
    copy_to: Option<PathBuf>,

    /// Move each listed file into DIR
    #[arg(long = "move-to", value_name = "DIR")]
    move_to: Option<PathBuf>,

    /// Drop the directory structure when copying or moving
    #[arg(long = "flatten")]
    flatten: bool,

    /// Treat unreadable directories as empty instead of aborting
    #[arg(long = "ignore-scan-errors")]
    ignore_scan_errors: bool,

    /// Report observer failures instead of aborting
    #[arg(long = "ignore-hook-errors")]
    ignore_hook_errors: bool,

    /// Report scanning progress
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Report scanning detail, resolved settings and list contents
    #[arg(long = "vv")]
    very_verbose: bool,
}

/// Wire `-v` / `--vv` to the log level. `RUST_LOG` still overrides.
fn init_logger(args: &Args) {
    let level = if args.very_verbose {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logger(&args);

    let input_encoding = match &args.input_encoding {
        Some(label) => Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
            eprintln!("harvest: unknown --input-encoding \"{}\"", label);
            process::exit(1);
        }),
        None => encoding_rs::UTF_8,
    };

    let content_template = match (&args.fmt, &args.fmt_template) {
        (Some(fmt), _) => Some(fmt.clone()),
        (None, Some(path)) => match std::fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                eprintln!(
                    "harvest: cannot read --fmt-template \"{}\": {}",
                    path.display(),
                    e
                );
                process::exit(1);
            }
        },
        (None, None) => None,
    };

    // Without -o, combined results go to stdout only when no preset and no
    // path template already writes list files. The entry and body templates
    // shape those files, not the final output, so they keep stdout on.
    let explicit_format = args.output_type.is_some()
        || args.fmt_folder.is_some()
        || args.fmt_subtree.is_some()
        || args.fmt_lists.is_some();

    let settings = ScanSettings {
        roots: args
            .directory
            .iter()
            .map(|d| {
                if d.as_os_str().is_empty() {
                    PathBuf::from(".")
                } else {
                    d.clone()
                }
            })
            .collect(),
        excluded_dirs: args.exclude_dir.clone(),
        output_type: args.output_type.map(OutputType::from),
        extensions: args.extensions.clone(),
        ignore: args.ignore.clone(),
        path_style: args.mode.map(PathStyle::from),
        lists_folder: args.lists_folder.clone(),
        prefix: args.prefix.clone(),
        encoding: args.encoding.clone(),
        per_folder_template: args.fmt_folder.clone(),
        per_subtree_template: args.fmt_subtree.clone(),
        lists_template: args.fmt_lists.clone(),
        entry_template: args.fmt_entry.clone(),
        content_template,
        recursive: !args.no_subdirs,
        suppress_redundant: !args.write_redundant_lists,
        write_empty_lists: args.write_empty_lists,
        dry_run: args.dry_run,
        ignore_scan_errors: args.ignore_scan_errors,
        ignore_hook_errors: args.ignore_hook_errors,
    };

    let config = ScanConfig::resolve(settings).unwrap_or_else(|e| {
        eprintln!("harvest: invalid configuration: {}", e);
        process::exit(1);
    });
    config.log_summary();

    let mut scanner = Scanner::new(&config);
    if !args.filter_glob.is_empty() {
        let filter = GlobFilter::new(&args.filter_glob).unwrap_or_else(|e| {
            eprintln!("harvest: {}", e);
            process::exit(1);
        });
        scanner = scanner.with_observer(Box::new(filter));
    }
    let relocate = match (&args.copy_to, &args.move_to) {
        (Some(dest), _) => Some(Relocate::new(RelocateAction::Copy, dest, config.style)),
        (None, Some(dest)) => Some(Relocate::new(RelocateAction::Move, dest, config.style)),
        (None, None) => None,
    };
    if let Some(relocate) = relocate {
        scanner = scanner.with_observer(Box::new(relocate.with_flatten(args.flatten)));
    }

    let mut results: Vec<String> = Vec::new();
    for root in &config.roots {
        if root.is_file() {
            let lines = read_list_file(root, input_encoding).unwrap_or_else(|e| {
                eprintln!("harvest: cannot read list \"{}\": {}", root.display(), e);
                process::exit(1);
            });
            results.extend(lines);
            continue;
        }
        if !root.is_dir() {
            eprintln!(
                "harvest: scan root \"{}\" is neither a directory nor a file",
                root.display()
            );
            process::exit(1);
        }
        let entries = scanner.scan_root(root).unwrap_or_else(|e| {
            eprintln!("harvest: {}", e);
            process::exit(1);
        });
        if args.abs_path {
            results.extend(entries.iter().map(|entry| {
                absolutize(&root.join(config.style.to_path(entry)))
                    .to_string_lossy()
                    .into_owned()
            }));
        } else {
            results.extend(entries);
        }
    }

    let results = scanner.transform_entries(results).unwrap_or_else(|e| {
        eprintln!("harvest: {}", e);
        process::exit(1);
    });

    let target = match &args.output {
        Some(target) => target.clone(),
        None if explicit_format => String::new(),
        None => "-".to_string(),
    };
    if target == "-" {
        for entry in &results {
            println!("{}", entry);
        }
    } else if !target.is_empty() && !results.is_empty() {
        write_output(Path::new(&target), &results, &config).unwrap_or_else(|e| {
            eprintln!("harvest: cannot write output \"{}\": {}", target, e);
            process::exit(1);
        });
    }
}

/// Read an already-built list given as a scan root.
fn read_list_file(path: &Path, encoding: &'static Encoding) -> Result<Vec<String>, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        log::warn!(
            "List \"{}\" contains bytes invalid in {}; they were replaced.",
            path.display(),
            encoding.name()
        );
    }
    Ok(text.lines().map(str::to_string).collect())
}

/// Write the combined results to a file. Unlike per-artifact writes this is
/// fatal on failure; the aggregated output is the run's primary product.
fn write_output(path: &Path, entries: &[String], config: &ScanConfig) -> Result<(), String> {
    if config.dry_run {
        log::info!("Writing results to \"{}\" skipped (dry run).", path.display());
        return Ok(());
    }
    let body = entries.join("\n");
    let (encoded, _, had_errors) = config.encoding.encode(&body);
    if had_errors {
        return Err(format!(
            "results contain characters not representable in {}",
            config.encoding.name()
        ));
    }
    std::fs::write(path, &encoded).map_err(|e| e.to_string())
}

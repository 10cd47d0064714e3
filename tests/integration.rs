//! Integration tests for harvest


use harness::{TestTree, run_harvest};
use std::path::MAIN_SEPARATOR;

#[test]
fn test_stdout_listing_in_natural_order() {
    let tree = TestTree::new();
    tree.add_file("song1.mp3", "");
    tree.add_file("song10.mp3", "");
    tree.add_file("song2.mp3", "");
    tree.add_file("Albums/track1.mp3", "");

    let (stdout, stderr, success) = run_harvest(tree.path(), &[]);
    assert!(success, "harvest should succeed: {}", stderr);
    let expected = format!(
        "song1.mp3\nsong2.mp3\nsong10.mp3\nAlbums{}track1.mp3\n",
        MAIN_SEPARATOR
    );
    assert_eq!(stdout, expected, "entries should come out in natural order");
}

#[test]
fn test_m3u_end_to_end() {
    let tree = TestTree::new();
    tree.add_file("music/song1.mp3", "");
    tree.add_file("music/song10.mp3", "");
    tree.add_file("music/cover.jpg", "");
    tree.add_file("music/Live/song2.mp3", "");

    let (stdout, stderr, success) =
        run_harvest(tree.path(), &["-t", "m3u", "-d", "music", "-l", "lists"]);
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(stdout, "", "preset runs should not print results");

    // Per-subtree playlists next to the scanned directories.
    assert_eq!(
        tree.read("music/music.m3u"),
        "song1.mp3\nsong10.mp3\nLive/song2.mp3",
        "subtree playlist should combine own files and descendants"
    );
    assert_eq!(tree.read("music/Live/Live.m3u"), "song2.mp3");

    // Centralized playlists prefixed with the root relative to the lists
    // folder.
    assert_eq!(
        tree.read("lists/.m3u"),
        "../music/song1.mp3\n../music/song10.mp3\n../music/Live/song2.mp3"
    );
    assert_eq!(tree.read("lists/Live.m3u"), "../music/Live/song2.mp3");
}

#[test]
fn test_file_list_preset_writes_centralized_lists_only() {
    let tree = TestTree::new();
    tree.add_file("docs/guide.pdf", "");
    tree.add_file("docs/readme.txt", "");

    let (stdout, stderr, success) =
        run_harvest(tree.path(), &["-t", "file-list", "-d", "docs", "-l", "lists"]);
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(stdout, "");
    assert_eq!(
        tree.read("lists/.lst"),
        "../docs/guide.pdf\n../docs/readme.txt"
    );
    assert!(
        !tree.exists("docs/docs.lst"),
        "file-list should not write per-subtree lists"
    );
}

#[test]
fn test_redundant_centralized_lists_are_suppressed() {
    let tree = TestTree::new();
    tree.add_file("music/chain/deep/a.mp3", "");

    let (_stdout, stderr, success) =
        run_harvest(tree.path(), &["-t", "m3u", "-d", "music", "-l", "lists"]);
    assert!(success, "harvest should succeed: {}", stderr);
    assert!(
        tree.exists("lists/.m3u"),
        "the scan root always gets a centralized list"
    );
    assert!(
        !tree.exists("lists/chain.m3u"),
        "a chain directory's list repeats its parent's and is skipped"
    );
    assert!(tree.exists("lists/chain_deep.m3u"));

    // The flag turns suppression off.
    let (_stdout, stderr, success) = run_harvest(
        tree.path(),
        &["-t", "m3u", "-d", "music", "-l", "lists", "--write-redundant-lists"],
    );
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(tree.read("lists/chain.m3u"), "../music/chain/deep/a.mp3");
}

#[test]
fn test_multiple_roots_concatenate_in_order() {
    let tree = TestTree::new();
    tree.add_file("a/x.txt", "");
    tree.add_file("b/y.txt", "");

    let (stdout, stderr, success) = run_harvest(tree.path(), &["-d", "a", "-d", "b"]);
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(stdout, "x.txt\ny.txt\n");
}

#[test]
fn test_file_roots_are_appended_as_lists() {
    let tree = TestTree::new();
    tree.add_file("a/x.txt", "");
    tree.add_file("pre.lst", "one\ntwo\n");

    let (stdout, stderr, success) = run_harvest(tree.path(), &["-d", "a", "-d", "pre.lst"]);
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(stdout, "x.txt\none\ntwo\n");
}

#[test]
fn test_output_to_file() {
    let tree = TestTree::new();
    tree.add_file("a.txt", "");

    let (stdout, stderr, success) = run_harvest(tree.path(), &["-o", "out.txt"]);
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(stdout, "", "-o with a path should not print to stdout");
    assert_eq!(tree.read("out.txt"), "a.txt");
}

#[test]
fn test_output_suppressed_with_empty_target() {
    let tree = TestTree::new();
    tree.add_file("a.txt", "");

    let (stdout, _stderr, success) = run_harvest(tree.path(), &["-o", ""]);
    assert!(success);
    assert_eq!(stdout, "");
}

#[test]
fn test_no_output_file_for_empty_results() {
    let tree = TestTree::new();
    tree.add_dir("empty");

    let (stdout, stderr, success) = run_harvest(tree.path(), &["-d", "empty", "-o", "out.txt"]);
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(stdout, "");
    assert!(!tree.exists("out.txt"), "nothing to write, no file");
}

#[test]
fn test_include_set_filters_without_warnings() {
    let tree = TestTree::new();
    tree.add_file("a.txt", "");
    tree.add_file("b.md", "");

    let (stdout, stderr, success) = run_harvest(tree.path(), &["-e", ".txt"]);
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(stdout, "a.txt\n");
    assert!(
        !stderr.contains("configured to be skipped"),
        "a concrete include set should not warn: {}",
        stderr
    );
}

#[test]
fn test_ignore_set_warns_per_skipped_file() {
    let tree = TestTree::new();
    tree.add_file("a.txt", "");
    tree.add_file("b.log", "");

    let (stdout, stderr, success) = run_harvest(tree.path(), &["-i", ".log"]);
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(stdout, "a.txt\n");
    assert!(
        stderr.contains("configured to be skipped") && stderr.contains("b.log"),
        "skipping via the ignore set should warn: {}",
        stderr
    );
}

#[test]
fn test_filter_glob_keeps_matching_entries() {
    let tree = TestTree::new();
    tree.add_file("a.mp3", "");
    tree.add_file("b.ogg", "");

    let (stdout, stderr, success) = run_harvest(tree.path(), &["--filter-glob", "*.mp3"]);
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(stdout, "a.mp3\n");
}

#[test]
fn test_copy_to_collects_listed_files() {
    let tree = TestTree::new();
    tree.add_file("music/a.mp3", "payload");

    let (stdout, stderr, success) = run_harvest(
        &tree.path().join("music"),
        &["-d", ".", "--copy-to", "../backup"],
    );
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(stdout, "a.mp3\n", "copied entries stay in the results");
    assert!(tree.exists("music/a.mp3"), "copy should keep the source");
    assert_eq!(tree.read("backup/a.mp3"), "payload");
}

#[test]
fn test_move_to_flatten_drops_directories() {
    let tree = TestTree::new();
    tree.add_file("music/Live/b.mp3", "payload");

    let (stdout, stderr, success) = run_harvest(
        &tree.path().join("music"),
        &["-d", ".", "--move-to", "../flat", "--flatten"],
    );
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(stdout, format!("Live{}b.mp3\n", MAIN_SEPARATOR));
    assert!(!tree.exists("music/Live/b.mp3"), "move should take the source");
    assert_eq!(tree.read("flat/b.mp3"), "payload");
}

#[test]
fn test_unchanged_tree_gives_identical_artifacts() {
    let tree = TestTree::new();
    tree.add_file("music/song2.mp3", "");
    tree.add_file("music/song10.mp3", "");
    tree.add_file("music/Live/take1.mp3", "");

    let args = ["-t", "m3u", "-d", "music", "-l", "lists"];
    let (stdout_a, _stderr, success) = run_harvest(tree.path(), &args);
    assert!(success);
    let subtree_a = tree.read_bytes("music/music.m3u");
    let central_a = tree.read_bytes("lists/.m3u");

    let (stdout_b, _stderr, success) = run_harvest(tree.path(), &args);
    assert!(success);
    assert_eq!(stdout_a, stdout_b);
    assert_eq!(subtree_a, tree.read_bytes("music/music.m3u"));
    assert_eq!(central_a, tree.read_bytes("lists/.m3u"));
}

#[test]
fn test_m3u_ext_adds_header_without_lists_folder() {
    let tree = TestTree::new();
    tree.add_file("music/a.mp3", "");

    let (_stdout, stderr, success) = run_harvest(tree.path(), &["-t", "m3u-ext", "-d", "music"]);
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(tree.read("music/music.m3u8"), "#EXTM3U\na.mp3");
}

#[test]
fn test_entry_and_body_templates() {
    let tree = TestTree::new();
    tree.add_file("music/a.mp3", "");

    let (stdout, stderr, success) = run_harvest(
        tree.path(),
        &[
            "-d",
            "music",
            "--fmt-subtree",
            "{dotdir}/list.txt",
            "--fmt-entry",
            "FILE: {}",
            "--fmt",
            "# HEAD\n{}",
        ],
    );
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(stdout, "", "format options direct output to files");
    assert_eq!(tree.read("music/list.txt"), "# HEAD\nFILE: a.mp3");
}

#[test]
fn test_entry_template_alone_keeps_stdout_raw() {
    let tree = TestTree::new();
    tree.add_file("a.txt", "");

    let (stdout, stderr, success) = run_harvest(tree.path(), &["--fmt-entry", "FILE: {}"]);
    assert!(success, "harvest should succeed: {}", stderr);
    // The templates shape written list files, never the final results.
    assert_eq!(stdout, "a.txt\n");
}

#[test]
fn test_body_template_from_file() {
    let tree = TestTree::new();
    tree.add_file("tpl.txt", "HEAD\n{}");
    tree.add_file("music/a.mp3", "");

    let (_stdout, stderr, success) = run_harvest(
        tree.path(),
        &[
            "-d",
            "music",
            "--fmt-subtree",
            "{path}.lst",
            "--fmt-template",
            "tpl.txt",
        ],
    );
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(tree.read("music/music.lst"), "HEAD\na.mp3");
}

#[test]
fn test_prefix_override() {
    let tree = TestTree::new();
    tree.add_file("music/a.mp3", "");

    let (_stdout, stderr, success) = run_harvest(
        tree.path(),
        &["-t", "m3u", "-d", "music", "-l", "lists", "-p", "X:"],
    );
    assert!(success, "harvest should succeed: {}", stderr);
    assert_eq!(tree.read("lists/.m3u"), "X:/a.mp3");
}

#[test]
fn test_verbose_reports_progress() {
    let tree = TestTree::new();
    tree.add_file("a.txt", "");

    let (_stdout, stderr, success) = run_harvest(tree.path(), &[]);
    assert!(success);
    assert!(
        !stderr.contains("Scanning folder"),
        "progress is quiet by default: {}",
        stderr
    );

    let (_stdout, stderr, success) = run_harvest(tree.path(), &["-v"]);
    assert!(success);
    assert!(stderr.contains("Scanning directory tree"), "{}", stderr);
    assert!(stderr.contains("Scanning folder"), "{}", stderr);
}

#[test]
fn test_very_verbose_dumps_settings() {
    let tree = TestTree::new();

    let (_stdout, stderr, success) = run_harvest(tree.path(), &["--vv"]);
    assert!(success);
    assert!(
        stderr.contains("Encoding: UTF-8"),
        "resolved settings should be reported: {}",
        stderr
    );
}

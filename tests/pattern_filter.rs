// tests/pattern_filter.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use proptest::prelude::*;
use tokio::sync::mpsc;
use tracing::Span;

use rewatch::errors::RewatchError;
use rewatch::fs::FileSystem;
use rewatch::fs::mock::MockFileSystem;
use rewatch::watch::{PatternSet, accepts, spawn_filter};

type TestResult = Result<(), Box<dyn Error>>;

fn fs_with_files(files: &[&str]) -> MockFileSystem {
    let fs = MockFileSystem::new();
    for f in files {
        fs.add_file(f, "x");
    }
    fs
}

#[test]
fn patterns_match_base_name_not_path() -> TestResult {
    init_tracing();
    let set = PatternSet::new(["*.go"])?;

    assert!(set.matches_file_name(&PathBuf::from("/src/pkg/main.go")));
    assert!(!set.matches_file_name(&PathBuf::from("/src/main.go/readme.md")));
    // '*' never crosses a separator, and only the base name is tested anyway.
    assert!(!PatternSet::new(["src/*.go"])?.matches_file_name(&PathBuf::from("/src/main.go")));
    Ok(())
}

#[test]
fn glob_syntax_covers_wildcards_and_classes() -> TestResult {
    let set = PatternSet::new(["?.rs", "[ab]*.txt", "[!x]y.md"])?;

    assert!(set.matches_name("a.rs"));
    assert!(!set.matches_name("ab.rs"));
    assert!(set.matches_name("alpha.txt"));
    assert!(set.matches_name("beta.txt"));
    assert!(!set.matches_name("gamma.txt"));
    assert!(set.matches_name("zy.md"));
    assert!(!set.matches_name("xy.md"));
    Ok(())
}

#[test]
fn matching_is_case_sensitive() -> TestResult {
    let set = PatternSet::new(["*.txt"])?;
    assert!(set.matches_name("notes.txt"));
    assert!(!set.matches_name("NOTES.TXT"));
    Ok(())
}

#[test]
fn empty_pattern_set_matches_nothing() -> TestResult {
    let set = PatternSet::new(Vec::<String>::new())?;
    assert!(set.is_empty());
    assert!(!set.matches_name("anything"));
    Ok(())
}

#[test]
fn invalid_glob_is_rejected() {
    match PatternSet::new(["*.rs", "[unclosed"]) {
        Err(RewatchError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "[unclosed"),
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
}

#[test]
fn filter_drops_directories_and_vanished_paths() -> TestResult {
    init_tracing();
    let fs = fs_with_files(&["/p/a.txt", "/p/gone.txt"]);
    fs.add_dir("/p/dir.txt");
    fs.remove("/p/gone.txt");
    let set = PatternSet::new(["*.txt"])?;

    assert!(accepts(&fs, &set, &PathBuf::from("/p/a.txt")));
    assert!(!accepts(&fs, &set, &PathBuf::from("/p/dir.txt")));
    assert!(!accepts(&fs, &set, &PathBuf::from("/p/gone.txt")));
    assert!(!accepts(&fs, &set, &PathBuf::from("/p/never-existed.txt")));
    Ok(())
}

#[test]
fn symlink_to_file_counts_as_file() -> TestResult {
    let fs = fs_with_files(&["/p/real.txt"]);
    fs.add_symlink("/p/link.txt", "/p/real.txt");
    fs.add_symlink("/p/dangling.txt", "/p/nowhere.txt");
    let set = PatternSet::new(["*.txt"])?;

    assert!(fs.is_symlink(&PathBuf::from("/p/link.txt")));
    assert!(accepts(&fs, &set, &PathBuf::from("/p/link.txt")));
    assert!(!accepts(&fs, &set, &PathBuf::from("/p/dangling.txt")));
    Ok(())
}

#[tokio::test]
async fn filter_stage_forwards_each_match_once_in_order() -> TestResult {
    init_tracing();
    let fs = fs_with_files(&["/p/b.txt", "/p/a.txt", "/p/c.md"]);
    // Both patterns match a.txt; it must still come through once.
    let set = Arc::new(PatternSet::new(["*.txt", "a.*"])?);

    let (tx, rx) = mpsc::channel(8);
    let mut out = spawn_filter(rx, set, Arc::new(fs), Span::none());

    for p in ["/p/b.txt", "/p/c.md", "/p/a.txt"] {
        tx.send(PathBuf::from(p)).await?;
    }
    drop(tx);

    let mut seen = Vec::new();
    while let Some(p) = out.recv().await {
        seen.push(p);
    }
    assert_eq!(seen, vec![PathBuf::from("/p/b.txt"), PathBuf::from("/p/a.txt")]);
    Ok(())
}

proptest! {
    #[test]
    fn star_extension_matches_iff_name_has_that_extension(
        stem in "[a-z]{1,8}",
        ext in "(txt|rs|md|go)",
        wanted in "(txt|rs|md|go)",
    ) {
        let name = format!("{stem}.{ext}");
        let path = PathBuf::from(format!("/p/{name}"));
        let fs = fs_with_files(&[path.to_str().unwrap()]);
        let set = PatternSet::new([format!("*.{wanted}")]).unwrap();

        prop_assert_eq!(accepts(&fs, &set, &path), ext == wanted);
    }

    #[test]
    fn literal_name_always_matches_itself(name in "[a-zA-Z0-9_.-]{1,16}") {
        prop_assume!(name != "." && name != "..");
        let set = PatternSet::new([name.clone()]).unwrap();
        prop_assert!(set.matches_name(&name));
    }

    #[test]
    fn question_marks_match_exact_length(name in "[a-z]{1,10}", len in 1usize..10) {
        let set = PatternSet::new(["?".repeat(len)]).unwrap();
        prop_assert_eq!(set.matches_name(&name), name.len() == len);
    }

    #[test]
    fn any_of_several_patterns_is_enough(
        stem in "[a-z]{1,6}",
        exts in proptest::collection::vec("(txt|rs|md|go|toml)", 1..4),
        ext in "(txt|rs|md|go|toml)",
    ) {
        let patterns: Vec<String> = exts.iter().map(|e| format!("*.{e}")).collect();
        let set = PatternSet::new(patterns).unwrap();
        prop_assert_eq!(set.matches_name(format!("{stem}.{ext}")), exts.contains(&ext));
    }
}

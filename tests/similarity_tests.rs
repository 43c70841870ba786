use dupescan::config::ScanConfig;
use dupescan::run_scan;
use dupescan::similarity::similarity_ratio;
use proptest::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write_file(dir: &Path, name: &str, content: &[u8]) {
    File::create(dir.join(name))
        .unwrap()
        .write_all(content)
        .unwrap();
}

#[test]
fn test_trailing_period_pair_reported() {
    // "The quick brown fox" vs "The quick brown fox." at threshold 0.85.
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"The quick brown fox");
    write_file(dir.path(), "b.txt", b"The quick brown fox.");

    let config = ScanConfig::new(dir.path().to_path_buf()).with_near_text(0.85);
    let report = run_scan(&config).unwrap();

    assert_eq!(report.pairs.len(), 1);
    assert!(report.pairs[0].ratio >= 0.85);
    assert!(report.pairs[0].file_a < report.pairs[0].file_b);
}

#[test]
fn test_near_text_disabled_by_default() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"The quick brown fox");
    write_file(dir.path(), "b.txt", b"The quick brown fox.");

    let report = run_scan(&ScanConfig::new(dir.path().to_path_buf())).unwrap();

    assert!(report.pairs.is_empty());
}

#[test]
fn test_no_pair_below_threshold() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"entirely unrelated words");
    write_file(dir.path(), "b.txt", b"zzz qqq xxx vvv kkk jjjj");

    let config = ScanConfig::new(dir.path().to_path_buf()).with_near_text(0.9);
    let report = run_scan(&config).unwrap();

    assert!(report.pairs.is_empty());
}

#[test]
fn test_extension_allow_list_respected() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.log", b"identical log line here");
    write_file(dir.path(), "b.log", b"identical log line here");

    // .log is not in the custom allow-list.
    let config = ScanConfig::new(dir.path().to_path_buf())
        .with_near_text(0.5)
        .with_near_text_extensions([".txt"]);
    let report = run_scan(&config).unwrap();

    assert!(report.pairs.is_empty());
}

#[test]
fn test_custom_extensions_accept_bare_names() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.rs", b"fn main() { println!(\"hi\"); }");
    write_file(dir.path(), "b.rs", b"fn main() { println!(\"ho\"); }");

    // "rs" without the leading dot must normalize to ".rs".
    let config = ScanConfig::new(dir.path().to_path_buf())
        .with_near_text(0.8)
        .with_near_text_extensions(["rs"]);
    let report = run_scan(&config).unwrap();

    assert_eq!(report.pairs.len(), 1);
}

#[test]
fn test_binary_content_skipped_not_fatal() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "good1.txt", b"some ordinary text");
    write_file(dir.path(), "good2.txt", b"some ordinary text!");
    write_file(dir.path(), "bad.txt", &[0xFF, 0xFE, 0x80, 0x00, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14]);

    let config = ScanConfig::new(dir.path().to_path_buf()).with_near_text(0.8);
    let report = run_scan(&config).unwrap();

    // The readable pair is still reported; the binary file shows up in the
    // skipped accounting.
    assert_eq!(report.pairs.len(), 1);
    assert!(report
        .skipped
        .iter()
        .any(|s| s.path.file_name().unwrap() == "bad.txt"));
}

#[test]
fn test_exact_and_near_pipelines_are_independent() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "dup1.txt", b"exactly the same bytes");
    write_file(dir.path(), "dup2.txt", b"exactly the same bytes");

    let config = ScanConfig::new(dir.path().to_path_buf()).with_near_text(0.9);
    let report = run_scan(&config).unwrap();

    // Identical files appear in both reports: one exact group and one
    // similarity pair with ratio exactly 1.0.
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.pairs.len(), 1);
    assert_eq!(report.pairs[0].ratio, 1.0);
}

proptest! {
    #[test]
    fn prop_ratio_identical_is_one(s in ".{0,200}") {
        prop_assert_eq!(similarity_ratio(&s, &s), 1.0);
    }

    #[test]
    fn prop_ratio_in_unit_interval(a in ".{0,120}", b in ".{0,120}") {
        let ratio = similarity_ratio(&a, &b);
        prop_assert!((0.0..=1.0).contains(&ratio));
    }

    #[test]
    fn prop_disjoint_alphabets_score_zero(a in "[a-m]{1,80}", b in "[n-z]{1,80}") {
        prop_assert_eq!(similarity_ratio(&a, &b), 0.0);
    }
}

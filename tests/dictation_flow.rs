use std::fs;

use dictr::dataset::{Dataset, DatasetError};
use dictr::engine::policy::RevealToggles;
use dictr::session::{DictationSession, LoadOutcome};

const WEEK1: &str = "\
id,english,korean
1,Good morning everybody.,모두 좋은 아침입니다.
2,It costs 25 dollars.,25달러입니다.
3,  ,빈 줄
4,Don't worry about it.,걱정하지 마세요.
";

fn load(dir: &tempfile::TempDir, name: &str, body: &str) -> Dataset {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    Dataset::load(&path).unwrap()
}

#[test]
fn full_dictation_pass() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load(&dir, "week1.csv", WEEK1);
    // blank english row is skipped
    assert_eq!(dataset.len(), 3);

    let mut session = DictationSession::new(dataset, RevealToggles::default());
    let view = session.view().unwrap();
    assert_eq!(view.masked, "____ _______ _________.");
    assert_eq!(view.entry.korean, "모두 좋은 아침입니다.");

    assert!(session.request_hint());
    assert_eq!(session.view().unwrap().masked, "G___ m______ e________.");

    assert!(session.submit("GOOD everybody"));
    assert_eq!(session.view().unwrap().masked, "Good m______ everybody.");
    assert!(!session.submit("   "));
    assert!(session.submit("morning"));
    assert!(session.view().unwrap().solved);

    assert!(session.next());
    assert_eq!(session.view().unwrap().masked, "__ _____ 25 _______.");

    assert!(session.last());
    assert!(!session.next());
    assert_eq!(session.view().unwrap().masked, "___'_ _____ _____ __.");
    assert!(session.submit("dont worry about it"));
    assert_eq!(session.solved_count(), 2);

    assert!(session.first());
    assert!(session.view().unwrap().solved);
}

#[test]
fn reopening_keeps_and_new_file_resets() {
    let dir = tempfile::tempdir().unwrap();
    let first = load(&dir, "week1.csv", WEEK1);
    let mut session = DictationSession::new(first, RevealToggles::default());
    session.submit("good morning everybody");
    session.next();

    let again = Dataset::load(&dir.path().join("week1.csv")).unwrap();
    assert_eq!(session.load(again), LoadOutcome::Kept);
    assert_eq!(session.current_index(), 1);
    assert_eq!(session.solved_count(), 1);

    let other = load(&dir, "week2.tsv", "id\tenglish\tkorean\n1\tSee you.\t또 봐요.\n");
    assert_eq!(session.load(other), LoadOutcome::Reset);
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.solved_count(), 0);
    assert_eq!(session.view().unwrap().masked, "___ ___.");
}

#[test]
fn strict_masking_hides_digits_and_punctuation() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load(&dir, "week1.csv", WEEK1);
    let toggles = RevealToggles {
        show_punctuation: false,
        show_numbers: false,
        ..RevealToggles::default()
    };
    let mut session = DictationSession::new(dataset, toggles);
    session.next();
    assert_eq!(session.view().unwrap().masked, "__ _____ __ ________");

    let mut reveal = session.toggles();
    reveal.toggle_reveal_all();
    session.set_toggles(reveal);
    assert!(session.view().unwrap().solved);
}

#[test]
fn bad_files_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let narrow = dir.path().join("narrow.csv");
    fs::write(&narrow, "id,english\n1,Hello\n").unwrap();
    assert!(matches!(
        Dataset::load(&narrow),
        Err(DatasetError::TooFewColumns { found: 2 })
    ));

    let header_only = dir.path().join("empty.csv");
    fs::write(&header_only, "id,english,korean\n").unwrap();
    assert!(matches!(Dataset::load(&header_only), Err(DatasetError::Empty)));

    let pdf = dir.path().join("notes.pdf");
    fs::write(&pdf, "x").unwrap();
    assert!(matches!(
        Dataset::load(&pdf),
        Err(DatasetError::UnsupportedFormat(_))
    ));
}

fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn spreadsheet_dataset_assigns_columns_by_position() {
    let dataset = Dataset::load(&fixture("sentences.xlsx")).unwrap();
    assert_eq!(dataset.len(), 3);
    let first = dataset.get(0).unwrap();
    assert_eq!(first.id, "1");
    assert_eq!(first.english, "Good morning everybody.");
    assert_eq!(first.korean, "모두 좋은 아침입니다.");
    assert_eq!(dataset.get(1).unwrap().english, "See you.");

    let session = DictationSession::new(dataset, RevealToggles::default());
    assert_eq!(session.view().unwrap().masked, "____ _______ _________.");
}

#[test]
fn two_column_spreadsheet_is_rejected() {
    let err = Dataset::load(&fixture("two_columns.xlsx")).unwrap_err();
    assert!(matches!(err, DatasetError::TooFewColumns { found: 2 }));
}


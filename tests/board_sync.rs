//! Board synchronization against a real vault directory.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use taskboard::io::store::DocumentStore;
use taskboard::io::vault_io::VaultStore;
use taskboard::model::board::{BoardState, TimeFilter};
use taskboard::model::config::BoardConfig;
use taskboard::model::task::Status;
use taskboard::ops::order::is_sorted;
use taskboard::parse::{parse_frontmatter, serialize_frontmatter};
use taskboard::sync::{BoardCoordinator, MoveOutcome, SkipReason};
use tempfile::TempDir;

fn write_doc(root: &Path, path: &str, text: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, text).unwrap();
}

fn open(root: &Path) -> BoardCoordinator<VaultStore> {
    let config = BoardConfig::default();
    let store = VaultStore::new(root, config.vault.ignore.clone());
    let mut board = BoardCoordinator::new(store, config);
    board.load_board().unwrap();
    board
}

fn titles(board: &BoardState, status: Status) -> Vec<&str> {
    board
        .column(status)
        .iter()
        .map(|t| t.title.as_str())
        .collect()
}

fn sample_vault() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_doc(root, "A.md", "---\ntags: [task]\nstatus: todo\norder: 0\n---\n");
    write_doc(root, "B.md", "---\ntags: [task]\nstatus: todo\norder: 10\n---\n");
    write_doc(root, "C.md", "---\ntags: [task]\nstatus: doing\n---\n");
    write_doc(root, "Untagged.md", "---\ntags: [task]\n---\nNo status or order\n");
    write_doc(root, "Note.md", "---\ntags: [note]\nstatus: doing\n---\n");
    write_doc(root, "node_modules/pkg/Task.md", "---\ntags: [task]\n---\n");
    tmp
}

#[test]
fn load_builds_four_sorted_columns() {
    let tmp = sample_vault();
    let board = open(tmp.path());
    let state = board.board();

    assert_eq!(state.len(), 4);
    assert_eq!(titles(state, Status::Doing), vec!["C"]);
    assert!(state.column(Status::Backlog).is_empty());
    assert!(state.get("Note.md").is_none());
    assert!(state.get("node_modules/pkg/Task.md").is_none());

    let untagged = state.get("Untagged.md").unwrap();
    assert_eq!(untagged.status, Status::Todo);
    assert_eq!(untagged.order, 0.0);

    for (_, tasks) in state.columns() {
        assert!(is_sorted(tasks));
    }
}

#[test]
fn move_sequence_keeps_columns_sorted_and_files_in_sync() {
    let tmp = sample_vault();
    let mut board = open(tmp.path());

    let outcome = board.move_task("C.md", Status::Todo, Some(0)).unwrap();
    assert_eq!(
        outcome,
        MoveOutcome::Moved {
            status: Status::Todo,
            order: -1000.0
        }
    );
    board.move_task("A.md", Status::Done, Some(0)).unwrap();
    board.move_task("B.md", Status::Todo, Some(1)).unwrap();

    let patched = board.board().clone();
    for (_, tasks) in patched.columns() {
        assert!(is_sorted(tasks));
    }

    // The in-memory patch agrees with a fresh load from disk
    let reloaded = open(tmp.path());
    assert_eq!(
        titles(reloaded.board(), Status::Todo),
        titles(&patched, Status::Todo)
    );
    assert_eq!(titles(reloaded.board(), Status::Done), vec!["A"]);
    assert_eq!(board.generation(), 3);
}

#[test]
fn move_preserves_body_and_other_fields() {
    let tmp = TempDir::new().unwrap();
    let text = "---\ntags: [task, work]\nstatus: todo\npriority: high\ndue: 2024-03-01\nassignee: \n---\n# Heading\n\n- keep me\n";
    write_doc(tmp.path(), "Task.md", text);
    let mut board = open(tmp.path());

    board.move_task("Task.md", Status::Doing, None).unwrap();
    assert_eq!(
        fs::read_to_string(tmp.path().join("Task.md")).unwrap(),
        "---\ntags: [task, work]\nstatus: doing\npriority: high\ndue: 2024-03-01\nassignee: \n---\n# Heading\n\n- keep me\n"
    );
}

#[test]
fn move_by_alias_path_keeps_one_card() {
    let tmp = sample_vault();
    write_doc(tmp.path(), "Projects/Launch.md", "---\ntags: [task]\nstatus: todo\n---\n");
    let mut board = open(tmp.path());
    let before = board.board().len();

    board.move_task("./A.md", Status::Done, None).unwrap();
    board.move_task("Projects/./Launch.md", Status::Backlog, Some(0)).unwrap();

    assert_eq!(board.board().len(), before);
    assert_eq!(board.board().find("A.md"), Some((Status::Done, 0)));
    assert_eq!(
        board.board().find("Projects/Launch.md"),
        Some((Status::Backlog, 0))
    );
    assert!(!titles(board.board(), Status::Todo).contains(&"A"));
    assert!(!titles(board.board(), Status::Todo).contains(&"Launch"));
}

#[test]
fn move_vanished_document_is_skipped() {
    let tmp = sample_vault();
    let mut board = open(tmp.path());
    fs::remove_file(tmp.path().join("C.md")).unwrap();

    let outcome = board.move_task("C.md", Status::Done, Some(0)).unwrap();
    assert_eq!(outcome, MoveOutcome::Skipped(SkipReason::NotFound));
    assert_eq!(board.generation(), 0);
}

#[test]
fn header_round_trip_is_byte_identical() {
    let source = "---\nstatus: todo\n---\nBody text";
    let fm = parse_frontmatter(source).unwrap();
    assert_eq!(serialize_frontmatter(source, &fm).unwrap(), source);
}

#[test]
fn created_task_shows_up_on_reload() {
    let tmp = sample_vault();
    let mut board = open(tmp.path());
    let task = board.create_task(Status::Backlog).unwrap();

    assert!(board.store().lookup(&task.path).is_some());
    let reloaded = open(tmp.path());
    assert_eq!(
        titles(reloaded.board(), Status::Backlog),
        vec![task.title.as_str()]
    );
}

#[test]
fn week_filter_keeps_freshly_created_documents() {
    let tmp = sample_vault();
    let mut board = open(tmp.path());
    board.set_time_filter(TimeFilter::Week).unwrap();
    assert_eq!(board.board().len(), 4);

    board.set_time_filter(TimeFilter::Today).unwrap();
    assert!(board.board().is_empty());
}

#[test]
fn watcher_reloads_on_external_change() {
    let tmp = sample_vault();
    let mut board = open(tmp.path());
    board.attach_watcher().unwrap();

    write_doc(
        tmp.path(),
        "D.md",
        "---\ntags: [task]\nstatus: backlog\n---\n",
    );

    let deadline = Instant::now() + Duration::from_secs(5);
    while board.board().get("D.md").is_none() && Instant::now() < deadline {
        board.poll_changes().unwrap();
        thread::sleep(Duration::from_millis(50));
    }
    assert_eq!(titles(board.board(), Status::Backlog), vec!["D"]);

    board.detach_watcher();
    assert!(!board.poll_changes().unwrap());
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use acode_ir::{Span, SymbolKind, SymbolRecord};
use pretty_assertions::assert_eq;

use crate::{scan_source, scan_workspace, Debouncer, SymbolIndex};

fn record(name: &str) -> SymbolRecord {
    SymbolRecord::new(
        name,
        SymbolKind::Variable,
        Span::new(0, u32::try_from(name.len()).unwrap()),
    )
}

// ─── Index entries ───────────────────────────────────────────────────────

#[test]
fn update_replaces_the_whole_entry() {
    let index = SymbolIndex::new();
    index.update("doc", vec![record("old")]);
    index.update("doc", vec![record("new")]);
    assert_eq!(index.lookup("old"), vec![]);
    assert_eq!(index.lookup("new").len(), 1);
    assert_eq!(index.documents(), 1);
}

#[test]
fn empty_scan_removes_the_entry() {
    let index = SymbolIndex::new();
    index.update("doc", vec![record("x")]);
    index.update("doc", Vec::new());
    assert_eq!(index.documents(), 0);
}

#[test]
fn remove_drops_the_document() {
    let index = SymbolIndex::new();
    index.update("doc", vec![record("x")]);
    index.remove("doc");
    assert_eq!(index.lookup("x"), vec![]);
}

#[test]
fn lookup_is_exact_and_search_is_substring() {
    let index = SymbolIndex::new();
    index.update("a", vec![record("renderPage")]);
    index.update("b", vec![record("render"), record("total")]);
    assert_eq!(index.lookup("render").len(), 1);
    assert_eq!(index.lookup("Render"), vec![]);
    let mut hits: Vec<String> = index
        .search("RENDER")
        .into_iter()
        .map(|(_, r)| r.name)
        .collect();
    hits.sort();
    assert_eq!(hits, vec!["render", "renderPage"]);
}

// ─── Scanning ────────────────────────────────────────────────────────────

#[test]
fn scan_source_collects_declarations() {
    let symbols = scan_source("var total;\nfunction render() { var inner; }");
    let names: Vec<(&str, SymbolKind)> = symbols
        .iter()
        .map(|s| (s.name.as_str(), s.kind))
        .collect();
    assert_eq!(
        names,
        vec![
            ("total", SymbolKind::Variable),
            ("render", SymbolKind::Function),
            ("inner", SymbolKind::Variable),
        ]
    );
}

#[test]
fn workspace_walk_indexes_recognized_files_only() {
    let root = std::env::temp_dir().join("acode-index-walk");
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(root.join(".hidden")).unwrap();
    std::fs::write(root.join("main.action"), "var visible;").unwrap();
    std::fs::write(root.join("page.export"), "^value(x)^ var exported;").unwrap();
    std::fs::write(root.join("notes.txt"), "var ignored;").unwrap();
    std::fs::write(root.join(".hidden/secret.action"), "var hidden;").unwrap();

    let index = SymbolIndex::new();
    scan_workspace(&index, &[&root]);

    assert_eq!(index.lookup("visible").len(), 1);
    assert_eq!(index.lookup("exported").len(), 1);
    assert_eq!(index.lookup("ignored"), vec![]);
    assert_eq!(index.lookup("hidden"), vec![]);
}

#[test]
fn rescan_keyed_by_path_replaces_the_walk_snapshot() {
    let root = std::env::temp_dir().join("acode-index-rescan");
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root).unwrap();
    let file = root.join("doc.action");
    std::fs::write(&file, "var stale;").unwrap();

    let index = SymbolIndex::new();
    scan_workspace(&index, &[&root]);
    assert_eq!(index.lookup("stale").len(), 1);

    // An editor-side rescan keyed by the same path supersedes the walk
    // entry instead of adding a second one.
    let id = file.to_string_lossy().into_owned();
    index.update(&id, scan_source("var fresh;"));
    assert_eq!(index.lookup("stale"), vec![]);
    assert_eq!(index.lookup("fresh").len(), 1);
    assert_eq!(index.documents(), 1);
}

// ─── Debouncing ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn superseded_task_never_runs() {
    let debouncer = Debouncer::new(Duration::from_millis(50));
    let runs = Arc::new(AtomicUsize::new(0));
    for _ in 0..3 {
        let runs = Arc::clone(&runs);
        debouncer.schedule("doc", async move {
            runs.fetch_add(1, Ordering::SeqCst);
        });
    }
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn independent_documents_do_not_supersede_each_other() {
    let debouncer = Debouncer::new(Duration::from_millis(50));
    let runs = Arc::new(AtomicUsize::new(0));
    for id in ["a", "b"] {
        let runs = Arc::clone(&runs);
        debouncer.schedule(id, async move {
            runs.fetch_add(1, Ordering::SeqCst);
        });
    }
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn cancel_aborts_the_pending_task() {
    let debouncer = Debouncer::new(Duration::from_millis(50));
    let runs = Arc::new(AtomicUsize::new(0));
    {
        let runs = Arc::clone(&runs);
        debouncer.schedule("doc", async move {
            runs.fetch_add(1, Ordering::SeqCst);
        });
    }
    debouncer.cancel("doc");
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

use std::path::Path;

use walkdir::WalkDir;

use crate::{scan_source, SymbolIndex};

/// File extensions the index considers Action or Export Code.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["action", "export"];

/// Walk `roots` recursively and index every recognized file.
///
/// Hidden directories are skipped. Unreadable files are logged and
/// skipped; the walk itself never fails. Intended to run in the
/// background at session start, never awaited by request handlers.
pub fn scan_workspace(index: &SymbolIndex, roots: &[impl AsRef<Path>]) {
    for root in roots {
        let walker = WalkDir::new(root.as_ref())
            .into_iter()
            .filter_entry(|e| !is_hidden(e.file_name()));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(%err, "workspace walk error");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_recognized(entry.path()) {
                continue;
            }
            match std::fs::read_to_string(entry.path()) {
                Ok(source) => {
                    let id = entry.path().to_string_lossy().into_owned();
                    index.update(&id, scan_source(&source));
                }
                Err(err) => {
                    tracing::warn!(path = %entry.path().display(), %err, "skipping unreadable file");
                }
            }
        }
    }
    tracing::debug!(documents = index.documents(), "workspace scan complete");
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn is_recognized(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| {
            RECOGNIZED_EXTENSIONS
                .iter()
                .any(|r| ext.eq_ignore_ascii_case(r))
        })
}

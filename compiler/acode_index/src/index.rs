use acode_ir::SymbolRecord;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Document id → declarations, replaced atomically per scan.
///
/// Invariant: an entry exists only while its document has at least one
/// declaration, and it always reflects one fully completed scan.
#[derive(Default, Debug)]
pub struct SymbolIndex {
    entries: RwLock<FxHashMap<String, Vec<SymbolRecord>>>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        SymbolIndex::default()
    }

    /// Replace a document's entry with a fresh scan. An empty scan
    /// removes the entry.
    pub fn update(&self, id: &str, symbols: Vec<SymbolRecord>) {
        let mut entries = self.entries.write();
        if symbols.is_empty() {
            entries.remove(id);
        } else {
            entries.insert(id.to_string(), symbols);
        }
    }

    /// Drop a document (closed, deleted, or renamed away).
    pub fn remove(&self, id: &str) {
        self.entries.write().remove(id);
    }

    /// Every record whose name matches `name` exactly.
    pub fn lookup(&self, name: &str) -> Vec<(String, SymbolRecord)> {
        self.entries
            .read()
            .iter()
            .flat_map(|(id, records)| {
                records
                    .iter()
                    .filter(|r| r.name == name)
                    .map(|r| (id.clone(), r.clone()))
            })
            .collect()
    }

    /// Case-insensitive substring search over all symbol names. An
    /// empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<(String, SymbolRecord)> {
        let needle = query.to_lowercase();
        self.entries
            .read()
            .iter()
            .flat_map(|(id, records)| {
                records
                    .iter()
                    .filter(|r| r.name.to_lowercase().contains(&needle))
                    .map(|r| (id.clone(), r.clone()))
            })
            .collect()
    }

    /// Number of documents currently carrying declarations.
    pub fn documents(&self) -> usize {
        self.entries.read().len()
    }
}

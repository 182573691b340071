// Action Code LSP server implementation

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use acode_check::Dialect;
use acode_diagnostic::Severity;
use acode_index::{scan_source, scan_workspace, Debouncer, SymbolIndex};
use acode_ir::{Span, SymbolKind as DeclKind, Token};
use acode_types::{Catalog, CatalogRef, Locale, Ty};
use dashmap::DashMap;
use parking_lot::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Document state tracked by the server
struct Document {
    /// Raw source text
    text: String,
    /// How the document is interpreted
    dialect: Dialect,
    /// Token stream of the last analysis
    tokens: Vec<Token>,
}

/// Action Code Language Server
pub struct AcodeLanguageServer {
    client: Client,
    documents: DashMap<Url, Document>,
    catalog: Arc<Catalog>,
    index: Arc<SymbolIndex>,
    debouncer: Debouncer,
    roots: RwLock<Vec<PathBuf>>,
}

impl AcodeLanguageServer {
    pub fn new(client: Client, catalog: Arc<Catalog>) -> Self {
        AcodeLanguageServer {
            client,
            documents: DashMap::new(),
            catalog,
            index: Arc::new(SymbolIndex::new()),
            debouncer: Debouncer::new(DEBOUNCE),
            roots: RwLock::new(Vec::new()),
        }
    }

    /// Store the new text and schedule a debounced revalidation. A
    /// superseded edit's analysis is aborted before it publishes.
    fn document_changed(&self, uri: Url, text: String) {
        let dialect = dialect_of(&uri);
        let tokens = acode_lexer::tokenize(&text);
        self.documents.insert(
            uri.clone(),
            Document {
                text: text.clone(),
                dialect,
                tokens,
            },
        );

        let key = uri.to_string();
        let index_id = index_id(&uri);
        let client = self.client.clone();
        let catalog = Arc::clone(&self.catalog);
        let index = Arc::clone(&self.index);
        self.debouncer.schedule(&key, async move {
            let diagnostics = acode_check::check_document(&text, dialect, &catalog)
                .into_iter()
                .map(|d| to_lsp_diagnostic(&text, &d))
                .collect();
            if let Some(id) = index_id {
                index.update(&id, scan_source(&text));
            }
            client.publish_diagnostics(uri, diagnostics, None).await;
        });
    }

    fn word_at(&self, uri: &Url, position: Position) -> Option<(String, u32)> {
        let doc = self.documents.get(uri)?;
        let offset = position_to_offset(&doc.text, position);
        let bytes = doc.text.as_bytes();
        let mut start = offset;
        while start > 0 && is_word_byte(bytes[start - 1]) {
            start -= 1;
        }
        let mut end = offset;
        while end < bytes.len() && is_word_byte(bytes[end]) {
            end += 1;
        }
        if start == end {
            return None;
        }
        Some((
            doc.text[start..end].to_string(),
            u32::try_from(start).ok()?,
        ))
    }

    // ─── Hover ───────────────────────────────────────────────────────────

    fn get_hover_info(&self, uri: &Url, position: Position) -> Option<Hover> {
        let (word, offset) = self.word_at(uri, position)?;
        let text = self
            .catalog
            .lookup(&word)
            .map(|r| render_catalog_ref(&r))
            .or_else(|| self.hover_for_export_tag(uri, &word))
            .or_else(|| self.hover_for_local(uri, &word, offset))?;
        Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: text,
            }),
            range: None,
        })
    }

    fn hover_for_export_tag(&self, uri: &Url, word: &str) -> Option<String> {
        if self.documents.get(uri)?.dialect != Dialect::Export {
            return None;
        }
        let tag = self.catalog.export_tag(word)?;
        Some(bilingual(
            &format!("`^{}^`", tag.name),
            tag.description(Locale::En),
            tag.description(Locale::Ja),
        ))
    }

    fn hover_for_local(&self, uri: &Url, word: &str, offset: u32) -> Option<String> {
        let doc = self.documents.get(uri)?;
        let mut declared = Ty::Unknown;
        for (name, ty_name) in acode_scope::local_types(&doc.text, &doc.tokens, offset) {
            if name == word {
                declared = Ty::from_name(&ty_name);
            }
        }
        if declared.is_unknown() {
            return None;
        }
        Some(format!("```\nvar : {declared} {word}\n```"))
    }

    // ─── Navigation ──────────────────────────────────────────────────────

    /// Definition lookup: current document, then other open documents,
    /// then the workspace index.
    fn find_definition(&self, uri: &Url, position: Position) -> Option<Location> {
        let (word, offset) = self.word_at(uri, position)?;
        let name = word.trim_start_matches('$');

        if let Some(doc) = self.documents.get(uri) {
            if let Some(span) = acode_scope::resolve(&doc.text, &doc.tokens, name, offset) {
                return Some(location(uri, &doc.text, span));
            }
        }
        for entry in &self.documents {
            if entry.key() == uri {
                continue;
            }
            let doc = entry.value();
            if let Some(span) = acode_scope::resolve(&doc.text, &doc.tokens, name, 0) {
                return Some(location(entry.key(), &doc.text, span));
            }
        }
        for (id, record) in self.index.lookup(name) {
            if let Ok(target) = Url::from_file_path(&id) {
                if self.documents.contains_key(&target) {
                    continue; // open documents were already consulted
                }
                if let Ok(text) = std::fs::read_to_string(&id) {
                    return Some(location(&target, &text, record.span));
                }
            }
        }
        None
    }

    fn reference_spans(&self, uri: &Url, position: Position) -> Option<Vec<Span>> {
        let (word, offset) = self.word_at(uri, position)?;
        let doc = self.documents.get(uri)?;
        let spans = acode_scope::find_references(&doc.text, &doc.tokens, &word, offset);
        if spans.is_empty() {
            None
        } else {
            Some(spans)
        }
    }

    // ─── Completion ──────────────────────────────────────────────────────

    fn get_completions(&self, uri: &Url, position: Position) -> Vec<CompletionItem> {
        let mut completions = Vec::new();

        for word in acode_lexer::RESERVED {
            completions.push(CompletionItem {
                label: (*word).to_string(),
                kind: Some(CompletionItemKind::KEYWORD),
                ..Default::default()
            });
        }
        for attr in self.catalog.attributes() {
            completions.push(CompletionItem {
                label: format!("${}", attr.name),
                kind: Some(CompletionItemKind::PROPERTY),
                detail: Some(attr.attr_type.clone()),
                ..Default::default()
            });
        }
        for op in self.catalog.operators() {
            completions.push(CompletionItem {
                label: op.name.clone(),
                kind: Some(CompletionItemKind::FUNCTION),
                detail: Some(format!("-> {}", op.return_type)),
                documentation: doc_markup(op.description(Locale::En), op.description(Locale::Ja)),
                ..Default::default()
            });
        }
        for designator in self.catalog.designators() {
            completions.push(CompletionItem {
                label: designator.name.clone(),
                kind: Some(CompletionItemKind::CONSTANT),
                ..Default::default()
            });
        }

        if let Some(doc) = self.documents.get(uri) {
            if doc.dialect == Dialect::Export {
                for tag in self.catalog.export_tags() {
                    completions.push(CompletionItem {
                        label: format!("^{}^", tag.name),
                        kind: Some(CompletionItemKind::SNIPPET),
                        documentation: doc_markup(
                            tag.description(Locale::En),
                            tag.description(Locale::Ja),
                        ),
                        ..Default::default()
                    });
                }
            }
            let offset = position_to_offset(&doc.text, position);
            for (name, ty_name) in
                acode_scope::local_types(&doc.text, &doc.tokens, u32_or_max(offset))
            {
                completions.push(CompletionItem {
                    label: name,
                    kind: Some(CompletionItemKind::VARIABLE),
                    detail: Some(ty_name),
                    ..Default::default()
                });
            }
        }

        completions
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for AcodeLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(folders) = params.workspace_folders {
            let mut roots = self.roots.write();
            roots.extend(folders.iter().filter_map(|f| f.uri.to_file_path().ok()));
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                references_provider: Some(OneOf::Left(true)),
                document_highlight_provider: Some(OneOf::Left(true)),
                rename_provider: Some(OneOf::Right(RenameOptions {
                    prepare_provider: Some(true),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                })),
                document_symbol_provider: Some(OneOf::Left(true)),
                workspace_symbol_provider: Some(OneOf::Left(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![
                        ".".to_string(),
                        "$".to_string(),
                        "^".to_string(),
                    ]),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "acode-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        if self.catalog.is_empty() {
            self.client
                .log_message(
                    MessageType::WARNING,
                    "reference data catalog is empty; catalog-backed features are degraded",
                )
                .await;
        }
        let roots = self.roots.read().clone();
        let index = Arc::clone(&self.index);
        // The initial walk runs in the background; request handlers
        // never wait for it. A fault in the walk is logged, not fatal.
        let walk = tokio::task::spawn_blocking(move || scan_workspace(&index, &roots));
        tokio::spawn(async move {
            if let Err(err) = walk.await {
                tracing::error!("workspace scan aborted: {err}");
            }
        });
        self.client
            .log_message(MessageType::INFO, "Action Code language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.document_changed(params.text_document.uri, params.text_document.text);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let text = params
            .content_changes
            .into_iter()
            .next()
            .map(|c| c.text)
            .unwrap_or_default();
        self.document_changed(params.text_document.uri, text);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.debouncer.cancel(uri.as_str());
        self.documents.remove(&uri);
        // The entry may hold unsaved edits; resync it with the file on
        // disk, or drop it when the file is gone.
        if let Some(id) = index_id(&uri) {
            match std::fs::read_to_string(&id) {
                Ok(source) => self.index.update(&id, scan_source(&source)),
                Err(_) => self.index.remove(&id),
            }
        }
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        Ok(self.get_hover_info(&uri, position))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        Ok(self
            .find_definition(&uri, position)
            .map(GotoDefinitionResponse::Scalar))
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some(spans) = self.reference_spans(&uri, position) else {
            return Ok(None);
        };
        let doc = match self.documents.get(&uri) {
            Some(doc) => doc,
            None => return Ok(None),
        };
        Ok(Some(
            spans
                .into_iter()
                .map(|span| location(&uri, &doc.text, span))
                .collect(),
        ))
    }

    async fn document_highlight(
        &self,
        params: DocumentHighlightParams,
    ) -> Result<Option<Vec<DocumentHighlight>>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(spans) = self.reference_spans(&uri, position) else {
            return Ok(None);
        };
        let doc = match self.documents.get(&uri) {
            Some(doc) => doc,
            None => return Ok(None),
        };
        Ok(Some(
            spans
                .into_iter()
                .map(|span| DocumentHighlight {
                    range: to_range(&doc.text, span),
                    kind: Some(DocumentHighlightKind::TEXT),
                })
                .collect(),
        ))
    }

    async fn prepare_rename(
        &self,
        params: TextDocumentPositionParams,
    ) -> Result<Option<PrepareRenameResponse>> {
        let uri = params.text_document.uri;
        let Some((word, start)) = self.word_at(&uri, params.position) else {
            return Ok(None);
        };
        if word.starts_with('$') {
            return Ok(None); // system attributes cannot be renamed
        }
        let doc = match self.documents.get(&uri) {
            Some(doc) => doc,
            None => return Ok(None),
        };
        let span = Span::new(start, start + u32_or_max(word.len()));
        Ok(Some(PrepareRenameResponse::Range(to_range(
            &doc.text, span,
        ))))
    }

    async fn rename(&self, params: RenameParams) -> Result<Option<WorkspaceEdit>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some(spans) = self.reference_spans(&uri, position) else {
            return Ok(None);
        };
        let doc = match self.documents.get(&uri) {
            Some(doc) => doc,
            None => return Ok(None),
        };
        let edits: Vec<TextEdit> = spans
            .into_iter()
            .map(|span| TextEdit {
                range: to_range(&doc.text, span),
                new_text: params.new_name.clone(),
            })
            .collect();
        let mut changes = std::collections::HashMap::new();
        changes.insert(uri, edits);
        Ok(Some(WorkspaceEdit {
            changes: Some(changes),
            ..Default::default()
        }))
    }

    #[allow(deprecated)]
    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;
        let doc = match self.documents.get(&uri) {
            Some(doc) => doc,
            None => return Ok(None),
        };
        let symbols = acode_scope::document_symbols(&doc.text, &doc.tokens)
            .into_iter()
            .map(|s| SymbolInformation {
                name: s.name,
                kind: to_symbol_kind(s.kind),
                tags: None,
                deprecated: None,
                location: location(&uri, &doc.text, s.span),
                container_name: None,
            })
            .collect();
        Ok(Some(DocumentSymbolResponse::Flat(symbols)))
    }

    #[allow(deprecated)]
    async fn symbol(
        &self,
        params: WorkspaceSymbolParams,
    ) -> Result<Option<Vec<SymbolInformation>>> {
        let mut symbols = Vec::new();

        // Open documents are scanned fresh; the index serves only the
        // documents that are not open.
        let mut open_paths = Vec::new();
        for entry in &self.documents {
            if let Some(id) = index_id(entry.key()) {
                open_paths.push(id);
            }
            let doc = entry.value();
            for record in acode_scope::document_symbols(&doc.text, &doc.tokens) {
                if !name_matches(&record.name, &params.query) {
                    continue;
                }
                symbols.push(SymbolInformation {
                    name: record.name,
                    kind: to_symbol_kind(record.kind),
                    tags: None,
                    deprecated: None,
                    location: location(entry.key(), &doc.text, record.span),
                    container_name: None,
                });
            }
        }

        for (id, record) in self.index.search(&params.query) {
            if open_paths.iter().any(|p| *p == id) {
                continue;
            }
            let Ok(uri) = Url::from_file_path(&id) else {
                continue;
            };
            let Ok(text) = std::fs::read_to_string(&id) else {
                continue;
            };
            symbols.push(SymbolInformation {
                name: record.name,
                kind: to_symbol_kind(record.kind),
                tags: None,
                deprecated: None,
                location: location(&uri, &text, record.span),
                container_name: None,
            });
        }
        Ok(Some(symbols))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        Ok(Some(CompletionResponse::Array(
            self.get_completions(&uri, position),
        )))
    }
}

// Helper functions

/// Index documents by filesystem path so that debounced rescans replace
/// the workspace walk's entries instead of shadowing them under a URI
/// string. Non-file URLs are not indexed.
fn index_id(uri: &Url) -> Option<String> {
    uri.to_file_path()
        .ok()
        .map(|p| p.to_string_lossy().into_owned())
}

/// Case-insensitive substring match, the same rule the index applies.
fn name_matches(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

fn dialect_of(uri: &Url) -> Dialect {
    if uri.path().ends_with(".export") {
        Dialect::Export
    } else {
        Dialect::Action
    }
}

fn render_catalog_ref(reference: &CatalogRef<'_>) -> String {
    match reference {
        CatalogRef::Operator(op) => bilingual(
            &format!("`{}` → {}", op.name, op.return_type),
            op.description(Locale::En),
            op.description(Locale::Ja),
        ),
        CatalogRef::Attribute(attr) => {
            let mut header = format!("`${}` : {}", attr.name, attr.attr_type);
            if attr.read_only {
                header.push_str(" (read-only)");
            }
            if attr.default.is_empty() {
                header
            } else {
                format!("{header}\n\ndefault: `{}`", attr.default)
            }
        }
        CatalogRef::Designator(d) => {
            bilingual(&format!("`{}`", d.name), &d.description_en, &d.description_ja)
        }
        CatalogRef::Color(c) => format!("`{}` — {}", c.name, c.hex),
        CatalogRef::DataType(t) => bilingual(&format!("`{}`", t.name), &t.description_en, ""),
    }
}

fn bilingual(header: &str, en: &str, ja: &str) -> String {
    let mut out = header.to_string();
    if !en.is_empty() {
        out.push_str("\n\n");
        out.push_str(en);
    }
    if !ja.is_empty() && ja != en {
        out.push_str("\n\n");
        out.push_str(ja);
    }
    out
}

fn doc_markup(en: &str, ja: &str) -> Option<Documentation> {
    if en.is_empty() && ja.is_empty() {
        return None;
    }
    Some(Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value: bilingual("", en, ja).trim_start().to_string(),
    }))
}

fn to_lsp_diagnostic(text: &str, d: &acode_diagnostic::Diagnostic) -> Diagnostic {
    Diagnostic {
        range: to_range(text, d.span),
        severity: Some(to_severity(d.severity)),
        code: Some(NumberOrString::String(d.code.as_str().to_string())),
        source: Some("acode".to_string()),
        message: d.message.clone(),
        ..Default::default()
    }
}

fn to_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Note => DiagnosticSeverity::INFORMATION,
        Severity::Help => DiagnosticSeverity::HINT,
    }
}

fn to_symbol_kind(kind: DeclKind) -> SymbolKind {
    match kind {
        DeclKind::Function => SymbolKind::FUNCTION,
        DeclKind::Variable => SymbolKind::VARIABLE,
    }
}

fn location(uri: &Url, text: &str, span: Span) -> Location {
    Location {
        uri: uri.clone(),
        range: to_range(text, span),
    }
}

fn to_range(text: &str, span: Span) -> Range {
    Range::new(
        offset_to_position(text, span.start as usize),
        offset_to_position(text, span.end as usize),
    )
}

fn offset_to_position(text: &str, offset: usize) -> Position {
    let mut line = 0;
    let mut col = 0;

    for (i, c) in text.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    Position::new(line, col)
}

fn position_to_offset(text: &str, position: Position) -> usize {
    let mut line = 0;
    let mut col = 0;

    for (i, c) in text.char_indices() {
        if line == position.line && col == position.character {
            return i;
        }
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    text.len()
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn u32_or_max(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{dialect_of, index_id, name_matches, Dialect};
    use tower_lsp::lsp_types::Url;

    #[test]
    fn index_ids_use_filesystem_paths() {
        let uri = Url::from_file_path("/w/main.action").unwrap();
        let id = index_id(&uri).unwrap();
        assert_eq!(id, "/w/main.action");
        // The id must round-trip so an index hit resolves to a URL.
        assert_eq!(Url::from_file_path(&id).unwrap(), uri);
    }

    #[test]
    fn non_file_urls_are_not_indexed() {
        let uri = Url::parse("untitled:Untitled-1").unwrap();
        assert_eq!(index_id(&uri), None);
    }

    #[test]
    fn workspace_query_match_is_case_insensitive_substring() {
        assert!(name_matches("WordCount", "count"));
        assert!(name_matches("WordCount", ""));
        assert!(!name_matches("WordCount", "lines"));
    }

    #[test]
    fn dialect_follows_the_file_extension() {
        let export = Url::from_file_path("/w/page.export").unwrap();
        let action = Url::from_file_path("/w/main.action").unwrap();
        assert_eq!(dialect_of(&export), Dialect::Export);
        assert_eq!(dialect_of(&action), Dialect::Action);
    }
}

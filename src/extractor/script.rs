//! JavaScript / TypeScript reference extraction
//!
//! Sources are parsed with tree-sitter; references come from syntax nodes
//! only, so text inside strings, template literals and comments never
//! produces an edge. Recognized forms:
//!
//! - `import ... from '...'`, `import '...'`, `import type ... from '...'`
//! - `export ... from '...'`, `export * from '...'`, `export type ... from '...'`
//! - `import x = require('...')`, `require('...')`, `import('...')`

use tracing::debug;
use tree_sitter::{Language, Node, Parser};

use super::{ExtractionError, ReferenceExtractor};
use crate::core::{ModuleId, Position, Reference, ReferenceKind};

/// Tree-sitter extractor for `.js`, `.jsx`, `.ts`, `.tsx`, `.mjs`, `.cjs`
///
/// `.ts`, `.mts` and `.cts` files use the TypeScript grammar; everything else
/// uses the TSX grammar, which also accepts plain JavaScript and JSX.
#[derive(Clone)]
pub struct ScriptExtractor {
    ts_language: Language,
    tsx_language: Language,
}

impl Default for ScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptExtractor {
    pub fn new() -> Self {
        Self {
            ts_language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx_language: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    fn language_for(&self, module: &ModuleId) -> &Language {
        match module.path().extension().and_then(|e| e.to_str()) {
            Some("ts" | "mts" | "cts") => &self.ts_language,
            _ => &self.tsx_language,
        }
    }

    /// Extract references from already-loaded source text, in source order
    pub fn extract_source(
        &self,
        module: &ModuleId,
        source: &str,
    ) -> Result<Vec<Reference>, ExtractionError> {
        let parse_failed = |reason: String| ExtractionError::Parse {
            path: module.path().to_path_buf(),
            reason,
        };

        let mut parser = Parser::new();
        parser
            .set_language(self.language_for(module))
            .map_err(|e| parse_failed(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| parse_failed("parser produced no syntax tree".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            debug!(module = %module, "syntax errors in module, extracting from recovered tree");
        }

        let mut scan = Scan {
            module,
            source: source.as_bytes(),
            found: Vec::new(),
        };

        let mut cursor = root.walk();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "import_statement" => scan.import_statement(node),
                "export_statement" => scan.export_statement(node),
                "call_expression" => scan.call_expression(node),
                _ => {}
            }
            stack.extend(node.named_children(&mut cursor));
        }

        scan.found.sort_by_key(|(offset, _)| *offset);
        scan.found.dedup_by_key(|(offset, _)| *offset);
        Ok(scan.found.into_iter().map(|(_, reference)| reference).collect())
    }
}

impl ReferenceExtractor for ScriptExtractor {
    fn extract(&self, module: &ModuleId) -> Result<Vec<Reference>, ExtractionError> {
        let bytes = std::fs::read(module.path()).map_err(|source| ExtractionError::Read {
            path: module.path().to_path_buf(),
            source,
        })?;
        let source = String::from_utf8(bytes).map_err(|source| ExtractionError::Encoding {
            path: module.path().to_path_buf(),
            source,
        })?;

        self.extract_source(module, &source)
    }
}

/// References collected from one syntax tree, keyed by start byte
struct Scan<'a> {
    module: &'a ModuleId,
    source: &'a [u8],
    found: Vec<(usize, Reference)>,
}

impl Scan<'_> {
    fn push(&mut self, node: Node, raw: String, kind: ReferenceKind, specifiers: Vec<String>) {
        let point = node.start_position();
        self.found.push((
            node.start_byte(),
            Reference {
                raw,
                origin: self.module.clone(),
                position: Position {
                    line: point.row + 1,
                    column: point.column + 1,
                },
                kind,
                specifiers,
            },
        ));
    }

    fn text(&self, node: Node) -> &str {
        node.utf8_text(self.source).unwrap_or("")
    }

    /// Contents of a string literal node, without its quotes
    fn string_value(&self, node: Node) -> Option<String> {
        if node.kind() != "string" {
            return None;
        }
        let text = self.text(node);
        let inner = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
        Some(inner.to_string())
    }

    fn import_statement(&mut self, node: Node) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();

        if let Some(clause) = children.iter().find(|c| c.kind() == "import_require_clause") {
            if let Some(raw) = clause
                .child_by_field_name("source")
                .and_then(|s| self.string_value(s))
            {
                self.push(node, raw, ReferenceKind::Require, Vec::new());
            }
            return;
        }

        let Some(raw) = node
            .child_by_field_name("source")
            .and_then(|s| self.string_value(s))
        else {
            return;
        };

        let clause = children.iter().find(|c| c.kind() == "import_clause");
        let (specifiers, all_types) = match clause {
            Some(clause) => self.import_clause(*clause),
            None => (Vec::new(), false),
        };

        let kind = if has_type_keyword(&children) || all_types {
            ReferenceKind::TypeOnly
        } else {
            ReferenceKind::Import
        };
        self.push(node, raw, kind, specifiers);
    }

    /// Bound names, and whether every named binding is marked `type`
    fn import_clause(&self, clause: Node) -> (Vec<String>, bool) {
        let mut names = Vec::new();
        let mut all_types = false;

        let mut cursor = clause.walk();
        for part in clause.named_children(&mut cursor) {
            match part.kind() {
                "identifier" => names.push("default".to_string()),
                "namespace_import" => names.push("*".to_string()),
                "named_imports" => {
                    let (named, types) = self.specifier_list(part, "import_specifier");
                    all_types = !named.is_empty() && types == named.len() && names.is_empty();
                    names.extend(named);
                }
                _ => {}
            }
        }

        (names, all_types)
    }

    fn export_statement(&mut self, node: Node) {
        let Some(raw) = node
            .child_by_field_name("source")
            .and_then(|s| self.string_value(s))
        else {
            return;
        };

        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();

        let mut specifiers = Vec::new();
        let mut all_types = false;
        for child in &children {
            match child.kind() {
                "*" | "namespace_export" => specifiers.push("*".to_string()),
                "export_clause" => {
                    let (named, types) = self.specifier_list(*child, "export_specifier");
                    all_types = !named.is_empty() && types == named.len();
                    specifiers.extend(named);
                }
                _ => {}
            }
        }

        let kind = if has_type_keyword(&children) || all_types {
            ReferenceKind::TypeReExport
        } else {
            ReferenceKind::ReExport
        };
        self.push(node, raw, kind, specifiers);
    }

    /// Names in `{ a, b as c, type D }` and how many carry `type`
    fn specifier_list(&self, list: Node, specifier_kind: &str) -> (Vec<String>, usize) {
        let mut names = Vec::new();
        let mut types = 0;

        let mut cursor = list.walk();
        let specifiers: Vec<Node> = list
            .named_children(&mut cursor)
            .filter(|n| n.kind() == specifier_kind)
            .collect();

        for specifier in specifiers {
            let mut inner = specifier.walk();
            let parts: Vec<Node> = specifier.children(&mut inner).collect();
            if has_type_keyword(&parts) {
                types += 1;
            }
            if let Some(name) = specifier.child_by_field_name("name") {
                let name = self
                    .string_value(name)
                    .unwrap_or_else(|| self.text(name).to_string());
                names.push(name);
            }
        }

        (names, types)
    }

    fn call_expression(&mut self, node: Node) {
        let Some(function) = node.child_by_field_name("function") else {
            return;
        };
        let kind = match function.kind() {
            "import" => ReferenceKind::Dynamic,
            "identifier" if self.text(function) == "require" => ReferenceKind::Require,
            _ => return,
        };

        let Some(arguments) = node.child_by_field_name("arguments") else {
            return;
        };
        let mut cursor = arguments.walk();
        let first = arguments.named_children(&mut cursor).next();
        if let Some(raw) = first.and_then(|arg| self.string_value(arg)) {
            self.push(node, raw, kind, Vec::new());
        }
    }
}

/// `type` / `typeof` keyword directly among a node's children
fn has_type_keyword(children: &[Node]) -> bool {
    children
        .iter()
        .any(|c| !c.is_named() && matches!(c.kind(), "type" | "typeof"))
}

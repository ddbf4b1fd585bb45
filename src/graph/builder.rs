use super::source::SourceProvider;
use super::{DependencyGraph, FileNode};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;
use tracing::{debug, info};

const RESOLVE_EXTENSIONS: [&str; 6] = [".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"];
const INDEX_FILES: [&str; 4] = ["index.ts", "index.tsx", "index.js", "index.jsx"];

fn import_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r#"(?m)^\s*import\s+(?:type\s+)?[\w*${}\s,]+?\s+from\s+['"]([^'"]+)['"]"#,
            r#"(?m)^\s*import\s+['"]([^'"]+)['"]"#,
            r#"(?m)^\s*export\s+(?:type\s+)?(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s+from\s+['"]([^'"]+)['"]"#,
            r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
            r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid import regex"))
        .collect()
    })
}

fn named_export_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?m)^\s*export\s+(?:declare\s+)?(?:default\s+)?(?:async\s+)?(?:abstract\s+)?(?:function\*?|class|const|let|var|interface|type|enum)\s+([A-Za-z_$][\w$]*)",
        )
        .expect("valid export regex")
    })
}

fn default_export_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^\s*export\s+default\b").expect("valid export regex"))
}

fn export_list_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^\s*export\s+(?:type\s+)?\{([^}]*)\}").expect("valid export regex")
    })
}

fn commonjs_export_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b(?:module\.)?exports\.([A-Za-z_$][\w$]*)\s*=").expect("valid export regex")
    })
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Za-z_$][\w$]*").expect("valid identifier regex"))
}

/// Builds the file-level import graph for the distinct `paths`.
///
/// Unreadable files are left out of `nodes`. Relative imports that resolve to
/// a node, or to any readable file, become edges; bare package specifiers do not.
pub fn build_graph<'a, I>(paths: I, source: &dyn SourceProvider) -> DependencyGraph
where
    I: IntoIterator<Item = &'a str>,
{
    let distinct: BTreeSet<&str> = paths.into_iter().collect();

    let mut nodes = BTreeMap::new();
    for path in &distinct {
        match source.read(path) {
            Some(content) => {
                let node = parse_file(path, &content);
                debug!(
                    path,
                    imports = node.imports.len(),
                    exports = node.exports.len(),
                    "parsed source file"
                );
                nodes.insert((*path).to_string(), node);
            }
            None => debug!(path, "skipping unreadable source file"),
        }
    }

    let mut readable: HashMap<String, bool> = HashMap::new();
    let mut edges = BTreeMap::new();
    for node in nodes.values() {
        let path = &node.file_path;
        let mut targets = BTreeSet::new();
        for specifier in &node.imports {
            let Some(base) = resolve_specifier(path, specifier) else {
                continue;
            };
            let resolved = candidate_paths(&base).into_iter().find(|candidate| {
                nodes.contains_key(candidate)
                    || *readable
                        .entry(candidate.clone())
                        .or_insert_with(|| source.read(candidate).is_some())
            });
            if let Some(resolved) = resolved {
                if resolved != *path {
                    targets.insert(resolved);
                }
            }
        }
        if !targets.is_empty() {
            edges.insert(path.clone(), targets);
        }
    }

    let edge_count: usize = edges.values().map(BTreeSet::len).sum();
    info!(nodes = nodes.len(), edges = edge_count, "dependency graph built");
    DependencyGraph::new(nodes, edges)
}

pub fn parse_file(path: &str, content: &str) -> FileNode {
    FileNode {
        file_path: path.to_string(),
        imports: extract_imports(content),
        exports: extract_exports(content),
        identifiers: identifier_pattern()
            .find_iter(content)
            .map(|m| m.as_str().to_string())
            .collect(),
    }
}

fn extract_imports(content: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = import_patterns()
        .iter()
        .flat_map(|pattern| pattern.captures_iter(content))
        .filter_map(|captures| {
            captures
                .get(1)
                .map(|specifier| (specifier.start(), specifier.as_str().to_string()))
        })
        .collect();
    in_source_order(&mut found)
}

fn extract_exports(content: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();

    for captures in named_export_pattern().captures_iter(content) {
        if let Some(name) = captures.get(1) {
            found.push((name.start(), name.as_str().to_string()));
        }
    }
    for m in default_export_pattern().find_iter(content) {
        found.push((m.start(), "default".to_string()));
    }
    for captures in export_list_pattern().captures_iter(content) {
        if let Some(list) = captures.get(1) {
            for entry in list.as_str().split(',') {
                let entry = entry.trim().trim_start_matches("type ").trim();
                let exported = entry.rsplit(" as ").next().unwrap_or(entry).trim();
                if !exported.is_empty() {
                    found.push((list.start(), exported.to_string()));
                }
            }
        }
    }
    for captures in commonjs_export_pattern().captures_iter(content) {
        if let Some(name) = captures.get(1) {
            found.push((name.start(), name.as_str().to_string()));
        }
    }

    in_source_order(&mut found)
}

fn in_source_order(found: &mut [(usize, String)]) -> Vec<String> {
    found.sort_by_key(|(offset, _)| *offset);
    let mut seen = BTreeSet::new();
    found
        .iter()
        .filter(|(_, value)| seen.insert(value.clone()))
        .map(|(_, value)| value.clone())
        .collect()
}

/// Resolves a relative specifier against the importing file's directory.
/// Bare specifiers and paths escaping the project root yield `None`.
fn resolve_specifier(from: &str, specifier: &str) -> Option<String> {
    let relative = specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier == "."
        || specifier == "..";
    if !relative {
        return None;
    }
    let dir = from.rsplit_once('/').map_or("", |(dir, _)| dir);

    let mut parts: Vec<&str> = dir.split('/').filter(|part| !part.is_empty()).collect();
    for part in specifier.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    (!parts.is_empty()).then(|| parts.join("/"))
}

fn candidate_paths(base: &str) -> Vec<String> {
    let mut candidates = vec![base.to_string()];
    if let Some(stem) = base
        .strip_suffix(".js")
        .or_else(|| base.strip_suffix(".jsx"))
    {
        candidates.push(format!("{stem}.ts"));
        candidates.push(format!("{stem}.tsx"));
    }
    candidates.extend(RESOLVE_EXTENSIONS.iter().map(|ext| format!("{base}{ext}")));
    candidates.extend(INDEX_FILES.iter().map(|index| format!("{base}/{index}")));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::source::memory::MemorySource;
    use crate::types::config::DependencySignal;

    #[test]
    fn extracts_static_dynamic_and_commonjs_imports() {
        let content = r#"
import { a, b } from './a';
import type { T } from "../types";
import * as path from 'path';
import './polyfill';
export * from './reexport';
const lazy = import('./lazy');
const fs = require("fs");
"#;
        assert_eq!(
            extract_imports(content),
            vec!["./a", "../types", "path", "./polyfill", "./reexport", "./lazy", "fs"]
        );
    }

    #[test]
    fn extracts_multiline_import_lists() {
        let content = "import {\n  first,\n  second,\n} from './multi';\n";
        assert_eq!(extract_imports(content), vec!["./multi"]);
    }

    #[test]
    fn extracts_exported_names() {
        let content = r#"
export async function charge() {}
export class Ledger {}
export const RATE = 1;
const x = 1, y = 2;
export { x, y as renamed };
export default Ledger;
module.exports.legacy = () => {};
"#;
        assert_eq!(
            extract_exports(content),
            vec!["charge", "Ledger", "RATE", "x", "renamed", "default", "legacy"]
        );
    }

    #[test]
    fn resolves_relative_specifiers() {
        assert_eq!(
            resolve_specifier("src/payments/charge.ts", "./ledger"),
            Some("src/payments/ledger".to_string())
        );
        assert_eq!(
            resolve_specifier("src/payments/charge.ts", "../utils/money"),
            Some("src/utils/money".to_string())
        );
        assert_eq!(resolve_specifier("src/a.ts", "lodash"), None);
        assert_eq!(resolve_specifier("a.ts", "../../outside"), None);
    }

    #[test]
    fn builds_edges_between_target_files() {
        let source = MemorySource::default()
            .with(
                "src/payments/charge.ts",
                "import { add } from '../utils/money';\nimport { log } from './logger.js';\nexport function charge() {}",
            )
            .with(
                "src/payments/refund.ts",
                "import { add } from '../utils/money';\nexport function refund() {}",
            )
            .with("src/utils/money.ts", "export function add() {}")
            .with("src/payments/logger.ts", "export const log = () => {};");

        let graph = build_graph(
            [
                "src/payments/charge.ts",
                "src/payments/refund.ts",
                "src/utils/money.ts",
                "src/payments/charge.ts",
            ],
            &source,
        );

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.fan_in("src/utils/money.ts"), 2);
        assert_eq!(graph.fan_out("src/payments/charge.ts"), 2);
        assert_eq!(graph.fan_in("src/payments/logger.ts"), 1);
        assert_eq!(
            graph.dependency_count("src/payments/refund.ts", DependencySignal::GraphSize),
            3
        );
    }

    #[test]
    fn unreadable_files_are_not_nodes() {
        let source = MemorySource::default().with("src/a.ts", "import './b';");
        let graph = build_graph(["src/a.ts", "src/missing.ts"], &source);
        assert!(graph.contains("src/a.ts"));
        assert!(!graph.contains("src/missing.ts"));
        assert_eq!(graph.fan_out("src/a.ts"), 0);
    }

    #[test]
    fn index_files_resolve_directory_imports() {
        let source = MemorySource::default()
            .with("src/app.ts", "import { db } from './db';")
            .with("src/db/index.ts", "export const db = {};");
        let graph = build_graph(["src/app.ts", "src/db/index.ts"], &source);
        assert_eq!(graph.fan_in("src/db/index.ts"), 1);
    }
}

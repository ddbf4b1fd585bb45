use crate::error::{Result, TestRankError};
use globset::{Glob, GlobMatcher};

const GLOB_META: [char; 4] = ['*', '?', '[', '{'];

/// A path pattern compiled once per run.
///
/// Glob syntax, including `{a,b}` alternation, is matched against the whole
/// path. A pattern with no glob metacharacters also matches any path below
/// it (`src/payments` matches `src/payments/charge.ts` but not
/// `src/payments_v2/charge.ts`).
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    glob: GlobMatcher,
}

impl PathPattern {
    pub fn compile(source: &str) -> Result<Self> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(TestRankError::InvalidPattern {
                pattern: source.to_string(),
                message: "pattern must not be empty".to_string(),
            });
        }
        let glob = Glob::new(trimmed)
            .map_err(|e| TestRankError::InvalidPattern {
                pattern: source.to_string(),
                message: e.kind().to_string(),
            })?
            .compile_matcher();
        Ok(Self {
            source: trimmed.to_string(),
            glob,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = normalize(path);
        if self.glob.is_match(&path) {
            return true;
        }
        !self.source.contains(GLOB_META) && is_path_prefix(&self.source, &path)
    }
}

/// Lenient one-shot match used for externally supplied patterns; an
/// uncompilable glob falls back to exact/prefix comparison.
pub fn path_matches(pattern: &str, path: &str) -> bool {
    match PathPattern::compile(pattern) {
        Ok(compiled) => compiled.matches(path),
        Err(_) => is_path_prefix(pattern.trim(), &normalize(path)),
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches("./").replace('\\', "/")
}

fn is_path_prefix(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_start_matches("./").trim_end_matches('/');
    if prefix.is_empty() {
        return false;
    }
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

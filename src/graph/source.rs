use std::path::PathBuf;
use tracing::debug;

/// Read access to project sources, keyed by the paths targets carry.
pub trait SourceProvider {
    fn read(&self, path: &str) -> Option<String>;
}

/// Reads sources relative to a project root.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceProvider for FsSource {
    fn read(&self, path: &str) -> Option<String> {
        let full = self.root.join(path);
        match std::fs::read_to_string(&full) {
            Ok(content) => Some(content),
            Err(e) => {
                debug!(path = %full.display(), error = %e, "source unreadable");
                None
            }
        }
    }
}

//! Filesystem artifact source.
//!
//! Snapshots the reviewable files of a generated configuration tree into
//! the ordered, immutable file list a [`ReviewRequest`] is built from.
//!
//! [`ReviewRequest`]: council_domain::ReviewRequest

use council_application::ports::artifact_source::{ArtifactError, ArtifactSource};
use council_domain::ArtifactFile;
use std::path::Path;
use tracing::{debug, warn};

/// Glob patterns collected from the artifact root, in priority order.
/// These are the files a configuration review actually cares about.
const ARTIFACT_PATTERNS: &[&str] = &[
    "CLAUDE.md",
    "models.json",
    ".claude/settings.json",
    ".claude/settings.local.json",
    ".claude/agents/*.md",
    ".claude/commands/*.md",
];

/// Files larger than this are skipped; configuration artifacts are small
/// and reviewers cannot usefully consume big blobs.
const MAX_FILE_BYTES: u64 = 64 * 1024;

/// [`ArtifactSource`] reading a configuration tree from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsArtifactSource;

impl FsArtifactSource {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactSource for FsArtifactSource {
    fn snapshot(&self, root: &Path) -> Result<Vec<ArtifactFile>, ArtifactError> {
        if !root.is_dir() {
            return Err(ArtifactError::NotADirectory(root.to_path_buf()));
        }

        let mut files = Vec::new();
        for pattern in ARTIFACT_PATTERNS {
            let full_pattern = root.join(pattern);
            let Some(pattern_str) = full_pattern.to_str() else {
                continue;
            };
            let entries = match glob::glob(pattern_str) {
                Ok(entries) => entries,
                Err(e) => {
                    // Patterns are compile-time constants; only an exotic
                    // root path can break them.
                    warn!(pattern = %pattern_str, "skipping unreadable pattern: {e}");
                    continue;
                }
            };

            for entry in entries {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        let path = e.path().to_path_buf();
                        return Err(ArtifactError::Io {
                            path,
                            source: e.into_error(),
                        });
                    }
                };
                if !path.is_file() {
                    continue;
                }

                let size = std::fs::metadata(&path)
                    .map_err(|e| ArtifactError::Io {
                        path: path.clone(),
                        source: e,
                    })?
                    .len();
                if size > MAX_FILE_BYTES {
                    warn!(path = %path.display(), size, "skipping oversized artifact file");
                    continue;
                }

                let content = match std::fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                        warn!(path = %path.display(), "skipping non-UTF-8 artifact file");
                        continue;
                    }
                    Err(e) => {
                        return Err(ArtifactError::Io { path, source: e });
                    }
                };

                let relative = path
                    .strip_prefix(root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");
                files.push(ArtifactFile::new(relative, content));
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|a, b| a.path == b.path);

        if files.is_empty() {
            return Err(ArtifactError::Empty(root.to_path_buf()));
        }
        debug!(root = %root.display(), files = files.len(), "artifact snapshot taken");
        Ok(files)
    }
}

//! File tree enumeration with negation pruning
//!
//! Walks one or more base paths in pre-order, collecting the files selected
//! by a compiled pattern list. Negated directories are pruned outright: their
//! subtrees are never entered.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::BentoError;
use crate::pattern::{Pattern, PatternMatch, match_path};
use crate::result::Result;

/// Enumerate the files under `bases` selected by `patterns`.
///
/// An empty `bases` slice defaults to the root itself. Each base is walked
/// independently in caller-supplied order; overlapping bases may therefore
/// yield the same path more than once. This is documented behavior, not an
/// error; no de-duplication is performed.
///
/// Directory entries are visited in file-name order so results are
/// deterministic across runs. Enumeration I/O errors abort the walk.
pub fn walk(bases: &[PathBuf], patterns: &[Pattern], root: &Path) -> Result<Vec<PathBuf>> {
    let root_base = [root.to_path_buf()];
    let bases: &[PathBuf] = if bases.is_empty() { &root_base } else { bases };

    let mut selected = Vec::new();
    for base in bases {
        walk_base(base, patterns, root, &mut selected)?;
    }

    debug!("walk selected {} file(s)", selected.len());
    Ok(selected)
}

fn walk_base(base: &Path, patterns: &[Pattern], root: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut iter = WalkDir::new(base)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = iter.next() {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| base.to_path_buf());
            match e.into_io_error() {
                Some(io) => BentoError::io(path, io),
                None => BentoError::internal("file tree loop detected during walk"),
            }
        })?;

        let is_dir = entry.file_type().is_dir();
        match match_path(patterns, entry.path(), is_dir, root) {
            PatternMatch::Negated => {
                // Negated directories and their entire subtree are skipped.
                if is_dir {
                    iter.skip_current_dir();
                }
            }
            PatternMatch::Matched => {
                if !is_dir {
                    out.push(entry.path().to_path_buf());
                }
            }
            // A directory can fail to match yet still contain matching
            // descendants; recursion continues either way.
            PatternMatch::None => {}
        }
    }

    Ok(())
}

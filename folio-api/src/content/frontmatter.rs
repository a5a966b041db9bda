//! Frontmatter splitting and parsing
//!
//! A content file starts with a YAML block fenced by `---` lines; the rest of
//! the file is the body.

use folio_common::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

const FENCE: &str = "---";

/// Split `source` into `(yaml, body)`
///
/// Returns `None` when the file does not open with a fence or the block is
/// never closed.
pub fn split(source: &str) -> Option<(&str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut lines = source.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != FENCE {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == FENCE {
            let yaml = &source[yaml_start..offset];
            let body = &source[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

/// Parse the frontmatter of `source` into `T` and return it with the body
///
/// `path` only labels errors.
pub fn parse<T: DeserializeOwned>(path: &Path, source: &str) -> Result<(T, String)> {
    let (yaml, body) = split(source).ok_or_else(|| Error::Content {
        path: path.to_path_buf(),
        message: "missing frontmatter block".to_string(),
    })?;

    let meta = serde_yaml::from_str(yaml).map_err(|e| Error::Content {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok((meta, body.to_string()))
}

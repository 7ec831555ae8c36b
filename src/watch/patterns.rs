// src/watch/patterns.rs

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::errors::{Result, RewatchError};

/// Ordered set of glob patterns matched against a file's *base name*.
///
/// A name matches if any pattern matches (`*`, `?`, `[...]`, `[!...]`,
/// `{a,b}`). Matching is case-sensitive. Duplicate patterns are kept in the
/// listing but make no difference to matching.
#[derive(Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSet")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.patterns.join(", "))
    }
}

impl PatternSet {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .backslash_escape(true)
                .build()
                .map_err(|source| RewatchError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
        }

        let set = builder.build().map_err(|source| RewatchError::InvalidPattern {
            pattern: patterns.join(", "),
            source,
        })?;

        Ok(Self { patterns, set })
    }

    /// Patterns in the order they were given.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Match a bare file name such as `"main.rs"`.
    pub fn matches_name(&self, name: impl AsRef<OsStr>) -> bool {
        self.set.is_match(Path::new(name.as_ref()))
    }

    /// Match the final component of `path`. Paths without a file name
    /// (e.g. `/` or `..`) never match.
    pub fn matches_file_name(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| self.matches_name(name))
    }
}

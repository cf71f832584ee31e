// src/patterns.rs

//! Ordered glob pattern sets with `!` negations.
//!
//! The same [`PatternSet`] selects pipeline inputs and decides which changed
//! paths a watch binding cares about. Paths are matched as strings relative
//! to the project root, with forward slashes.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

/// One positive glob plus the static directory prefix it starts from.
#[derive(Clone)]
pub struct IncludeGlob {
    pattern: String,
    base: PathBuf,
    matcher: GlobMatcher,
}

impl IncludeGlob {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Directory (relative to the project root) where matching starts, e.g.
    /// `_sass` for `_sass/**/*.scss`. Paths written to a destination are
    /// relative to this base.
    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn is_match(&self, rel_path: &str) -> bool {
        self.matcher.is_match(rel_path)
    }

    /// True when the pattern names a single file (no glob syntax at all).
    pub fn is_literal(&self) -> bool {
        !has_glob_meta(&self.pattern)
    }
}

/// Compiled, ordered set of include/exclude globs.
#[derive(Clone)]
pub struct PatternSet {
    raw: Vec<String>,
    includes: Vec<IncludeGlob>,
    include_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSet")
            .field("patterns", &self.raw)
            .finish_non_exhaustive()
    }
}

impl PatternSet {
    /// Compile patterns. Entries starting with `!` are negations and remove
    /// matches regardless of their position in the list.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut raw = Vec::with_capacity(patterns.len());
        let mut includes = Vec::new();
        let mut include_builder = GlobSetBuilder::new();
        let mut exclude_builder = GlobSetBuilder::new();
        let mut has_excludes = false;

        for pat in patterns {
            let pat = pat.as_ref().trim();
            raw.push(pat.to_string());

            if let Some(negated) = pat.strip_prefix('!') {
                let negated = normalize(negated);
                exclude_builder.add(compile(&negated)?.glob().clone());
                has_excludes = true;
                continue;
            }

            let pattern = normalize(pat);
            let glob = compile(&pattern)?;
            include_builder.add(glob.glob().clone());
            includes.push(IncludeGlob {
                base: static_base(&pattern),
                pattern,
                matcher: glob,
            });
        }

        let include_set = include_builder.build().context("building include globset")?;
        let exclude_set = if has_excludes {
            Some(exclude_builder.build().context("building exclude globset")?)
        } else {
            None
        };

        Ok(Self {
            raw,
            includes,
            include_set,
            exclude_set,
        })
    }

    /// The patterns as configured, negations included.
    pub fn patterns(&self) -> &[String] {
        &self.raw
    }

    pub fn includes(&self) -> &[IncludeGlob] {
        &self.includes
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty()
    }

    /// Returns true if `rel_path` (relative to the project root, e.g.
    /// `"_sass/main.scss"`) is selected by this set.
    pub fn matches(&self, rel_path: &str) -> bool {
        let rel_path = rel_path.strip_prefix("./").unwrap_or(rel_path);
        if !self.include_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }

    pub fn is_excluded(&self, rel_path: &str) -> bool {
        let rel_path = rel_path.strip_prefix("./").unwrap_or(rel_path);
        self.exclude_set
            .as_ref()
            .is_some_and(|set| set.is_match(rel_path))
    }
}

/// Compile a single glob with literal separators, so `css/*.css` does not
/// descend into `css/vendor/`.
pub fn compile(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob pattern: {pattern}"))?;
    Ok(glob.compile_matcher())
}

fn normalize(pattern: &str) -> String {
    let p = pattern.replace('\\', "/");
    p.strip_prefix("./").map(str::to_string).unwrap_or(p)
}

fn has_glob_meta(s: &str) -> bool {
    s.contains(['*', '?', '[', '{'])
}

/// Longest leading run of path components without glob syntax.
///
/// A pattern with no glob syntax at all names a file; its base is the
/// containing directory.
pub fn static_base(pattern: &str) -> PathBuf {
    let path = Path::new(pattern);

    if !has_glob_meta(pattern) {
        return path.parent().map(Path::to_path_buf).unwrap_or_default();
    }

    let mut base = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) if has_glob_meta(&part.to_string_lossy()) => break,
            Component::CurDir => {}
            other => base.push(other),
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_base_stops_at_first_glob_component() {
        assert_eq!(static_base("_sass/**/*.scss"), PathBuf::from("_sass"));
        assert_eq!(static_base("css/*.css"), PathBuf::from("css"));
        assert_eq!(static_base("_img/**/*"), PathBuf::from("_img"));
        assert_eq!(static_base("**/*.js"), PathBuf::new());
        assert_eq!(
            static_base("node_modules/bootstrap/dist/css/bootstrap.css"),
            PathBuf::from("node_modules/bootstrap/dist/css")
        );
    }

    #[test]
    fn star_does_not_cross_directories() {
        let set = PatternSet::new(&["css/*.css"]).unwrap();
        assert!(set.matches("css/main.css"));
        assert!(!set.matches("css/vendor/bootstrap.css"));
    }

    #[test]
    fn globstar_matches_top_level_and_nested() {
        let set = PatternSet::new(&["_img/**/*"]).unwrap();
        assert!(set.matches("_img/logo.png"));
        assert!(set.matches("_img/icons/menu.svg"));
        assert!(!set.matches("img/logo.png"));
    }

    #[test]
    fn negations_win_regardless_of_order() {
        let set = PatternSet::new(&["!_js/vendor/**", "_js/**/*.js"]).unwrap();
        assert!(set.matches("_js/app.js"));
        assert!(!set.matches("_js/vendor/jquery.js"));
        assert!(set.is_excluded("./_js/vendor/jquery.js"));
        assert_eq!(set.includes().len(), 1);
    }

    #[test]
    fn invalid_globs_are_reported() {
        let err = PatternSet::new(&["_sass/[.scss"]).unwrap_err();
        assert!(err.to_string().contains("_sass/[.scss"));
    }
}

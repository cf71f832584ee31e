// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SitebuildError};
use crate::patterns::{self, PatternSet};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SitebuildError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

/// Semantic checks that serde cannot express.
///
/// Whether watch bindings point at registered tasks is checked later, once
/// the task registry exists (see `tasks::build_registry`).
fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_source_globs(cfg)?;
    validate_clean_patterns(cfg)?;
    validate_bundles(cfg)?;
    validate_perf(cfg)?;
    validate_watch(cfg)?;
    Ok(())
}

fn config_err(msg: impl Into<String>) -> SitebuildError {
    SitebuildError::Config(msg.into())
}

fn validate_source_globs(cfg: &RawConfigFile) -> Result<()> {
    let sets = [
        ("paths.sass_sources", &cfg.paths.sass_sources),
        ("paths.js_sources", &cfg.paths.js_sources),
        ("paths.image_sources", &cfg.paths.image_sources),
        ("css.sources", &cfg.css.sources),
        ("uncss.stylesheets", &cfg.uncss.stylesheets),
    ];

    for (key, patterns) in sets {
        let set = PatternSet::new(patterns.as_slice())
            .map_err(|e| config_err(format!("{key}: {e:#}")))?;
        if set.is_empty() {
            return Err(config_err(format!(
                "{key} must contain at least one non-negated pattern"
            )));
        }
    }
    Ok(())
}

fn validate_clean_patterns(cfg: &RawConfigFile) -> Result<()> {
    for pat in &cfg.clean.patterns {
        if pat.contains('/') {
            return Err(config_err(format!(
                "clean.patterns entry '{pat}' must match file names only, not paths"
            )));
        }
        patterns::compile(pat).map_err(|e| config_err(format!("clean.patterns: {e:#}")))?;
    }
    Ok(())
}

fn validate_bundles(cfg: &RawConfigFile) -> Result<()> {
    for (key, name) in [("css.bundle", &cfg.css.bundle), ("js.bundle", &cfg.js.bundle)] {
        if name.trim().is_empty() || name.contains(['/', '\\']) {
            return Err(config_err(format!(
                "{key} must be a plain file name (got '{name}')"
            )));
        }
    }
    Ok(())
}

fn validate_perf(cfg: &RawConfigFile) -> Result<()> {
    if cfg.perf.request_limit == 0 {
        return Err(config_err("perf.request_limit must be >= 1 (got 0)"));
    }
    if cfg.perf.program.trim().is_empty() {
        return Err(config_err("perf.program must not be empty"));
    }
    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    for binding in &cfg.watch {
        if binding.task.trim().is_empty() {
            return Err(config_err("watch binding is missing a task name"));
        }
        let set = PatternSet::new(binding.patterns.as_slice())
            .map_err(|e| config_err(format!("watch binding for '{}': {e:#}", binding.task)))?;
        if set.is_empty() {
            return Err(config_err(format!(
                "watch binding for '{}' has no patterns to watch",
                binding.task
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::WatchBindingConfig;

    #[test]
    fn defaults_are_valid() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(cfg.perf().request_limit, 5);
        assert_eq!(cfg.watch_bindings().len(), 3);
    }

    #[test]
    fn zero_request_limit_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.perf.request_limit = 0;
        let err = ConfigFile::try_from(raw).unwrap_err();
        assert!(matches!(err, SitebuildError::Config(msg) if msg.contains("request_limit")));
    }

    #[test]
    fn bundle_names_cannot_be_paths() {
        let mut raw = RawConfigFile::default();
        raw.js.bundle = "../all.min.js".to_string();
        assert!(matches!(ConfigFile::try_from(raw), Err(SitebuildError::Config(_))));
    }

    #[test]
    fn clean_patterns_stay_inside_css_dir() {
        let mut raw = RawConfigFile::default();
        raw.clean.patterns = vec!["**/*".to_string()];
        assert!(matches!(ConfigFile::try_from(raw), Err(SitebuildError::Config(_))));
    }

    #[test]
    fn watch_binding_with_only_negations_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.watch = vec![WatchBindingConfig::new(&["!_js/**"], "js")];
        assert!(matches!(ConfigFile::try_from(raw), Err(SitebuildError::Config(_))));
    }
}

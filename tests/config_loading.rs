// tests/config_loading.rs

use std::path::PathBuf;

use sitebuild::config::{load_and_validate, load_for_cli};
use sitebuild::errors::SitebuildError;
use sitebuild::types::Viewport;
use sitebuild_test_utils::builders::write_file;

#[test]
fn overrides_merge_with_defaults_and_resolve_against_the_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "site/Sitebuild.toml",
        r#"
[paths]
css_dir = "assets/css"

[perf]
request_limit = 9
propagate_failure = false

[critical]
dimensions = ["375x667"]

[[watch]]
patterns = ["_sass/**/*.scss"]
task = "sass"
"#,
    );

    let cfg = load_and_validate(&path).unwrap();

    assert_eq!(cfg.root(), dir.path().join("site"));
    assert_eq!(cfg.project_path(&cfg.paths().css_dir), dir.path().join("site/assets/css"));
    assert_eq!(cfg.paths().js_dir, PathBuf::from("js"));
    assert_eq!(cfg.perf().request_limit, 9);
    assert!(!cfg.perf().propagate_failure);
    assert_eq!(cfg.critical().dimensions, vec![Viewport::new(375, 667)]);
    assert_eq!(cfg.watch_bindings().len(), 1);
    assert_eq!(cfg.watch_bindings()[0].task, "sass");
}

#[test]
fn unknown_fields_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "Sitebuild.toml", "[perf]\nrequest_limt = 3\n");

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, SitebuildError::Toml(_)), "got {err:?}");
}

#[test]
fn zero_request_limit_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "Sitebuild.toml", "[perf]\nrequest_limit = 0\n");

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, SitebuildError::Config(_)), "got {err:?}");
}

#[test]
fn malformed_viewport_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "Sitebuild.toml",
        "[critical]\ndimensions = [\"wide\"]\n",
    );

    assert!(load_and_validate(&path).is_err());
}

#[test]
fn explicit_missing_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = load_for_cli(Some(&missing)).unwrap_err();
    assert!(matches!(err, SitebuildError::Io(_)), "got {err:?}");
}

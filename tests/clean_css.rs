// tests/clean_css.rs

use std::path::Path;
use std::sync::Arc;

use sitebuild::fs::mock::MockFileSystem;
use sitebuild::fs::{FileSystem, RealFileSystem};
use sitebuild_test_utils::builders::{write_file, ConfigBuilder};
use sitebuild_test_utils::fake_processes::FakeProcessBackend;
use sitebuild_test_utils::{init_tracing, site_context};

#[tokio::test]
async fn deletes_only_generated_stylesheets() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    for generated in ["css/all.min.css", "css/main.css", "css/main.css.map", "css/allegro.css"] {
        write_file(root, generated, "x");
    }
    for kept in [
        "css/bootstrap.css",
        "css/bootstrap-theme.css",
        "css/vendor/all.css",
        "css/print-main.css",
        "_sass/main.scss",
    ] {
        write_file(root, kept, "x");
    }

    let ctx = site_context(
        ConfigBuilder::new().root(root).build(),
        Arc::new(RealFileSystem),
        Arc::new(FakeProcessBackend::new()),
    );
    ctx.invoker().invoke("clean-css").await.unwrap();

    let fs = RealFileSystem;
    for gone in ["css/all.min.css", "css/main.css", "css/main.css.map", "css/allegro.css"] {
        assert!(!fs.exists(&root.join(gone)), "{gone} should be deleted");
    }
    for kept in [
        "css/bootstrap.css",
        "css/bootstrap-theme.css",
        "css/vendor/all.css",
        "css/print-main.css",
        "_sass/main.scss",
    ] {
        assert!(fs.is_file(&root.join(kept)), "{kept} must survive");
    }
}

#[tokio::test]
async fn missing_css_directory_is_not_an_error() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let ctx = site_context(
        ConfigBuilder::new().root(dir.path()).build(),
        Arc::new(RealFileSystem),
        Arc::new(FakeProcessBackend::new()),
    );
    ctx.invoker().invoke("clean-css").await.unwrap();
}

#[tokio::test]
async fn works_against_the_in_memory_filesystem() {
    init_tracing();
    let mock = MockFileSystem::new();
    mock.add_file("./css/all.min.css", "x");
    mock.add_file("./css/bootstrap.css", "x");

    let ctx = site_context(
        ConfigBuilder::new().build(),
        Arc::new(mock.clone()),
        Arc::new(FakeProcessBackend::new()),
    );
    ctx.invoker().invoke("clean-css").await.unwrap();

    assert!(!mock.exists(Path::new("./css/all.min.css")));
    assert!(mock.is_file(Path::new("./css/bootstrap.css")));
}

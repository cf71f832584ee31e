// tests/sass_task.rs

use std::sync::Arc;

use sitebuild::errors::SitebuildError;
use sitebuild::fs::{FileSystem, RealFileSystem};
use sitebuild_test_utils::builders::{write_file, ConfigBuilder};
use sitebuild_test_utils::fake_processes::FakeProcessBackend;
use sitebuild_test_utils::{init_tracing, site_context};

#[tokio::test]
async fn compiles_entry_points_and_skips_partials() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write_file(root, "_sass/_variables.scss", "$brand: #336699;\n");
    write_file(
        root,
        "_sass/main.scss",
        "@import 'variables';\n.header { color: $brand; user-select: none; }\n",
    );

    let ctx = site_context(
        ConfigBuilder::new().root(root).build(),
        Arc::new(RealFileSystem),
        Arc::new(FakeProcessBackend::new()),
    );
    ctx.invoker().invoke("sass").await.unwrap();

    let fs = RealFileSystem;
    let css = fs.read_to_string(&root.join("css/main.css")).unwrap();
    assert!(css.contains(".header"), "got: {css}");
    assert!(css.contains("#369") || css.contains("#336699"), "got: {css}");
    assert!(!fs.exists(&root.join("css/_variables.css")));
}

#[tokio::test]
async fn compile_error_reports_file_and_line_and_writes_nothing() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write_file(root, "_sass/main.scss", ".a {\n  color: $undefined;\n}\n");
    write_file(root, "_sass/other.scss", ".b { color: red; }\n");

    let ctx = site_context(
        ConfigBuilder::new().root(root).build(),
        Arc::new(RealFileSystem),
        Arc::new(FakeProcessBackend::new()),
    );

    let err = ctx.invoker().invoke("sass").await.unwrap_err();
    match err {
        SitebuildError::Compile { ref file, line, .. } => {
            assert!(file.ends_with("main.scss"), "file was {file}");
            assert_eq!(line, 2);
        }
        other => panic!("expected a compile error, got {other:?}"),
    }

    let fs = RealFileSystem;
    assert!(!fs.exists(&root.join("css/main.css")));
    assert!(!fs.exists(&root.join("css/other.css")), "a failed batch writes nothing");
}

// tests/invocation.rs

use std::sync::Arc;

use sitebuild::config::{ConfigFile, RawConfigFile};
use sitebuild::dag::TaskRunState;
use sitebuild::errors::SitebuildError;
use sitebuild::fs::{FileSystem, RealFileSystem};
use sitebuild::tasks::TaskContext;
use sitebuild_test_utils::builders::{write_file, ConfigBuilder, RecordingTasks, RunLog};
use sitebuild_test_utils::fake_processes::FakeProcessBackend;
use sitebuild_test_utils::{init_tracing, site_context};

fn recording_context(tasks: RecordingTasks) -> (TaskContext, RunLog) {
    let (registry, log) = tasks.build();
    let ctx = TaskContext::new(
        ConfigFile::try_from(RawConfigFile::default()).unwrap(),
        registry,
        Arc::new(RealFileSystem),
        Arc::new(FakeProcessBackend::new()),
    );
    (ctx, log)
}

#[tokio::test]
async fn unknown_task_is_fatal_and_runs_nothing() {
    init_tracing();
    let (ctx, log) = recording_context(RecordingTasks::new().task("a", &[]).task("b", &["a"]));

    let err = ctx.invoker().invoke("deploy").await.unwrap_err();
    assert!(matches!(err, SitebuildError::UnknownTask(ref n) if n == "deploy"));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_prerequisite_is_caught_before_any_body() {
    init_tracing();
    let (ctx, log) = recording_context(
        RecordingTasks::new()
            .task("first", &[])
            .task("broken", &["first", "missing"]),
    );

    let err = ctx.invoker().invoke("broken").await.unwrap_err();
    assert!(matches!(err, SitebuildError::UnknownTask(ref n) if n == "missing"));
    assert!(log.lock().unwrap().is_empty(), "'first' must not run either");
}

#[tokio::test]
async fn prerequisites_run_in_listed_order_before_the_body() {
    init_tracing();
    let (ctx, log) = recording_context(
        RecordingTasks::new()
            .task("clean-css", &[])
            .task("sass", &[])
            .task("css", &["clean-css", "sass"]),
    );

    let report = ctx.invoker().invoke("css").await.unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["clean-css", "sass", "css"]);
    assert_eq!(report.completed(), vec!["clean-css", "sass", "css"]);
    assert!(report.succeeded());
    assert_eq!(report.requested, "css");
}

#[tokio::test]
async fn shared_prerequisite_runs_once_per_path() {
    init_tracing();
    let (ctx, log) = recording_context(
        RecordingTasks::new()
            .task("base", &[])
            .task("a", &["base"])
            .task("b", &["base"])
            .task("all", &["a", "b"]),
    );

    ctx.invoker().invoke("all").await.unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["base", "a", "base", "b", "all"]);
}

#[tokio::test]
async fn failing_prerequisite_stops_the_chain() {
    init_tracing();
    let (ctx, log) = recording_context(
        RecordingTasks::new()
            .task("clean-css", &[])
            .failing("sass", &[])
            .task("css", &["clean-css", "sass"]),
    );

    let (report, outcome) = ctx.invoker().invoke_with_report("css").await.unwrap();

    assert!(matches!(outcome, Err(SitebuildError::Stage { .. })));
    assert_eq!(*log.lock().unwrap(), vec!["clean-css", "sass"]);

    let states: Vec<_> = report.steps.iter().map(|s| s.state).collect();
    assert_eq!(
        states,
        vec![TaskRunState::Completed, TaskRunState::Failed, TaskRunState::Failed]
    );
    assert_eq!(report.failed_step().map(|s| s.task.as_str()), Some("sass"));
    assert!(report.steps[2].elapsed.is_none(), "css body never started");
}

#[tokio::test]
async fn steps_after_a_failure_stay_not_started() {
    init_tracing();
    let (ctx, _log) = recording_context(
        RecordingTasks::new()
            .failing("one", &[])
            .task("two", &[])
            .task("both", &["one", "two"]),
    );

    let (report, outcome) = ctx.invoker().invoke_with_report("both").await.unwrap();
    assert!(outcome.is_err());
    assert_eq!(report.steps[1].task, "two");
    assert_eq!(report.steps[1].state, TaskRunState::NotStarted);
}

#[tokio::test]
async fn invocation_ids_increase() {
    init_tracing();
    let (ctx, _log) = recording_context(RecordingTasks::new().task("a", &[]));
    let invoker = ctx.invoker();

    let first = invoker.invoke("a").await.unwrap();
    let second = invoker.invoke("a").await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn css_task_cleans_then_compiles_then_bundles() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write_file(root, "_sass/main.scss", "$gap: 4px;\n.a { margin: $gap; }\n");
    write_file(root, "_sass/_mixins.scss", "@mixin x { color: red; }\n");
    write_file(root, "css/all.min.css", "/* stale bundle */ .stale { color: red }");
    write_file(root, "css/bootstrap.css", ".btn { padding: 1px; }\n");

    let ctx = site_context(
        ConfigBuilder::new().root(root).build(),
        Arc::new(RealFileSystem),
        Arc::new(FakeProcessBackend::new()),
    );

    let report = ctx.invoker().invoke("css").await.unwrap();
    assert_eq!(report.completed(), vec!["clean-css", "sass", "css"]);

    let fs = RealFileSystem;
    assert!(fs.is_file(&root.join("css/main.css")));
    assert!(!fs.exists(&root.join("css/_mixins.css")), "partials are not compiled");

    let bundle = fs.read_to_string(&root.join("css/all.min.css")).unwrap();
    assert!(!bundle.contains("stale"), "old bundle was cleaned first: {bundle}");
    assert!(bundle.contains(".btn{padding:1px}"), "got: {bundle}");
    assert!(bundle.contains(".a{margin:4px}"), "got: {bundle}");
}

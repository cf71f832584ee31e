// tests/perf_task.rs

use std::sync::Arc;

use sitebuild::errors::SitebuildError;
use sitebuild::fs::mock::MockFileSystem;
use sitebuild::tasks::TaskContext;
use sitebuild_test_utils::builders::ConfigBuilder;
use sitebuild_test_utils::fake_processes::{FakeProcessBackend, FakeResponse};
use sitebuild_test_utils::{init_tracing, site_context};

const PROGRAM: &str = "phantomas";

fn context(builder: ConfigBuilder, response: FakeResponse) -> (TaskContext, FakeProcessBackend) {
    let processes = FakeProcessBackend::new().respond(PROGRAM, response);
    let ctx = site_context(
        builder.perf_program(PROGRAM).build(),
        Arc::new(MockFileSystem::new()),
        Arc::new(processes.clone()),
    );
    (ctx, processes)
}

#[tokio::test]
async fn passes_within_budget() {
    init_tracing();
    let (ctx, processes) = context(ConfigBuilder::new(), FakeResponse::code(0));

    ctx.invoker().invoke("phantomas").await.unwrap();

    let calls = processes.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].args,
        vec!["--url", "http://localhost:4000", "--assert-requests=5"]
    );
}

#[tokio::test]
async fn request_limit_reaches_the_command_line() {
    init_tracing();
    let (ctx, processes) = context(ConfigBuilder::new().request_limit(12), FakeResponse::code(0));

    ctx.invoker().invoke("phantomas").await.unwrap();
    assert!(processes.calls()[0]
        .args
        .contains(&"--assert-requests=12".to_string()));
}

#[tokio::test]
async fn over_budget_fails_when_propagating() {
    init_tracing();
    let (ctx, _) = context(ConfigBuilder::new(), FakeResponse::code(1));

    let err = ctx.invoker().invoke("phantomas").await.unwrap_err();
    assert!(matches!(err, SitebuildError::PerfBudgetExceeded { limit: 5 }));
}

#[tokio::test]
async fn other_exit_codes_are_check_errors() {
    init_tracing();
    let (ctx, _) = context(ConfigBuilder::new(), FakeResponse::code(3));

    let err = ctx.invoker().invoke("phantomas").await.unwrap_err();
    assert!(matches!(err, SitebuildError::PerfCheckErrored { code: 3 }));
}

#[tokio::test]
async fn outcomes_are_only_logged_without_propagation() {
    init_tracing();
    for response in [FakeResponse::code(1), FakeResponse::code(3), FakeResponse::NotFound] {
        let (ctx, _) = context(
            ConfigBuilder::new().propagate_perf_failure(false),
            response.clone(),
        );
        ctx.invoker()
            .invoke("phantomas")
            .await
            .unwrap_or_else(|e| panic!("{response:?} should only be logged, got {e}"));
    }
}

#[tokio::test]
async fn missing_program_fails_when_propagating() {
    init_tracing();
    let (ctx, _) = context(ConfigBuilder::new(), FakeResponse::NotFound);

    let err = ctx.invoker().invoke("phantomas").await.unwrap_err();
    assert!(matches!(err, SitebuildError::ProgramNotFound(ref p) if p == PROGRAM));
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sitebuild::errors::{Result, SitebuildError};
use sitebuild::exec::{ProcessBackend, ProcessExit, ProcessSpec};
use sitebuild::types::BoxFuture;

/// What the fake answers for a program.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Exit { code: Option<i32>, stdout: Vec<u8> },
    NotFound,
}

impl FakeResponse {
    pub fn code(code: i32) -> Self {
        FakeResponse::Exit {
            code: Some(code),
            stdout: Vec::new(),
        }
    }

    pub fn stdout(bytes: impl Into<Vec<u8>>) -> Self {
        FakeResponse::Exit {
            code: Some(0),
            stdout: bytes.into(),
        }
    }

    pub fn signalled() -> Self {
        FakeResponse::Exit {
            code: None,
            stdout: Vec::new(),
        }
    }
}

/// A fake process backend that:
/// - records every `ProcessSpec` it was asked to run
/// - answers with the response configured for the program (exit 0 by
///   default) without spawning anything.
#[derive(Debug, Clone, Default)]
pub struct FakeProcessBackend {
    calls: Arc<Mutex<Vec<ProcessSpec>>>,
    responses: Arc<Mutex<HashMap<String, FakeResponse>>>,
}

impl FakeProcessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, program: &str, response: FakeResponse) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(program.to_string(), response);
        self
    }

    pub fn calls(&self) -> Vec<ProcessSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.program).collect()
    }
}

impl ProcessBackend for FakeProcessBackend {
    fn run(&self, spec: ProcessSpec) -> BoxFuture<'_, Result<ProcessExit>> {
        Box::pin(async move {
            let response = self
                .responses
                .lock()
                .unwrap()
                .get(&spec.program)
                .cloned()
                .unwrap_or_else(|| FakeResponse::code(0));
            let program = spec.program.clone();
            self.calls.lock().unwrap().push(spec);

            match response {
                FakeResponse::Exit { code, stdout } => Ok(ProcessExit { code, stdout }),
                FakeResponse::NotFound => Err(SitebuildError::ProgramNotFound(program)),
            }
        })
    }
}

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sitebuild::config::{ConfigFile, RawConfigFile, ToolCommand, WatchBindingConfig};
use sitebuild::dag::{TaskRegistry, TaskSpec};
use sitebuild::errors::SitebuildError;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults, rooted at `.` unless [`root`](Self::root)
/// is called.
pub struct ConfigBuilder {
    config: RawConfigFile,
    base_dir: PathBuf,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
            base_dir: PathBuf::from("."),
        }
    }

    /// Resolve every configured path against `dir` (e.g. a tempdir).
    pub fn root(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn request_limit(mut self, limit: u32) -> Self {
        self.config.perf.request_limit = limit;
        self
    }

    pub fn propagate_perf_failure(mut self, propagate: bool) -> Self {
        self.config.perf.propagate_failure = propagate;
        self
    }

    pub fn perf_program(mut self, program: &str) -> Self {
        self.config.perf.program = program.to_string();
        self
    }

    pub fn critical_program(mut self, program: &str) -> Self {
        self.config.critical.program = program.to_string();
        self
    }

    pub fn uncss(mut self, program: &str, args: &[&str], pages: &[&str]) -> Self {
        self.config.uncss.program = program.to_string();
        self.config.uncss.args = args.iter().map(|a| a.to_string()).collect();
        self.config.uncss.pages = pages.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn uncss_stylesheets(mut self, sheets: &[&str]) -> Self {
        self.config.uncss.stylesheets = sheets.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn no_optimizers(mut self) -> Self {
        self.config.images.optimizers.clear();
        self
    }

    pub fn optimizer(mut self, ext: &str, program: &str, args: &[&str]) -> Self {
        self.config
            .images
            .optimizers
            .insert(ext.to_string(), ToolCommand::new(program, args));
        self
    }

    pub fn optimizer_command(mut self, ext: &str, command: ToolCommand) -> Self {
        self.config.images.optimizers.insert(ext.to_string(), command);
        self
    }

    pub fn watch(mut self, patterns: &[&str], task: &str) -> Self {
        self.config.watch.push(WatchBindingConfig::new(patterns, task));
        self
    }

    pub fn without_watch(mut self) -> Self {
        self.config.watch.clear();
        self
    }

    pub fn raw(&self) -> &RawConfigFile {
        &self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config)
            .expect("Failed to build valid config from builder")
            .with_base_dir(self.base_dir)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(&path, contents).expect("write test file");
    path
}

/// Shared log of task bodies that ran, in order.
pub type RunLog = Arc<Mutex<Vec<String>>>;

/// Builds a registry whose bodies only record their own name.
pub struct RecordingTasks {
    registry: TaskRegistry,
    log: RunLog,
}

impl RecordingTasks {
    pub fn new() -> Self {
        Self {
            registry: TaskRegistry::new(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A task that records its name and succeeds.
    pub fn task(mut self, name: &str, after: &[&str]) -> Self {
        let log = Arc::clone(&self.log);
        let own = name.to_string();
        self.registry
            .register(TaskSpec::new(name).after(after.iter().copied()), move |_| {
                let log = Arc::clone(&log);
                let own = own.clone();
                async move {
                    log.lock().unwrap().push(own);
                    Ok(())
                }
            })
            .expect("register recording task");
        self
    }

    /// A task that records its name and then fails.
    pub fn failing(mut self, name: &str, after: &[&str]) -> Self {
        let log = Arc::clone(&self.log);
        let own = name.to_string();
        self.registry
            .register(TaskSpec::new(name).after(after.iter().copied()), move |_| {
                let log = Arc::clone(&log);
                let own = own.clone();
                async move {
                    log.lock().unwrap().push(own.clone());
                    Err(SitebuildError::stage(own, "boom"))
                }
            })
            .expect("register failing task");
        self
    }

    pub fn build(self) -> (TaskRegistry, RunLog) {
        (self.registry, self.log)
    }
}

impl Default for RecordingTasks {
    fn default() -> Self {
        Self::new()
    }
}

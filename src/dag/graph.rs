// src/dag/graph.rs

//! The task registry: names, prerequisites, descriptions and bodies.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{Result, SitebuildError};
use crate::tasks::TaskContext;
use crate::types::{BoxFuture, TaskName};

/// Type-erased task body.
pub type TaskBody = Arc<dyn Fn(TaskContext) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Everything about a task except its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: TaskName,
    /// Run in this order, each to completion, before the body.
    pub after: Vec<TaskName>,
    pub description: Option<String>,
}

impl TaskSpec {
    pub fn new(name: impl Into<TaskName>) -> Self {
        Self {
            name: name.into(),
            after: Vec::new(),
            description: None,
        }
    }

    pub fn after<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskName>,
    {
        self.after.extend(prerequisites.into_iter().map(Into::into));
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

pub struct RegisteredTask {
    spec: TaskSpec,
    body: TaskBody,
}

impl RegisteredTask {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn prerequisites(&self) -> &[TaskName] {
        &self.spec.after
    }

    pub fn description(&self) -> Option<&str> {
        self.spec.description.as_deref()
    }

    pub fn body(&self) -> &TaskBody {
        &self.body
    }
}

impl fmt::Debug for RegisteredTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTask")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// One entry of an execution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    pub task: TaskName,
    /// 0 for the requested task, 1 for its direct prerequisites, ...
    pub depth: usize,
    /// Index of the first step belonging to this task's prerequisites.
    /// Steps `first_prerequisite..index` run on its behalf; equal to the
    /// step's own index when it has none.
    pub first_prerequisite: usize,
}

/// Registered tasks, keyed by unique name.
///
/// Populated once at startup and shared read-only afterwards.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<TaskName, RegisteredTask>,
}

impl fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tasks.keys()).finish()
    }
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task. Registering the same name twice is an error.
    pub fn register<F, Fut>(&mut self, spec: TaskSpec, body: F) -> Result<()>
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        if spec.name.trim().is_empty() {
            return Err(SitebuildError::Config("task name must not be empty".to_string()));
        }
        if self.tasks.contains_key(&spec.name) {
            return Err(SitebuildError::Config(format!(
                "task '{}' is registered twice",
                spec.name
            )));
        }

        let erased: TaskBody = Arc::new(move |ctx: TaskContext| {
            Box::pin(body(ctx)) as BoxFuture<'static, Result<()>>
        });
        self.tasks.insert(
            spec.name.clone(),
            RegisteredTask {
                spec,
                body: erased,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTask> {
        self.tasks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn prerequisites_of(&self, name: &str) -> Option<&[TaskName]> {
        self.get(name).map(RegisteredTask::prerequisites)
    }

    /// All task names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.tasks.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredTask> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Check that every prerequisite is registered and that the
    /// prerequisite graph has no cycles.
    pub fn validate(&self) -> Result<()> {
        for task in self.tasks.values() {
            for dep in task.prerequisites() {
                if !self.contains(dep) {
                    return Err(SitebuildError::Config(format!(
                        "task '{}' runs after unknown task '{}'",
                        task.name(),
                        dep
                    )));
                }
            }
        }

        // Edge direction: prerequisite -> dependent.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for name in self.tasks.keys() {
            graph.add_node(name.as_str());
        }
        for task in self.tasks.values() {
            for dep in task.prerequisites() {
                graph.add_edge(dep.as_str(), task.name(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(SitebuildError::DependencyCycle(format!(
                "cycle in task prerequisites involving task '{}'",
                cycle.node_id()
            ))),
        }
    }

    /// Expand `name` into the order its bodies run in.
    ///
    /// Prerequisites come first, depth-first, in listed order; the
    /// requested task is last. A task reachable along several paths appears
    /// once per path.
    pub fn plan(&self, name: &str) -> Result<Vec<PlanStep>> {
        let mut steps = Vec::new();
        let mut stack = Vec::new();
        self.expand(name, 0, &mut stack, &mut steps)?;
        Ok(steps)
    }

    fn expand<'a>(
        &'a self,
        name: &'a str,
        depth: usize,
        stack: &mut Vec<&'a str>,
        steps: &mut Vec<PlanStep>,
    ) -> Result<()> {
        let task = self
            .get(name)
            .ok_or_else(|| SitebuildError::UnknownTask(name.to_string()))?;

        if let Some(pos) = stack.iter().position(|s| *s == name) {
            let mut path: Vec<&str> = stack[pos..].to_vec();
            path.push(name);
            return Err(SitebuildError::DependencyCycle(path.join(" -> ")));
        }

        stack.push(task.name());
        let first_prerequisite = steps.len();
        for dep in task.prerequisites() {
            self.expand(dep, depth + 1, stack, steps)?;
        }
        stack.pop();

        steps.push(PlanStep {
            task: name.to_string(),
            depth,
            first_prerequisite,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(reg: &mut TaskRegistry, name: &str, after: &[&str]) {
        reg.register(TaskSpec::new(name).after(after.iter().copied()), |_| async { Ok(()) })
            .unwrap();
    }

    fn order(steps: &[PlanStep]) -> Vec<&str> {
        steps.iter().map(|s| s.task.as_str()).collect()
    }

    #[test]
    fn plan_runs_prerequisites_in_listed_order() {
        let mut reg = TaskRegistry::new();
        noop(&mut reg, "clean-css", &[]);
        noop(&mut reg, "sass", &[]);
        noop(&mut reg, "css", &["clean-css", "sass"]);

        let steps = reg.plan("css").unwrap();
        assert_eq!(order(&steps), vec!["clean-css", "sass", "css"]);
        assert_eq!(steps[2].first_prerequisite, 0);
        assert_eq!(steps[2].depth, 0);
        assert_eq!(steps[0].depth, 1);
    }

    #[test]
    fn shared_prerequisites_are_not_deduplicated() {
        let mut reg = TaskRegistry::new();
        noop(&mut reg, "base", &[]);
        noop(&mut reg, "a", &["base"]);
        noop(&mut reg, "b", &["base"]);
        noop(&mut reg, "all", &["a", "b"]);

        let steps = reg.plan("all").unwrap();
        assert_eq!(order(&steps), vec!["base", "a", "base", "b", "all"]);
        assert_eq!(steps[3].first_prerequisite, 2);
    }

    #[test]
    fn unknown_names_are_reported() {
        let mut reg = TaskRegistry::new();
        noop(&mut reg, "css", &["sass"]);

        assert!(matches!(reg.plan("nope"), Err(SitebuildError::UnknownTask(n)) if n == "nope"));
        assert!(matches!(reg.plan("css"), Err(SitebuildError::UnknownTask(n)) if n == "sass"));
        assert!(matches!(reg.validate(), Err(SitebuildError::Config(_))));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut reg = TaskRegistry::new();
        noop(&mut reg, "a", &["b"]);
        noop(&mut reg, "b", &["a"]);

        assert!(matches!(reg.validate(), Err(SitebuildError::DependencyCycle(_))));
        match reg.plan("a") {
            Err(SitebuildError::DependencyCycle(path)) => assert_eq!(path, "a -> b -> a"),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut reg = TaskRegistry::new();
        noop(&mut reg, "js", &[]);
        let err = reg
            .register(TaskSpec::new("js"), |_| async { Ok(()) })
            .unwrap_err();
        assert!(matches!(err, SitebuildError::Config(_)));
        assert_eq!(reg.len(), 1);
    }
}

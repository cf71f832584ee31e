// src/dag/listing.rs

//! Discoverable task listing, grouped the way `gulp-task-listing` does it.

use std::fmt;

use crate::dag::graph::TaskRegistry;

const RULE: &str = "------------------------------";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub description: Option<String>,
}

/// Every registered task, split into main tasks and sub tasks, sorted by
/// name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListing {
    main: Vec<ListingEntry>,
    sub: Vec<ListingEntry>,
}

/// Names with `-`, `_` or `:` are building blocks of other tasks.
pub fn is_sub_task(name: &str) -> bool {
    name.contains(['-', '_', ':'])
}

impl TaskListing {
    pub fn from_registry(registry: &TaskRegistry) -> Self {
        let mut main = Vec::new();
        let mut sub = Vec::new();

        for task in registry.iter() {
            let entry = ListingEntry {
                name: task.name().to_string(),
                description: task.description().map(str::to_string),
            };
            if is_sub_task(&entry.name) {
                sub.push(entry);
            } else {
                main.push(entry);
            }
        }

        main.sort_by(|a, b| a.name.cmp(&b.name));
        sub.sort_by(|a, b| a.name.cmp(&b.name));
        Self { main, sub }
    }

    pub fn main_tasks(&self) -> &[ListingEntry] {
        &self.main
    }

    pub fn sub_tasks(&self) -> &[ListingEntry] {
        &self.sub
    }

    /// Every listed name, main tasks first.
    pub fn names(&self) -> Vec<&str> {
        self.main
            .iter()
            .chain(&self.sub)
            .map(|e| e.name.as_str())
            .collect()
    }

    fn width(&self) -> usize {
        self.main
            .iter()
            .chain(&self.sub)
            .map(|e| e.name.len())
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for TaskListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.width();
        for (title, entries) in [("Main Tasks", &self.main), ("Sub Tasks", &self.sub)] {
            writeln!(f)?;
            writeln!(f, "{title}")?;
            writeln!(f, "{RULE}")?;
            for entry in entries {
                match &entry.description {
                    Some(desc) => writeln!(f, "    {:<width$}  {}", entry.name, desc)?,
                    None => writeln!(f, "    {}", entry.name)?,
                }
            }
        }
        writeln!(f)
    }
}

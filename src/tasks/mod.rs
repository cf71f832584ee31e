// src/tasks/mod.rs

//! The site's named tasks.
//!
//! | task        | runs after             | does                                   |
//! |-------------|------------------------|----------------------------------------|
//! | `clean-css` |                        | delete generated stylesheets           |
//! | `sass`      |                        | Sass → prefixed CSS in `css/`          |
//! | `css`       | `clean-css`, `sass`    | combine + minify into `all.min.css`    |
//! | `uncss`     |                        | strip unused Bootstrap rules           |
//! | `js`        |                        | combine + minify into `all.min.js`     |
//! | `critical`  |                        | above-the-fold CSS for the home page   |
//! | `imagemin`  |                        | optimize images into `img/`            |
//! | `watch`     |                        | rebuild on change                      |
//! | `phantomas` |                        | HTTP request budget check              |
//! | `help`      |                        | list tasks                             |
//! | `default`   | `help`                 |                                        |

pub mod context;
pub mod critical;
pub mod images;
pub mod perf;
pub mod scripts;
pub mod styles;
pub mod watch;

pub use context::TaskContext;

use crate::config::ConfigFile;
use crate::dag::{TaskListing, TaskRegistry, TaskSpec};
use crate::errors::{Result, SitebuildError};

pub const CLEAN_CSS: &str = "clean-css";
pub const SASS: &str = "sass";
pub const CSS: &str = "css";
pub const UNCSS: &str = "uncss";
pub const JS: &str = "js";
pub const CRITICAL: &str = "critical";
pub const IMAGEMIN: &str = "imagemin";
pub const WATCH: &str = "watch";
pub const PHANTOMAS: &str = "phantomas";
pub const HELP: &str = "help";
pub const DEFAULT: &str = "default";

/// Every built-in task name.
pub const ALL_TASKS: [&str; 11] = [
    CLEAN_CSS, SASS, CSS, UNCSS, JS, CRITICAL, IMAGEMIN, WATCH, PHANTOMAS, HELP, DEFAULT,
];

pub fn register_site_tasks(registry: &mut TaskRegistry) -> Result<()> {
    registry.register(
        TaskSpec::new(CLEAN_CSS).description("Delete generated stylesheets from css/"),
        styles::clean_css,
    )?;
    registry.register(
        TaskSpec::new(SASS).description("Compile Sass and add vendor prefixes"),
        styles::sass,
    )?;
    registry.register(
        TaskSpec::new(CSS)
            .after([CLEAN_CSS, SASS])
            .description("Combine and minify all stylesheets"),
        styles::css,
    )?;
    registry.register(
        TaskSpec::new(UNCSS).description("Strip unused Bootstrap rules (needs local server)"),
        styles::uncss,
    )?;
    registry.register(
        TaskSpec::new(JS).description("Combine and minify scripts"),
        scripts::js,
    )?;
    registry.register(
        TaskSpec::new(CRITICAL).description("Generate critical-path CSS for the home page"),
        critical::critical,
    )?;
    registry.register(
        TaskSpec::new(IMAGEMIN).description("Optimize images"),
        images::imagemin,
    )?;
    registry.register(
        TaskSpec::new(WATCH).description("Rebuild when sources change"),
        watch::watch,
    )?;
    registry.register(
        TaskSpec::new(PHANTOMAS).description("Check the HTTP request budget (needs local server)"),
        perf::phantomas,
    )?;
    registry.register(TaskSpec::new(HELP).description("List available tasks"), help)?;
    registry.register(TaskSpec::new(DEFAULT).after([HELP]), |_| async { Ok(()) })?;
    Ok(())
}

/// Register the site tasks and check the result against `config`.
///
/// Fails before any work starts if prerequisites are missing or cyclic, or
/// if a `[[watch]]` binding names a task that does not exist.
pub fn build_registry(config: &ConfigFile) -> Result<TaskRegistry> {
    let mut registry = TaskRegistry::new();
    register_site_tasks(&mut registry)?;
    registry.validate()?;

    for binding in config.watch_bindings() {
        if !registry.contains(&binding.task) {
            return Err(SitebuildError::Config(format!(
                "watch binding for {:?} names unknown task '{}'",
                binding.patterns, binding.task
            )));
        }
    }
    Ok(registry)
}

/// Print the task listing on stdout.
pub async fn help(ctx: TaskContext) -> Result<()> {
    print!("{}", TaskListing::from_registry(ctx.registry()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RawConfigFile, WatchBindingConfig};

    #[test]
    fn registers_every_site_task() {
        let registry = build_registry(&ConfigFile::try_from(RawConfigFile::default()).unwrap())
            .unwrap();
        let mut expected = ALL_TASKS.to_vec();
        expected.sort_unstable();
        assert_eq!(registry.names(), expected);
        assert_eq!(
            registry.prerequisites_of(CSS).unwrap(),
            &[CLEAN_CSS.to_string(), SASS.to_string()]
        );
        assert_eq!(registry.prerequisites_of(DEFAULT).unwrap(), &[HELP.to_string()]);
    }

    #[test]
    fn watch_binding_to_unknown_task_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.watch = vec![WatchBindingConfig::new(&["_sass/**/*.scss"], "styles")];
        let cfg = ConfigFile::try_from(raw).unwrap();

        let err = build_registry(&cfg).unwrap_err();
        assert!(err.to_string().contains("'styles'"));
    }
}

// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::types::{SassStyle, TaskName, Viewport};

/// Top-level configuration as read from `Sitebuild.toml`.
///
/// ```toml
/// [paths]
/// css_dir = "css"
///
/// [perf]
/// request_limit = 5
///
/// [[watch]]
/// patterns = ["_sass/**/*.scss"]
/// task = "css"
/// ```
///
/// Every section is optional; the defaults describe the site layout the tool
/// was written for (`_sass/`, `_js/`, `_img/`, a Jekyll `_site/`, and a local
/// preview server on port 4000).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub clean: CleanSection,
    #[serde(default)]
    pub sass: SassSection,
    #[serde(default)]
    pub autoprefixer: AutoprefixerSection,
    #[serde(default)]
    pub css: CssSection,
    #[serde(default)]
    pub js: JsSection,
    #[serde(default)]
    pub uncss: UncssSection,
    #[serde(default)]
    pub critical: CriticalSection,
    #[serde(default)]
    pub images: ImagesSection,
    #[serde(default)]
    pub perf: PerfSection,
    #[serde(default = "default_watch_bindings")]
    pub watch: Vec<WatchBindingConfig>,
}

impl Default for RawConfigFile {
    fn default() -> Self {
        Self {
            paths: PathsSection::default(),
            clean: CleanSection::default(),
            sass: SassSection::default(),
            autoprefixer: AutoprefixerSection::default(),
            css: CssSection::default(),
            js: JsSection::default(),
            uncss: UncssSection::default(),
            critical: CriticalSection::default(),
            images: ImagesSection::default(),
            perf: PerfSection::default(),
            watch: default_watch_bindings(),
        }
    }
}

/// Validated configuration.
///
/// Construct through `ConfigFile::try_from(raw)` (see `validate.rs`) or the
/// loader; the fields cannot be mutated afterwards except for the directory
/// the project root is resolved against.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    raw: RawConfigFile,
    base_dir: PathBuf,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            raw,
            base_dir: PathBuf::from("."),
        }
    }

    /// Resolve `paths.root` against `dir` (usually the config file's
    /// directory).
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Project root every configured path is relative to.
    ///
    /// `.` segments are dropped, so the default config yields `.` and
    /// `./css` rather than `./.` and `././css`.
    pub fn root(&self) -> PathBuf {
        let root: PathBuf = self
            .base_dir
            .join(&self.raw.paths.root)
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        if root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            root
        }
    }

    /// Absolute-or-root-relative location of a configured path.
    pub fn project_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root().join(rel)
    }

    pub fn paths(&self) -> &PathsSection {
        &self.raw.paths
    }

    pub fn clean(&self) -> &CleanSection {
        &self.raw.clean
    }

    pub fn sass(&self) -> &SassSection {
        &self.raw.sass
    }

    pub fn autoprefixer(&self) -> &AutoprefixerSection {
        &self.raw.autoprefixer
    }

    pub fn css(&self) -> &CssSection {
        &self.raw.css
    }

    pub fn js(&self) -> &JsSection {
        &self.raw.js
    }

    pub fn uncss(&self) -> &UncssSection {
        &self.raw.uncss
    }

    pub fn critical(&self) -> &CriticalSection {
        &self.raw.critical
    }

    pub fn images(&self) -> &ImagesSection {
        &self.raw.images
    }

    pub fn perf(&self) -> &PerfSection {
        &self.raw.perf
    }

    pub fn watch_bindings(&self) -> &[WatchBindingConfig] {
        &self.raw.watch
    }
}

/// `[paths]`: where sources live and where outputs go.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsSection {
    pub root: PathBuf,
    pub sass_sources: Vec<String>,
    pub js_sources: Vec<String>,
    pub image_sources: Vec<String>,
    pub css_dir: PathBuf,
    pub js_dir: PathBuf,
    pub img_dir: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            sass_sources: vec!["_sass/**/*.scss".to_string()],
            js_sources: vec!["_js/**/*.js".to_string()],
            image_sources: vec!["_img/**/*".to_string()],
            css_dir: PathBuf::from("css"),
            js_dir: PathBuf::from("js"),
            img_dir: PathBuf::from("img"),
        }
    }
}

/// `[clean]`: file-name globs removed from `css_dir` before a rebuild.
///
/// Only generated stylesheets are listed; vendor files placed in the same
/// directory by `uncss` must survive.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanSection {
    pub patterns: Vec<String>,
}

impl Default for CleanSection {
    fn default() -> Self {
        Self {
            patterns: vec!["{all,main}*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SassSection {
    pub style: SassStyle,
    /// Extra directories searched by `@import`/`@use`, relative to the root.
    pub load_paths: Vec<PathBuf>,
    /// Skip `_partial.scss` files; they only exist to be imported.
    pub skip_partials: bool,
}

impl Default for SassSection {
    fn default() -> Self {
        Self {
            style: SassStyle::Expanded,
            load_paths: vec![PathBuf::from("_sass")],
            skip_partials: true,
        }
    }
}

/// `[autoprefixer]`: browserslist queries used for vendor prefixes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutoprefixerSection {
    pub browsers: Vec<String>,
}

impl Default for AutoprefixerSection {
    fn default() -> Self {
        Self {
            browsers: vec!["last 2 versions".to_string(), "> 1%".to_string()],
        }
    }
}

/// `[css]`: the combine-and-minify step.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CssSection {
    pub sources: Vec<String>,
    pub bundle: String,
}

impl Default for CssSection {
    fn default() -> Self {
        Self {
            sources: vec!["css/*.css".to_string()],
            bundle: "all.min.css".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JsSection {
    pub bundle: String,
}

impl Default for JsSection {
    fn default() -> Self {
        Self {
            bundle: "all.min.js".to_string(),
        }
    }
}

/// An external program plus its argument template.
///
/// Templates may contain `{input}` and `{output}` placeholders, filled in per
/// file by the stage that runs the tool. Image optimizers also get `{dir}`,
/// the scratch directory that `files` are written into before each run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// File name → contents, e.g. a config file the tool is pointed at.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

impl ToolCommand {
    pub fn new<S: Into<String>>(program: S, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            files: BTreeMap::new(),
        }
    }

    pub fn with_file(mut self, name: &str, contents: &str) -> Self {
        self.files.insert(name.to_string(), contents.to_string());
        self
    }
}

/// `[uncss]`: strip Bootstrap rules the rendered pages never use.
///
/// The pages are fetched from a running preview server; this tool never
/// starts one.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UncssSection {
    pub stylesheets: Vec<String>,
    pub pages: Vec<String>,
    pub program: String,
    /// Arguments placed before the page URLs; `{input}` is the stylesheet.
    pub args: Vec<String>,
}

impl Default for UncssSection {
    fn default() -> Self {
        Self {
            stylesheets: vec![
                "node_modules/bootstrap/dist/css/bootstrap.css".to_string(),
                "node_modules/bootstrap/dist/css/bootstrap-theme.css".to_string(),
            ],
            pages: vec![
                "http://localhost:4000/".to_string(),
                "http://localhost:4000/audit/".to_string(),
                "http://localhost:4000/foundation/".to_string(),
                "http://localhost:4000/budgets/".to_string(),
            ],
            program: "./node_modules/.bin/uncss".to_string(),
            args: vec!["--stylesheets".to_string(), "file://{input}".to_string()],
        }
    }
}

/// `[critical]`: above-the-fold CSS for the home page, inlined by the site
/// templates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CriticalSection {
    pub program: String,
    pub base: PathBuf,
    pub src: String,
    pub css: Vec<String>,
    pub dimensions: Vec<Viewport>,
    /// Output path, relative to `base`.
    pub target: String,
    pub minify: bool,
}

impl Default for CriticalSection {
    fn default() -> Self {
        Self {
            program: "./node_modules/.bin/critical".to_string(),
            base: PathBuf::from("_site/"),
            src: "index.html".to_string(),
            css: vec!["css/all.min.css".to_string()],
            dimensions: vec![
                Viewport::new(320, 480),
                Viewport::new(768, 1024),
                Viewport::new(1280, 960),
            ],
            target: "../_includes/critical.css".to_string(),
            minify: true,
        }
    }
}

/// svgo's `preset-default` drops `viewBox`, which breaks responsive SVGs.
const SVGO_CONFIG: &str = "module.exports = {
  plugins: [
    { name: 'preset-default', params: { overrides: { removeViewBox: false } } },
  ],
};
";

/// `[images]`: optimizer per lowercase file extension. Files with no entry
/// are copied unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesSection {
    pub optimizers: BTreeMap<String, ToolCommand>,
}

impl Default for ImagesSection {
    fn default() -> Self {
        let jpeg = ToolCommand::new(
            "jpegtran",
            &["-copy", "none", "-optimize", "-progressive", "-outfile", "{output}", "{input}"],
        );

        let mut optimizers = BTreeMap::new();
        optimizers.insert("jpg".to_string(), jpeg.clone());
        optimizers.insert("jpeg".to_string(), jpeg);
        optimizers.insert(
            "png".to_string(),
            ToolCommand::new("optipng", &["-quiet", "-o2", "-out", "{output}", "{input}"]),
        );
        optimizers.insert(
            "gif".to_string(),
            ToolCommand::new("gifsicle", &["-O2", "-o", "{output}", "{input}"]),
        );
        optimizers.insert(
            "svg".to_string(),
            ToolCommand::new(
                "svgo",
                &["--config", "{dir}/svgo.config.js", "-i", "{input}", "-o", "{output}"],
            )
            .with_file("svgo.config.js", SVGO_CONFIG),
        );

        Self { optimizers }
    }
}

/// `[perf]`: request-count budget checked by phantomas.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PerfSection {
    pub program: String,
    pub url: String,
    pub request_limit: u32,
    /// Fail the `phantomas` task (and the process) when the budget is blown
    /// or the check itself breaks. `false` only logs the outcome.
    pub propagate_failure: bool,
}

impl Default for PerfSection {
    fn default() -> Self {
        Self {
            program: "./node_modules/.bin/phantomas".to_string(),
            url: "http://localhost:4000".to_string(),
            request_limit: 5,
            propagate_failure: true,
        }
    }
}

/// `[[watch]]`: re-run `task` whenever a file matching `patterns` changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchBindingConfig {
    pub patterns: Vec<String>,
    pub task: TaskName,
}

impl WatchBindingConfig {
    pub fn new(patterns: &[&str], task: &str) -> Self {
        Self {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            task: task.to_string(),
        }
    }
}

/// Bindings point at the composite tasks, so a Sass edit rebuilds the whole
/// stylesheet bundle rather than racing a separate combine step.
pub fn default_watch_bindings() -> Vec<WatchBindingConfig> {
    vec![
        WatchBindingConfig::new(&["_sass/**/*.scss"], "css"),
        WatchBindingConfig::new(&["_js/**/*.js"], "js"),
        WatchBindingConfig::new(&["_img/**/*"], "imagemin"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_has_no_redundant_dots() {
        let cfg = ConfigFile::new_unchecked(RawConfigFile::default());
        assert_eq!(cfg.root(), PathBuf::from("."));
        assert_eq!(cfg.project_path("css"), PathBuf::from("./css"));
    }

    #[test]
    fn default_svgo_keeps_view_box() {
        let images = ImagesSection::default();
        let svg = &images.optimizers["svg"];

        assert_eq!(svg.program, "svgo");
        assert_eq!(&svg.args[..2], ["--config", "{dir}/svgo.config.js"]);
        let config = &svg.files["svgo.config.js"];
        assert!(config.contains("preset-default"));
        assert!(config.contains("removeViewBox: false"));
    }

    #[test]
    fn root_resolves_against_base_dir() {
        let mut raw = RawConfigFile::default();
        raw.paths.root = PathBuf::from("site");
        let cfg = ConfigFile::new_unchecked(raw).with_base_dir("/srv/project");
        assert_eq!(cfg.project_path("js"), PathBuf::from("/srv/project/site/js"));
    }
}

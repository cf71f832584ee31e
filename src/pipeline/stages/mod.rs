// src/pipeline/stages/mod.rs

//! The concrete pipeline stages.

pub mod concat;
pub mod css;
pub mod external;
pub mod images;
pub mod minify_js;
pub mod sass;

pub use concat::ConcatStage;
pub use css::{AutoprefixStage, MinifyCssStage};
pub use external::ExternalFilterStage;
pub use images::ImageOptimizeStage;
pub use minify_js::MinifyJsStage;
pub use sass::SassStage;

/// Substitute `{input}` and `{output}` in a tool argument.
pub(crate) fn fill_template(arg: &str, input: &str, output: &str) -> String {
    arg.replace("{input}", input).replace("{output}", output)
}

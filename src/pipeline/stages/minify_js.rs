// src/pipeline/stages/minify_js.rs

//! JavaScript minification: parse with `swc_ecma_parser`, print with the
//! minifying code generator.

use swc_common::sync::Lrc;
use swc_common::{FileName, SourceMap, Spanned};
use swc_ecma_ast::EsVersion;
use swc_ecma_codegen::text_writer::JsWriter;
use swc_ecma_codegen::{Config as CodegenConfig, Emitter};
use swc_ecma_parser::{parse_file_as_program, EsSyntax, Syntax};
use tracing::debug;

use crate::errors::{Result, SitebuildError};
use crate::pipeline::record::FileSet;
use crate::pipeline::stage::Stage;
use crate::types::BoxFuture;

#[derive(Debug, Clone, Default)]
pub struct MinifyJsStage;

impl MinifyJsStage {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for MinifyJsStage {
    fn name(&self) -> &str {
        "minify-js"
    }

    fn apply(&self, files: FileSet) -> BoxFuture<'_, Result<FileSet>> {
        Box::pin(async move {
            files
                .into_iter()
                .map(|record| {
                    let path = record.display_path();
                    let code = minify_js(record.text(self.name())?, &path)?;
                    debug!(path = %path, bytes = code.len(), "minified script");
                    Ok(record.with_contents(code))
                })
                .collect()
        })
    }
}

/// Minify one script. Syntax errors come back as
/// [`SitebuildError::Compile`] with the 1-based line.
pub fn minify_js(code: &str, file: &str) -> Result<String> {
    let source_map: Lrc<SourceMap> = Lrc::default();
    let source_file =
        source_map.new_source_file(Lrc::new(FileName::Custom(file.to_owned())), code.to_owned());

    let mut recovered = vec![];
    let program = parse_file_as_program(
        &source_file,
        Syntax::Es(EsSyntax::default()),
        EsVersion::Es2022,
        None,
        &mut recovered,
    )
    .map_err(|err| SitebuildError::Compile {
        file: file.to_owned(),
        line: source_map.lookup_char_pos(err.span().lo).line,
        message: err.kind().msg().into_owned(),
    })?;

    if !recovered.is_empty() {
        debug!(file, "recoverable parse errors: {:?}", recovered);
    }

    let mut buf = vec![];
    {
        let writer = JsWriter::new(Lrc::clone(&source_map), "\n", &mut buf, None);
        let mut emitter = Emitter {
            cfg: CodegenConfig::default()
                .with_minify(true)
                .with_target(EsVersion::Es2022),
            cm: Lrc::clone(&source_map),
            comments: None,
            wr: writer,
        };

        emitter
            .emit_program(&program)
            .map_err(|e| SitebuildError::stage("minify-js", format!("{file}: {e}")))?;
    }

    String::from_utf8(buf).map_err(|e| {
        SitebuildError::stage("minify-js", format!("{file}: invalid UTF-8 output: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_whitespace_and_comments() {
        let src = "// greeting\nfunction hello( name ) {\n    return 'hi ' + name;\n}\n";
        let out = minify_js(src, "_js/hello.js").unwrap();

        assert!(!out.contains("greeting"));
        assert!(!out.contains("\n    "));
        assert!(out.contains("function hello(name)"), "got: {out}");
    }

    #[test]
    fn same_input_same_bytes() {
        let src = "var a = 1;\nvar b = a + 2;\nconsole.log(b);\n";
        assert_eq!(minify_js(src, "a.js").unwrap(), minify_js(src, "a.js").unwrap());
    }

    #[test]
    fn syntax_error_reports_line() {
        let err = minify_js("var ok = 1;\nvar = ;\n", "_js/bad.js").unwrap_err();
        match err {
            SitebuildError::Compile { file, line, .. } => {
                assert_eq!(file, "_js/bad.js");
                assert_eq!(line, 2);
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }
}

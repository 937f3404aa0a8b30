//! Test utilities shared by the inliner test suites

use html_inline_source::{Asset, AssetMap, Compiler, InlineSourcePlugin, OutputOptions};

/// Route `log` output through the test harness
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build an asset set from `(name, text)` pairs
#[allow(dead_code)]
pub fn text_assets(entries: &[(&str, &str)]) -> AssetMap {
    entries
        .iter()
        .map(|(name, content)| ((*name).to_string(), Asset::text(*content)))
        .collect()
}

/// Compiler writing to `output_path` with the inliner registered
#[allow(dead_code)]
pub fn compiler_with_plugin(output_path: &str, public_path: Option<&str>) -> Compiler {
    init_logging();

    let mut output = OutputOptions::new(output_path);
    if let Some(public_path) = public_path {
        output = output.with_public_path(public_path);
    }

    let mut compiler = Compiler::new(output);
    compiler.apply(InlineSourcePlugin::new());
    compiler
}

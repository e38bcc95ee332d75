//! WASM bindings for the reel ABC notation toolchain.
//!
//! JavaScript/TypeScript entry points to the scanner, parser, analyzer,
//! and formatter via WebAssembly.

use wasm_bindgen::prelude::*;

use reel_formatter::{format_source, FormatOptions};
use reel_parser::parse_source;
use reel_syntax::ParseContext;

/// Tokenize ABC notation source code for syntax highlighting.
///
/// Returns an array of tokens with kind, lexeme, position, and id.
#[wasm_bindgen]
pub fn tokenize(source: &str) -> JsValue {
    let mut ctx = ParseContext::new();
    let tokens = reel_scanner::scan(source, &mut ctx);
    serde_wasm_bindgen::to_value(&tokens).unwrap_or(JsValue::NULL)
}

/// Parse ABC notation source code.
///
/// Returns the file AST.
#[wasm_bindgen]
pub fn parse(source: &str) -> JsValue {
    let mut ctx = ParseContext::new();
    let ast = parse_source(source, &mut ctx);
    serde_wasm_bindgen::to_value(&ast).unwrap_or(JsValue::NULL)
}

/// Parse and analyze; returns the combined issue list of every stage.
#[wasm_bindgen]
pub fn check(source: &str) -> JsValue {
    let mut ctx = ParseContext::new();
    let ast = parse_source(source, &mut ctx);
    let mut issues = ctx.into_issues().into_issues();
    issues.extend(reel_analyzer::analyze(&ast));
    serde_wasm_bindgen::to_value(&issues).unwrap_or(JsValue::NULL)
}

/// Format ABC notation source code with custom options.
#[wasm_bindgen]
pub fn format(source: &str, options_js: JsValue) -> String {
    let options: FormatOptions = match serde_wasm_bindgen::from_value(options_js) {
        Ok(o) => o,
        Err(_) => FormatOptions::default(),
    };
    format_source(source, &options)
}

/// Format ABC notation source code with default options.
#[wasm_bindgen]
pub fn format_default(source: &str) -> String {
    format_source(source, &FormatOptions::default())
}

/// Reprint ABC notation source code verbatim (round-trip check).
#[wasm_bindgen]
pub fn format_passthrough(source: &str) -> String {
    format_source(source, &FormatOptions::passthrough())
}

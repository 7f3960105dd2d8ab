//! WASM bindings for pseudotex
//!
//! This module provides JavaScript-accessible functions for rendering
//! pseudocode. Caption numbering continues across calls, as on a page with
//! several listings, unless `captionCount` is passed.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::{CaptionCounter, Options, PseudotexError};

/// Safely serialize a value to JsValue, returning an error object on failure.
#[cfg(feature = "wasm")]
fn to_js_value<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        let error_obj = RenderResult::failure(format!("Serialization error: {}", e));
        serde_wasm_bindgen::to_value(&error_obj).unwrap_or(JsValue::NULL)
    })
}

/// Render result with additional metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct RenderResult {
    /// Rendered markup, or the tree dump for `parseTree`
    pub output: String,
    /// Whether rendering succeeded
    pub success: bool,
    /// Error message if rendering failed
    pub error: Option<String>,
    /// Warnings during rendering
    pub warnings: Vec<String>,
}

#[cfg(feature = "wasm")]
impl RenderResult {
    fn success(output: String, warnings: Vec<String>) -> Self {
        Self {
            output,
            success: true,
            error: None,
            warnings,
        }
    }

    fn failure(error: String) -> Self {
        Self {
            output: String::new(),
            success: false,
            error: Some(error),
            warnings: vec![],
        }
    }
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn options_from_js(options: JsValue) -> Result<Options, PseudotexError> {
    if options.is_undefined() || options.is_null() {
        return Ok(Options::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| PseudotexError::config(format!("invalid options: {}", e)))
}

#[cfg(feature = "wasm")]
fn render_js(input: Option<String>, options: JsValue) -> Result<String, PseudotexError> {
    let input = crate::require_input(input.as_deref())?;
    let options = options_from_js(options)?
        .resolve()?
        .with_caption_counter(CaptionCounter::global());
    crate::render_to_string(input, &options)
}

/// Render pseudocode to HTML
///
/// # Arguments
/// * `input` - pseudocode source
/// * `options` - optional object with camelCase option keys
///
/// # Returns
/// A `RenderResult` object
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "renderToString")]
pub fn render_to_string_wasm(input: Option<String>, options: JsValue) -> JsValue {
    let result = match render_js(input, options) {
        Ok(html) => RenderResult::success(html, vec![]),
        Err(e) => RenderResult::failure(e.to_string()),
    };
    to_js_value(&result)
}

/// Parse pseudocode and return an indented dump of the parse tree
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "parseTree")]
pub fn parse_tree_wasm(input: Option<String>) -> JsValue {
    let result = crate::require_input(input.as_deref())
        .and_then(crate::parse)
        .map(|doc| doc.to_string());
    let result = match result {
        Ok(tree) => RenderResult::success(tree, vec![]),
        Err(e) => RenderResult::failure(e.to_string()),
    };
    to_js_value(&result)
}

/// Get library version
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

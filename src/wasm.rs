//! WASM bindings for the truss solver
//!
//! Runs the analysis directly in the browser. Requests and responses use the
//! same JSON shapes as the HTTP service.

use wasm_bindgen::prelude::*;

use crate::analysis::{self, AnalysisOptions};
use crate::wire::{ErrorResponse, TrussInput};

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Analyze a truss
///
/// Takes the request JSON and returns either the response JSON or an error
/// body of the form `{"success": false, "kind": ..., "error": ...}`.
#[wasm_bindgen]
pub fn analyze(request_json: &str) -> String {
    analyze_json(request_json, &AnalysisOptions::default())
}

pub(crate) fn analyze_json(request_json: &str, options: &AnalysisOptions) -> String {
    let input = match TrussInput::from_json(request_json) {
        Ok(input) => input,
        Err(e) => return parse_failure(&e),
    };

    let body = match analysis::analyze(&input, options) {
        Ok(result) => serde_json::to_string(&result.to_response()),
        Err(err) => serde_json::to_string(&ErrorResponse::from(&err)),
    };
    body.unwrap_or_else(|e| parse_failure(&e))
}

fn parse_failure(e: &serde_json::Error) -> String {
    serde_json::json!({
        "success": false,
        "kind": "validation",
        "error": format!("Failed to parse request: {e}"),
    })
    .to_string()
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

//! JavaScript Bindings
//!
//! Federated sign-in runs in the page: `index.html` defines
//! `window.todoAuth.googleIdToken()`, which resolves to a Google ID token.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "todoAuth"], js_name = googleIdToken, catch)]
    async fn google_id_token_js() -> Result<JsValue, JsValue>;
}

/// Ask the page for a Google ID token
pub async fn google_id_token() -> Result<String, String> {
    let value = google_id_token_js()
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| format!("{e:?}")))?;
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}

use wasm_bindgen::prelude::*;

use gateway_models_core::filter::{self, FilterState};
use gateway_models_core::format;
use gateway_models_core::model::{self, ModelDescriptor};
use gateway_models_core::provider;
use gateway_models_core::session::{Action, Session};

fn models_from(value: JsValue) -> Option<Vec<ModelDescriptor>> {
    serde_wasm_bindgen::from_value(value).ok()
}

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// Gateway payload
// ---------------------------------------------------------------------------

/// Decode a raw `/models` response body. Returns the model array or null.
#[wasm_bindgen]
pub fn parse_catalog(body: &str) -> JsValue {
    match model::parse_catalog(body.as_bytes()) {
        Ok(models) => to_js(&models),
        Err(_) => JsValue::NULL,
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Filter a model array by `{search_text, selected_provider, free_only}`.
/// Input order is preserved. Returns null on malformed input.
#[wasm_bindgen]
pub fn filter_models(models: JsValue, state: JsValue) -> JsValue {
    let Some(models) = models_from(models) else {
        return JsValue::NULL;
    };
    let state: FilterState = match serde_wasm_bindgen::from_value(state) {
        Ok(s) => s,
        Err(_) => return JsValue::NULL,
    };
    to_js(&filter::filter_catalog(&models, &state))
}

/// Sorted, deduplicated provider slugs.
#[wasm_bindgen]
pub fn unique_providers(models: JsValue) -> JsValue {
    match models_from(models) {
        Some(models) => to_js(&filter::unique_providers(&models)),
        None => JsValue::NULL,
    }
}

#[wasm_bindgen]
pub fn is_free(model: JsValue) -> bool {
    serde_wasm_bindgen::from_value::<ModelDescriptor>(model)
        .map(|m| m.is_free())
        .unwrap_or(false)
}

#[wasm_bindgen]
pub fn derive_provider(model_id: &str) -> String {
    provider::derive_provider(model_id).to_string()
}

/// Badge labels for a model's input modalities, e.g. ["Text", "Image"].
#[wasm_bindgen]
pub fn input_modalities(model: JsValue) -> JsValue {
    match serde_wasm_bindgen::from_value::<ModelDescriptor>(model) {
        Ok(m) => {
            let labels: Vec<&str> = m.input_modalities().iter().map(|md| md.label()).collect();
            to_js(&labels)
        }
        Err(_) => JsValue::NULL,
    }
}

// ---------------------------------------------------------------------------
// View selection
// ---------------------------------------------------------------------------

/// Pick what to render: `{state: "loading" | "error" | "empty" | "models", ...}`.
#[wasm_bindgen]
pub fn view_state(
    models: JsValue,
    state: JsValue,
    loading: bool,
    error: Option<String>,
) -> JsValue {
    let models = models_from(models).unwrap_or_default();
    let state: FilterState = serde_wasm_bindgen::from_value(state).unwrap_or_default();

    let mut session = Session::new(state);
    session.dispatch(Action::FetchSucceeded(models));
    if let Some(message) = error {
        session.dispatch(Action::FetchFailed(message));
    }
    if loading {
        session.dispatch(Action::FetchStarted);
    }
    to_js(&session.view_state())
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Per-token price as "$3.00" per million tokens, or "Free".
#[wasm_bindgen]
pub fn format_price(price: &str) -> String {
    format::format_price(price)
}

/// Token count as "1.0M", "128K" or "500". f64 avoids BigInt on the JS side.
#[wasm_bindgen]
pub fn format_context_length(n: f64) -> String {
    format::format_context_length(n.max(0.0) as u64)
}

#[wasm_bindgen]
pub fn format_provider_name(slug: &str) -> String {
    provider::format_provider_name(slug)
}

//! WebAssembly module for the Part Total Price plugin
//!
//! Provides the renderer entry points the host UI loads by convention:
//! - Part panel
//! - Dashboard item
//! - Plugin settings page
//!
//! Each entry point takes the plugin-rendering context object and returns
//! the rendered view as a JSON string. None of them fail.

use wasm_bindgen::prelude::*;

pub mod render;

pub use render::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str(&format!(
        "{} renderer v{} loaded",
        PLUGIN.name, PLUGIN.version
    )));
}

/// Turn the host's context object into a JSON value; anything unreadable is empty
fn context_value(context: &JsValue) -> serde_json::Value {
    if context.is_undefined() || context.is_null() {
        return serde_json::Value::Null;
    }

    match js_sys::JSON::stringify(context) {
        Ok(json) => parse_context(&String::from(json)),
        Err(_) => {
            web_sys::console::warn_1(&JsValue::from_str(
                "Render context could not be serialized; rendering placeholders",
            ));
            serde_json::Value::Null
        }
    }
}

/// Render the part detail panel
#[wasm_bindgen(js_name = renderPartTotalPricePanel)]
pub fn render_part_total_price_panel(context: JsValue) -> String {
    to_json(&render_panel(&context_value(&context)))
}

/// Render the dashboard item
#[wasm_bindgen(js_name = renderPartTotalPriceDashboardItem)]
pub fn render_part_total_price_dashboard_item(context: JsValue) -> String {
    to_json(&render_dashboard_item(&context_value(&context)))
}

/// Render the plugin settings page
#[wasm_bindgen(js_name = renderPluginSettings)]
pub fn render_plugin_settings(context: JsValue) -> String {
    to_json(&render_settings(&context_value(&context)))
}

/// Format a monetary amount the way the panel does
#[wasm_bindgen]
pub fn format_price(amount: &str, currency: Option<String>) -> String {
    let amount = amount.trim().parse().ok();
    let currency = currency.and_then(|c| CurrencyCode::new(&c).ok());
    format_money(amount, currency.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price("62", Some("usd".into())), "USD 62.00");
        assert_eq!(format_price("12.5", None), "12.50");
        assert_eq!(format_price("abc", Some("USD".into())), PLACEHOLDER);
        assert_eq!(format_price("0", Some("USD".into())), PLACEHOLDER);
    }

    #[test]
    fn test_views_serialize() {
        let json = to_json(&render_panel(&serde_json::Value::Null));
        assert!(json.contains("\"total_price\":\"-\""));

        let json = to_json(&render_dashboard_item(&serde_json::Value::Null));
        assert!(json.contains(PLUGIN.title));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_undefined_context_renders_placeholders() {
        let json = render_part_total_price_panel(JsValue::UNDEFINED);
        assert!(json.contains("\"total_stock\":\"-\""));
    }
}

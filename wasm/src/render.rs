//! Panel rendering
//!
//! Turns the loosely-typed render context into a display-ready view. Every
//! context key is read on its own; a key that is absent or malformed renders
//! the neutral placeholder instead of failing the view.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use shared::{CurrencyCode, NO_LOCATION_KEY, NO_LOCATION_LABEL, PLUGIN};

/// Shown for any missing, zero or unreadable value
pub const PLACEHOLDER: &str = "-";

/// Rendered part panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    /// Shown above the totals
    pub notices: Vec<String>,
    pub total_price: String,
    pub ok_total_price: String,
    pub damaged_total_price: String,
    pub total_stock: String,
    pub ok_stock: String,
    pub damaged_stock: String,
    /// Named locations sorted by path, "no location" last
    pub locations: Vec<LocationRowView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRowView {
    pub name: String,
    pub path: String,
    pub total: String,
    pub ok: String,
    pub damaged: String,
}

/// Rendered dashboard item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub message: String,
}

/// Rendered plugin settings page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsView {
    pub title: String,
    pub version: String,
    pub settings: Vec<SettingRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingRow {
    pub key: String,
    pub value: String,
}

/// Parse a context, treating invalid JSON as an empty context
pub fn parse_context(context_json: &str) -> Value {
    serde_json::from_str(context_json).unwrap_or(Value::Null)
}

/// Read one key, `None` if absent or of the wrong shape
fn field<T: DeserializeOwned>(context: &Value, key: &str) -> Option<T> {
    context
        .get(key)
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// `USD 12.50`, or the placeholder for a missing or zero amount
pub fn format_money(amount: Option<Decimal>, currency: Option<&CurrencyCode>) -> String {
    match amount {
        Some(value) if !value.is_zero() => match currency {
            Some(code) => format!("{} {:.2}", code, value),
            None => format!("{:.2}", value),
        },
        _ => PLACEHOLDER.to_string(),
    }
}

/// Quantity without trailing zeros, or the placeholder for a missing or zero amount
pub fn format_quantity(quantity: Option<Decimal>) -> String {
    match quantity {
        Some(value) if !value.is_zero() => value.normalize().to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn text_or_placeholder(text: Option<String>) -> String {
    text.filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// One location entry read leniently from `locations_data`
#[derive(Debug, Clone)]
struct LocationEntry {
    is_no_location: bool,
    name: Option<String>,
    path: Option<String>,
    total: Option<Decimal>,
    ok: Option<Decimal>,
    damaged: Option<Decimal>,
}

impl LocationEntry {
    fn read(key: &str, value: &Value) -> Self {
        let location_id: Option<i64> = field(value, "location_id");
        Self {
            is_no_location: key == NO_LOCATION_KEY || location_id.is_none(),
            name: field(value, "location_name"),
            path: field(value, "location_path"),
            total: field(value, "total"),
            ok: field(value, "ok"),
            damaged: field(value, "damaged"),
        }
    }

    /// Case-insensitive path, falling back to the name
    fn sort_key(&self) -> String {
        self.path
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(self.name.as_deref())
            .unwrap_or_default()
            .to_lowercase()
    }

    fn into_row(self) -> LocationRowView {
        let fallback_name = if self.is_no_location {
            Some(NO_LOCATION_LABEL.to_string())
        } else {
            None
        };
        let name = self.name.or(fallback_name);
        let path = self
            .path
            .filter(|p| !p.trim().is_empty())
            .or_else(|| name.clone());
        LocationRowView {
            path: text_or_placeholder(path),
            name: text_or_placeholder(name),
            total: format_quantity(self.total),
            ok: format_quantity(self.ok),
            damaged: format_quantity(self.damaged),
        }
    }
}

/// Location rows sorted by path, with the "no location" row last
pub fn location_rows(locations: Option<&Map<String, Value>>) -> Vec<LocationRowView> {
    let mut entries: Vec<LocationEntry> = locations
        .map(|map| {
            map.iter()
                .map(|(key, value)| LocationEntry::read(key, value))
                .collect()
        })
        .unwrap_or_default();

    entries.sort_by_cached_key(|entry| (entry.is_no_location, entry.sort_key()));
    entries.into_iter().map(LocationEntry::into_row).collect()
}

fn mixed_currency_notice(currency: Option<&CurrencyCode>, excluded_items: u32) -> String {
    let mut notice = match currency {
        Some(code) => format!("Mixed currencies: total includes {} items only", code),
        None => "Mixed currencies: total is partial".to_string(),
    };
    if excluded_items > 0 {
        notice.push_str(&format!(" ({} priced items not included)", excluded_items));
    }
    notice
}

/// Render the part panel from its context
pub fn render_panel(context: &Value) -> PanelView {
    let currency: Option<CurrencyCode> = field(context, "currency");
    let mixed: bool = field(context, "mixed_currency").unwrap_or(false);
    let excluded: u32 = field(context, "excluded_items").unwrap_or(0);

    let mut notices = Vec::new();
    if mixed {
        notices.push(mixed_currency_notice(currency.as_ref(), excluded));
    }

    let money = |key: &str| format_money(field(context, key), currency.as_ref());
    let quantity = |key: &str| format_quantity(field(context, key));

    PanelView {
        notices,
        total_price: money("total_price"),
        ok_total_price: money("ok_total_price"),
        damaged_total_price: money("damaged_total_price"),
        total_stock: quantity("total_stock"),
        ok_stock: quantity("ok_stock"),
        damaged_stock: quantity("damaged_stock"),
        locations: location_rows(context.get("locations_data").and_then(Value::as_object)),
    }
}

/// Render the dashboard item; it carries no part data
pub fn render_dashboard_item(_context: &Value) -> DashboardView {
    DashboardView {
        title: PLUGIN.title.to_string(),
        message: "Open a part to see its purchase cost and stock totals.".to_string(),
    }
}

/// Render the plugin settings page
pub fn render_settings(context: &Value) -> SettingsView {
    let mut settings: Vec<SettingRow> = context
        .get("settings")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(key, value)| SettingRow {
                    key: key.clone(),
                    value: match value {
                        Value::String(s) => s.clone(),
                        Value::Null => PLACEHOLDER.to_string(),
                        other => other.to_string(),
                    },
                })
                .collect()
        })
        .unwrap_or_default();
    settings.sort_by(|a, b| a.key.cmp(&b.key));

    SettingsView {
        title: PLUGIN.title.to_string(),
        version: PLUGIN.version.to_string(),
        settings,
    }
}

/// Serialize a view for the JS side
pub fn to_json<T: Serialize>(view: &T) -> String {
    serde_json::to_string(view).unwrap_or_else(|_| "{}".to_string())
}

//! Plugin identity and renderer entry points

use serde::Serialize;

/// Static description of the plugin as registered with the host
#[derive(Debug, Clone, Serialize)]
pub struct PluginMetadata {
    pub title: &'static str,
    pub name: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub author: &'static str,
    pub license: &'static str,
    /// Renderer for the plugin settings page
    pub admin_source: &'static str,
}

pub const PLUGIN: PluginMetadata = PluginMetadata {
    title: "Part Total Price",
    name: "PartTotalPrice",
    slug: "part-total-price",
    description: "Shows purchase cost and stock totals for a part.",
    version: env!("CARGO_PKG_VERSION"),
    author: "Part Total Price Team",
    license: "MIT",
    admin_source: RendererEntry::Settings.entry(),
};

/// Named frontend entry points the host loads by convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererEntry {
    Panel,
    DashboardItem,
    Settings,
}

impl RendererEntry {
    /// `File.js:function` reference as the host expects it
    pub const fn entry(&self) -> &'static str {
        match self {
            RendererEntry::Panel => "Panel.js:renderPartTotalPricePanel",
            RendererEntry::DashboardItem => "Dashboard.js:renderPartTotalPriceDashboardItem",
            RendererEntry::Settings => "Settings.js:renderPluginSettings",
        }
    }

    /// Entry resolved against the host's static URL
    pub fn static_source(&self, static_url: &str) -> String {
        format!(
            "{}/plugins/{}/{}",
            static_url.trim_end_matches('/'),
            PLUGIN.slug,
            self.entry()
        )
    }
}

//! Renderings of an [`InventoryDocument`].
//!
//! The structured form is the machine-readable snapshot (sorted keys, four
//! space indent). The listing is a presentation-only HTML page grouped by
//! category.

use crate::config::toml_config::ListingConfig;
use crate::domain::model::{InventoryDocument, ReportRow};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn to_structured_string(document: &InventoryDocument) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;

    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn from_structured_str(content: &str) -> Result<InventoryDocument> {
    Ok(serde_json::from_str(content)?)
}

/// `<manufacturer> <style> (<size>) $<price minus last two chars> -- Qty: <quantity>`
///
/// Prices are minor-unit strings, so dropping the last two characters leaves
/// whole currency units.
pub fn line_item(row: &ReportRow) -> String {
    let price_chars = row.price.chars().count();
    let major: String = row.price.chars().take(price_chars.saturating_sub(2)).collect();

    format!(
        "{} {} ({}) ${} -- Qty: {}",
        row.manufacturer, row.style, row.size, major, row.quantity
    )
}

/// Category name to rendered line items, each mapped to its source row.
///
/// Both levels are ordered maps, so iteration is already alphabetical and
/// identical line items within a category collapse.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryGroups {
    categories: BTreeMap<String, BTreeMap<String, u64>>,
}

impl CategoryGroups {
    pub fn from_document(document: &InventoryDocument) -> Self {
        let mut groups = Self::default();
        for row in document.inventory() {
            groups
                .categories
                .entry(row.category.clone())
                .or_default()
                .insert(line_item(row), row.row_number);
        }
        groups
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn line_items(&self, category: &str) -> impl Iterator<Item = (&str, u64)> {
        self.categories
            .get(category)
            .into_iter()
            .flat_map(|items| items.iter().map(|(line, row)| (line.as_str(), *row)))
    }

    /// Featured categories first, then the rest minus hidden ones; each pass
    /// in alphabetical order.
    pub fn emission_order<'a>(&'a self, config: &'a ListingConfig) -> Vec<&'a str> {
        let starts_with_any = |name: &str, prefixes: &[String]| {
            prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
        };

        let featured = self
            .category_names()
            .filter(|&name| starts_with_any(name, &config.featured_prefixes));
        let remaining = self.category_names().filter(|&name| {
            !starts_with_any(name, &config.featured_prefixes)
                && !starts_with_any(name, &config.hidden_prefixes)
        });

        featured.chain(remaining).collect()
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attribute(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

/// Renders the categorized HTML listing. Output depends only on the inputs.
pub fn render_listing(document: &InventoryDocument, config: &ListingConfig) -> String {
    let groups = CategoryGroups::from_document(document);
    let mut html = String::new();

    html.push_str("<HTML><HEAD>");
    for stylesheet in &config.stylesheets {
        html.push_str(&format!(
            "<LINK rel=\"stylesheet\" type=\"text/css\" href=\"{}\">",
            escape_attribute(stylesheet)
        ));
    }
    html.push_str("</HEAD>");
    html.push_str(&format!("<TITLE>{}</TITLE>", escape_html(&config.title)));
    html.push_str("<BODY>");
    html.push_str(&format!(
        "<H4>Last Updated - {} </H4>",
        escape_html(document.report_run_date())
    ));

    for category in groups.emission_order(config) {
        html.push_str(&format!("<H1>{}</H1><UL>", escape_html(category)));
        for (line, _row) in groups.line_items(category) {
            html.push_str("<LI>");
            html.push_str(&escape_html(line));
        }
        html.push_str("</UL>");
    }

    html.push_str("</BODY></HTML>");
    html
}

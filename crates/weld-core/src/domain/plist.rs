//! Property-list values and their XML rendering.
//!
//! Synthesized Info.plist dictionaries are modelled as [`PlistValue`] trees
//! and rendered to the XML plist flavour when the info-plist mapper emits
//! its `write_file` side effect.

use indexmap::IndexMap;
use serde::Deserialize;

/// A property-list value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PlistValue {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Array(Vec<PlistValue>),
    Dictionary(IndexMap<String, PlistValue>),
}

impl From<&str> for PlistValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<bool> for PlistValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// Render a dictionary as a complete XML plist document.
///
/// Key order is the dictionary's insertion order; callers that need
/// reproducible output sort before rendering.
pub fn render_xml(dictionary: &IndexMap<String, PlistValue>) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(
        "<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \
         \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
    );
    out.push_str("<plist version=\"1.0\">\n");
    render_dictionary(dictionary, 0, &mut out);
    out.push_str("</plist>\n");
    out
}

fn render_dictionary(dict: &IndexMap<String, PlistValue>, depth: usize, out: &mut String) {
    let pad = "\t".repeat(depth);
    out.push_str(&pad);
    out.push_str("<dict>\n");
    for (key, value) in dict {
        out.push_str(&pad);
        out.push_str(&format!("\t<key>{}</key>\n", escape(key)));
        render_value(value, depth + 1, out);
    }
    out.push_str(&pad);
    out.push_str("</dict>\n");
}

fn render_value(value: &PlistValue, depth: usize, out: &mut String) {
    let pad = "\t".repeat(depth);
    match value {
        PlistValue::Boolean(true) => out.push_str(&format!("{pad}<true/>\n")),
        PlistValue::Boolean(false) => out.push_str(&format!("{pad}<false/>\n")),
        PlistValue::Integer(i) => out.push_str(&format!("{pad}<integer>{i}</integer>\n")),
        PlistValue::Real(r) => out.push_str(&format!("{pad}<real>{r}</real>\n")),
        PlistValue::String(s) => out.push_str(&format!("{pad}<string>{}</string>\n", escape(s))),
        PlistValue::Array(items) => {
            out.push_str(&format!("{pad}<array>\n"));
            for item in items {
                render_value(item, depth + 1, out);
            }
            out.push_str(&format!("{pad}</array>\n"));
        }
        PlistValue::Dictionary(dict) => render_dictionary(dict, depth, out),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

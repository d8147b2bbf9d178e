use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Theme section of a Tailwind config.
///
/// Only `extend` is inspected by the importer. Other sections are kept as raw
/// JSON so unusual shapes still parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailwindTheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl TailwindTheme {
    /// Keys of `theme.extend.<section>`, in document order.
    pub fn extended_keys(&self, section: &str) -> Vec<&str> {
        self.extend
            .as_ref()
            .and_then(|extend| extend.get(section))
            .and_then(Value::as_object)
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// A parsed Tailwind config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TailwindConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<TailwindTheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Best-effort reader for Tailwind config text.
///
/// Accepts plain JSON, or a JavaScript module whose export is a JSON-like
/// object literal (bare or single-quoted keys, single-quoted strings,
/// trailing commas, comments). Anything involving functions, template
/// literals, computed keys or `require(...)` is out of reach and yields
/// `None`.
///
/// # Fields
///
/// - `block_comment`: `/* ... */` comments, non-greedy across lines
/// - `line_comment`: `// ...` to end of line
/// - `module_exports` / `export_default`: capture from the first `{` after
///   the export to the last `}` in the text
/// - `object_key`: optionally quoted identifier followed by `:`
/// - `trailing_comma`: a comma directly before `}` or `]`
pub struct TailwindConfigParser {
    block_comment: Regex,
    line_comment: Regex,
    module_exports: Regex,
    export_default: Regex,
    object_key: Regex,
    trailing_comma: Regex,
}

impl TailwindConfigParser {
    pub fn new() -> Self {
        Self {
            block_comment: Regex::new(r"(?s)/\*.*?\*/").expect("Invalid block comment regex"),
            line_comment: Regex::new(r"//.*").expect("Invalid line comment regex"),
            module_exports: Regex::new(r"(?s)module\.exports\s*=\s*(\{.*\})")
                .expect("Invalid module.exports regex"),
            export_default: Regex::new(r"(?s)export\s+default\s+(\{.*\})")
                .expect("Invalid export default regex"),
            object_key: Regex::new(r#"(['"])?([a-zA-Z0-9_]+)(['"])?:"#)
                .expect("Invalid object key regex"),
            trailing_comma: Regex::new(r",(\s*[}\]])").expect("Invalid trailing comma regex"),
        }
    }

    /// Parse config text, trying strict JSON before the object-literal fallback.
    pub fn parse(&self, config_text: &str) -> Option<TailwindConfig> {
        if let Ok(config) = serde_json::from_str::<TailwindConfig>(config_text) {
            return Some(config);
        }

        let Some(literal) = self.extract_export(config_text) else {
            tracing::warn!("Tailwind config is neither JSON nor a module export");
            return None;
        };

        let json_like = self.to_json_like(&literal);
        match serde_json::from_str::<TailwindConfig>(&json_like) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::error!("Failed to parse Tailwind config: {}", e);
                None
            }
        }
    }

    /// Strip comments and return the object literal after the export, if any.
    fn extract_export(&self, config_text: &str) -> Option<String> {
        let cleaned = self.block_comment.replace_all(config_text, "");
        let cleaned = self.line_comment.replace_all(&cleaned, "");

        self.module_exports
            .captures(&cleaned)
            .or_else(|| self.export_default.captures(&cleaned))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Rewrite a JSON-like object literal into JSON.
    fn to_json_like(&self, literal: &str) -> String {
        let quoted = self.object_key.replace_all(literal, "\"${2}\":");
        let double_quoted = quoted.replace('\'', "\"");
        self.trailing_comma
            .replace_all(&double_quoted, "${1}")
            .into_owned()
    }
}

impl Default for TailwindConfigParser {
    fn default() -> Self {
        Self::new()
    }
}

static PARSER: LazyLock<TailwindConfigParser> = LazyLock::new(TailwindConfigParser::new);

/// Parse Tailwind config text with the shared parser.
pub fn parse_tailwind_config(config_text: &str) -> Option<TailwindConfig> {
    PARSER.parse(config_text)
}

/// Pretty-print a config as JSON with 2-space indentation.
pub fn format_tailwind_config(config: &TailwindConfig) -> String {
    // A struct of maps and JSON values always serializes.
    serde_json::to_string_pretty(config).unwrap_or_default()
}

/// Utility classes generated by the config's `theme.extend` section.
///
/// Each extended color `K` yields `bg-K`, `text-K` and `border-K`; each
/// extended spacing step yields `p-K`, `m-K` and `gap-K`.
pub fn extract_custom_classes(config: &TailwindConfig) -> Vec<String> {
    let Some(theme) = &config.theme else {
        return Vec::new();
    };

    let mut classes = Vec::new();

    for color in theme.extended_keys("colors") {
        classes.push(format!("bg-{}", color));
        classes.push(format!("text-{}", color));
        classes.push(format!("border-{}", color));
    }

    for space in theme.extended_keys("spacing") {
        classes.push(format!("p-{}", space));
        classes.push(format!("m-{}", space));
        classes.push(format!("gap-{}", space));
    }

    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_config() {
        let config =
            parse_tailwind_config(r##"{"theme":{"extend":{"colors":{"brand":"#fff"}}}}"##).unwrap();
        assert_eq!(
            extract_custom_classes(&config),
            vec!["bg-brand", "text-brand", "border-brand"]
        );
    }

    #[test]
    fn test_parse_garbage_returns_none() {
        assert!(parse_tailwind_config("not json and not a module export").is_none());
    }

    #[test]
    fn test_parse_module_exports() {
        let text = r##"
            /** @type {import('tailwindcss').Config} */
            module.exports = {
              theme: {
                extend: {
                  // brand palette
                  colors: { primary: '#1d4ed8', accent: "#f59e0b", },
                },
              },
              plugins: [],
            };
        "##;
        let config = parse_tailwind_config(text).unwrap();
        assert_eq!(
            extract_custom_classes(&config),
            vec![
                "bg-primary",
                "text-primary",
                "border-primary",
                "bg-accent",
                "text-accent",
                "border-accent",
            ]
        );
        assert_eq!(config.plugins, Some(Vec::new()));
    }

    #[test]
    fn test_parse_export_default_with_spacing() {
        let text = "export default { theme: { extend: { spacing: { '72': '18rem', }, }, }, }";
        let config = parse_tailwind_config(text).unwrap();
        assert_eq!(extract_custom_classes(&config), vec!["p-72", "m-72", "gap-72"]);
    }

    #[test]
    fn test_function_valued_config_fails_quietly() {
        let text = "module.exports = { theme: { extend: { colors: ({ theme }) => theme('x') } } }";
        assert!(parse_tailwind_config(text).is_none());
    }

    #[test]
    fn test_extract_without_theme() {
        let config = parse_tailwind_config(r#"{"content":["./index.html"]}"#).unwrap();
        assert!(extract_custom_classes(&config).is_empty());
    }

    #[test]
    fn test_unknown_keys_survive_formatting() {
        let config = parse_tailwind_config(r#"{"darkMode":"class","theme":{"screens":{"sm":"640px"}}}"#)
            .unwrap();
        let formatted = format_tailwind_config(&config);
        assert!(formatted.contains("\"darkMode\": \"class\""));
        assert!(formatted.contains("\"screens\""));
    }
}

//! Startup diagnostics for shaper configuration.
//!
//! Violations are reported as structured [`Diagnostic`] values at startup
//! check time, not as runtime failures: the host gathers them (alongside its
//! own checks) before serving traffic. Each diagnostic carries a stable
//! identifier code, a human message, and a remediation hint.
//!
//! Identifier codes:
//!
//! | Code | Meaning |
//! |------|---------|
//! | `reshape.E001.<field>` | flag is not a pure boolean |
//! | `reshape.E002.<field>` | handler reference is not a valid identifier |
//! | `reshape.E003.excluded_paths` | excluded paths is not a list |
//! | `reshape.E004.excluded_paths` | an excluded path is not a string |
//! | `reshape.E005.excluded_paths` | an excluded path is not slash-bounded |

use crate::config::{is_valid_handler_name, ShaperConfig};

/// A structured startup validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Stable identifier code, e.g. `reshape.E005.excluded_paths`.
    pub id: String,
    /// Human-readable description of the violation.
    pub message: String,
    /// Remediation hint.
    pub hint: String,
}

impl Diagnostic {
    fn new(id: impl Into<String>, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            hint: hint.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.id, self.message, self.hint)
    }
}

/// Checks a parsed configuration, returning *all* violations.
///
/// Unlike [`ShaperConfig::validate`], which fails on the first problem, this
/// collects every diagnostic so the host can report them together at
/// startup.
#[must_use]
pub fn check_config(config: &ShaperConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (field, name) in [
        ("success_handler", &config.success_handler),
        ("error_handler", &config.error_handler),
    ] {
        if !is_valid_handler_name(name) {
            diagnostics.push(Diagnostic::new(
                format!("reshape.E002.{field}"),
                format!("{field} should be a valid handler registry name."),
                format!("Set {field} to a name registered in the handler registry, or leave it empty."),
            ));
        }
    }

    for path in &config.excluded_paths {
        if !(path.starts_with('/') && path.ends_with('/')) {
            diagnostics.push(Diagnostic::new(
                "reshape.E005.excluded_paths",
                format!("The path '{path}' in excluded_paths should start and end with a '/'."),
                "Ensure each path in the list starts and ends with '/'.",
            ));
        }
    }

    diagnostics
}

/// Checks a raw TOML document before deserialization.
///
/// Typed deserialization already rejects wrongly-typed fields, but it stops
/// at the first one; this pass reports every type violation as a diagnostic,
/// including boolean-like values (`"true"`, `1`) that must be genuine
/// booleans.
#[must_use]
pub fn check_toml(document: &toml::Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let Some(table) = document.as_table() else {
        return diagnostics;
    };

    for field in ["debug", "verbose_errors", "error_as_map"] {
        if let Some(value) = table.get(field) {
            if !value.is_bool() {
                diagnostics.push(Diagnostic::new(
                    format!("reshape.E001.{field}"),
                    format!("{field} should be a boolean value."),
                    format!("Set {field} to either true or false."),
                ));
            }
        }
    }

    for field in ["success_handler", "error_handler"] {
        if let Some(value) = table.get(field) {
            if !value.is_str() {
                diagnostics.push(Diagnostic::new(
                    format!("reshape.E002.{field}"),
                    format!("{field} should be a handler registry name string."),
                    format!("Set {field} to a string naming a registered handler."),
                ));
            }
        }
    }

    if let Some(value) = table.get("excluded_paths") {
        match value.as_array() {
            None => diagnostics.push(Diagnostic::new(
                "reshape.E003.excluded_paths",
                "excluded_paths should be a list.",
                "Set excluded_paths to a list of strings, e.g. [\"/admin/\", \"/docs/\"].",
            )),
            Some(items) => {
                if items.iter().any(|item| !item.is_str()) {
                    diagnostics.push(Diagnostic::new(
                        "reshape.E004.excluded_paths",
                        "All items in excluded_paths should be strings.",
                        "Ensure each path is a valid string.",
                    ));
                }
            }
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_diagnostics() {
        assert!(check_config(&ShaperConfig::default()).is_empty());
    }

    #[test]
    fn unbounded_paths_are_all_reported() {
        let config = ShaperConfig::builder()
            .excluded_paths(["/ok/", "admin", "/also-bad"])
            .build();
        let diagnostics = check_config(&config);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| d.id == "reshape.E005.excluded_paths"));
        assert!(diagnostics[0].message.contains("'admin'"));
    }

    #[test]
    fn bad_handler_name_gets_e002() {
        let config = ShaperConfig::builder().success_handler("no spaces!").build();
        let diagnostics = check_config(&config);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, "reshape.E002.success_handler");
    }

    #[test]
    fn boolean_like_values_get_e001() {
        let document: toml::Value = r#"
            debug = "true"
            error_as_map = 1
        "#
        .parse()
        .unwrap();
        let diagnostics = check_toml(&document);
        let ids: Vec<&str> = diagnostics.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["reshape.E001.debug", "reshape.E001.error_as_map"]
        );
    }

    #[test]
    fn non_list_paths_get_e003() {
        let document: toml::Value = r#"excluded_paths = "/admin/""#.parse().unwrap();
        let diagnostics = check_toml(&document);
        assert_eq!(diagnostics[0].id, "reshape.E003.excluded_paths");
    }

    #[test]
    fn non_string_path_items_get_e004() {
        let document: toml::Value = "excluded_paths = [1, 2]".parse().unwrap();
        let diagnostics = check_toml(&document);
        assert_eq!(diagnostics[0].id, "reshape.E004.excluded_paths");
    }

    #[test]
    fn diagnostics_render_id_message_and_hint() {
        let config = ShaperConfig::builder().excluded_paths(["bad"]).build();
        let rendered = check_config(&config)[0].to_string();
        assert!(rendered.starts_with("reshape.E005.excluded_paths:"));
        assert!(rendered.contains("start and end"));
    }
}

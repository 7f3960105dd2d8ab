//! Host-facing options
//!
//! [`Options`] is the loosely typed form hosts hand over (JSON files, the
//! CLI, JavaScript objects). Every field is optional; [`Options::resolve`]
//! validates it into the renderer's [`RenderOptions`].

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use pseudotex_html_backend::RenderOptions;

use crate::utils::error::{PseudotexError, Result};

lazy_static! {
    /// A length in em, e.g. `1.2em` or `.5 em`.
    static ref EM_VALUE: Regex = Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)\s*em$").unwrap();
}

/// Render options as supplied by a host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Block indentation with an `em` suffix
    /// Default: "1.2em"
    pub indent_size: Option<String>,

    /// Default: " // "
    pub comment_delimiter: Option<String>,

    /// Default: false
    pub line_number: Option<bool>,

    /// Default: ":"
    pub line_number_punc: Option<String>,

    /// Suppress `end ...` lines
    /// Default: false
    pub no_end: Option<bool>,

    /// Default: false
    pub scope_lines: Option<bool>,

    /// Reset the caption counter to this value before rendering
    pub caption_count: Option<usize>,

    /// Default: "Algorithm"
    pub title_prefix: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PseudotexError::config(format!("invalid options JSON: {}", e)))
    }

    /// Fields set in `overrides` replace the ones in `self`.
    pub fn merge(self, overrides: Options) -> Self {
        Self {
            indent_size: overrides.indent_size.or(self.indent_size),
            comment_delimiter: overrides.comment_delimiter.or(self.comment_delimiter),
            line_number: overrides.line_number.or(self.line_number),
            line_number_punc: overrides.line_number_punc.or(self.line_number_punc),
            no_end: overrides.no_end.or(self.no_end),
            scope_lines: overrides.scope_lines.or(self.scope_lines),
            caption_count: overrides.caption_count.or(self.caption_count),
            title_prefix: overrides.title_prefix.or(self.title_prefix),
        }
    }

    /// Validates and converts into [`RenderOptions`]; unset fields keep
    /// their defaults. The result carries a fresh caption counter.
    pub fn resolve(&self) -> Result<RenderOptions> {
        let mut options = RenderOptions::default();
        if let Some(indent) = &self.indent_size {
            options.indent_size = parse_em(indent)?;
        }
        if let Some(delimiter) = &self.comment_delimiter {
            options.comment_delimiter = delimiter.clone();
        }
        if let Some(line_number) = self.line_number {
            options.line_number = line_number;
        }
        if let Some(punc) = &self.line_number_punc {
            options.line_number_punc = punc.clone();
        }
        if let Some(no_end) = self.no_end {
            options.no_end = no_end;
        }
        if let Some(scope_lines) = self.scope_lines {
            options.scope_lines = scope_lines;
        }
        options.caption_count = self.caption_count;
        if let Some(prefix) = &self.title_prefix {
            options.title_prefix = prefix.clone();
        }
        Ok(options)
    }
}

/// Parses `<number>em`, ignoring surrounding whitespace.
pub fn parse_em(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    let number = EM_VALUE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok());
    number.ok_or_else(|| {
        PseudotexError::config(format!(
            "Unit error; expected `em` suffix in `{}`",
            value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_em() {
        assert_eq!(parse_em("1.2em").unwrap(), 1.2);
        assert_eq!(parse_em("  2 em ").unwrap(), 2.0);
        assert_eq!(parse_em(".5em").unwrap(), 0.5);
        assert!(parse_em("12px").is_err());
        assert!(parse_em("em").is_err());
        assert!(parse_em("1.2").is_err());
    }

    #[test]
    fn test_bad_unit_is_config_error() {
        let options = Options {
            indent_size: Some("3pt".into()),
            ..Options::default()
        };
        let err = options.resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Unit error; expected `em` suffix in `3pt`"
        );
    }

    #[test]
    fn test_json_camel_case() {
        let options = Options::from_json(
            r#"{"indentSize": "2em", "lineNumber": true, "noEnd": true, "captionCount": 4, "titlePrefix": "Alg."}"#,
        )
        .unwrap();
        let resolved = options.resolve().unwrap();
        assert_eq!(resolved.indent_size, 2.0);
        assert!(resolved.line_number);
        assert!(resolved.no_end);
        assert_eq!(resolved.caption_count, Some(4));
        assert_eq!(resolved.title_prefix, "Alg.");
        assert_eq!(resolved.comment_delimiter, " // ");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Options::from_json("{\"lineNumber\": \"yes\"}"),
            Err(PseudotexError::Config { .. })
        ));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = Options {
            indent_size: Some("2em".into()),
            title_prefix: Some("Procedure".into()),
            ..Options::default()
        };
        let flags = Options {
            indent_size: Some("1em".into()),
            line_number: Some(true),
            ..Options::default()
        };
        let merged = file.merge(flags);
        assert_eq!(merged.indent_size.as_deref(), Some("1em"));
        assert_eq!(merged.title_prefix.as_deref(), Some("Procedure"));
        assert_eq!(merged.line_number, Some(true));
    }
}

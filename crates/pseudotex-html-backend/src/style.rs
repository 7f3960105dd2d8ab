//! Cascading text style: font attributes and relative size.

use std::fmt;

use indexmap::IndexMap;
use phf::phf_map;

/// Font attribute commands, both declarations (`\bfseries`) and commands (`\textbf`).
static FONT_COMMANDS: phf::Map<&'static str, &'static [(&'static str, &'static str)]> = phf_map! {
    // declarations
    "normalfont" => &[("font-family", "KaTeX_Main")],
    "rmfamily" => &[("font-family", "KaTeX_Main")],
    "sffamily" => &[("font-family", "KaTeX_SansSerif")],
    "ttfamily" => &[("font-family", "KaTeX_Typewriter")],
    "bfseries" => &[("font-weight", "bold")],
    "mdseries" => &[("font-weight", "medium")],
    "lfseries" => &[("font-weight", "lighter")],
    "upshape" => &[("font-style", "normal"), ("font-variant", "normal")],
    "itshape" => &[("font-style", "italic"), ("font-variant", "normal")],
    "scshape" => &[("font-style", "normal"), ("font-variant", "small-caps")],
    "slshape" => &[("font-style", "oblique"), ("font-variant", "normal")],
    // commands
    "textnormal" => &[("font-family", "KaTeX_Main")],
    "textrm" => &[("font-family", "KaTeX_Main")],
    "textsf" => &[("font-family", "KaTeX_SansSerif")],
    "texttt" => &[("font-family", "KaTeX_Typewriter")],
    "textbf" => &[("font-weight", "bold")],
    "textmd" => &[("font-weight", "medium")],
    "textlf" => &[("font-weight", "lighter")],
    "textup" => &[("font-style", "normal"), ("font-variant", "normal")],
    "textit" => &[("font-style", "italic"), ("font-variant", "normal")],
    "textsc" => &[("font-style", "normal"), ("font-variant", "small-caps")],
    "textsl" => &[("font-style", "oblique"), ("font-variant", "normal")],
    "uppercase" => &[("text-transform", "uppercase")],
    "lowercase" => &[("text-transform", "lowercase")],
};

/// Named sizes, as scale factors of the normal size.
static SIZING_SCALES: phf::Map<&'static str, f64> = phf_map! {
    "tiny" => 0.68,
    "scriptsize" => 0.80,
    "footnotesize" => 0.85,
    "small" => 0.92,
    "normalsize" => 1.00,
    "large" => 1.17,
    "Large" => 1.41,
    "LARGE" => 1.58,
    "huge" => 1.90,
    "Huge" => 2.28,
};

/// Raised when a command reaches the style model without a table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStyleCommand(pub String);

impl fmt::Display for UnknownStyleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized text-style command '{}'", self.0)
    }
}

impl std::error::Error for UnknownStyleCommand {}

pub fn is_font_command(name: &str) -> bool {
    FONT_COMMANDS.contains_key(name)
}

/// Looks up a size name, exact spelling first.
pub fn sizing_scale(name: &str) -> Option<f64> {
    SIZING_SCALES.get(name).copied().or_else(|| {
        let lower = name.to_ascii_lowercase();
        SIZING_SCALES.get(lower.as_str()).copied()
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    css: IndexMap<&'static str, &'static str>,
    font_size: f64,
    outer_font_size: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl TextStyle {
    /// A style nested inside a scope whose current size is `outer_font_size`.
    pub fn new(outer_font_size: f64) -> Self {
        Self {
            css: IndexMap::new(),
            font_size: outer_font_size,
            outer_font_size,
        }
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn outer_font_size(&self) -> f64 {
        self.outer_font_size
    }

    pub fn set_outer_font_size(&mut self, size: f64) {
        self.outer_font_size = size;
    }

    pub fn update_by_command(&mut self, name: &str) -> Result<(), UnknownStyleCommand> {
        if let Some(attrs) = FONT_COMMANDS.get(name) {
            for &(key, value) in attrs.iter() {
                self.css.insert(key, value);
            }
            return Ok(());
        }
        if let Some(scale) = sizing_scale(name) {
            self.outer_font_size = self.font_size;
            self.font_size = scale;
            return Ok(());
        }
        Err(UnknownStyleCommand(name.to_string()))
    }

    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (key, value) in &self.css {
            css.push_str(key);
            css.push(':');
            css.push_str(value);
            css.push(';');
        }
        if self.font_size != self.outer_font_size {
            css.push_str("font-size:");
            css.push_str(&format_number(self.font_size / self.outer_font_size));
            css.push_str("em;");
        }
        css
    }
}

/// Prints a CSS number with at most four decimals.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_commands_merge() {
        let mut style = TextStyle::default();
        style.update_by_command("bfseries").unwrap();
        style.update_by_command("itshape").unwrap();
        assert_eq!(
            style.to_css(),
            "font-weight:bold;font-style:italic;font-variant:normal;"
        );
    }

    #[test]
    fn test_later_command_overrides_same_attribute() {
        let mut style = TextStyle::default();
        style.update_by_command("textbf").unwrap();
        style.update_by_command("textmd").unwrap();
        assert_eq!(style.to_css(), "font-weight:medium;");
    }

    #[test]
    fn test_size_ratio() {
        let mut style = TextStyle::new(1.0);
        style.update_by_command("Large").unwrap();
        assert_eq!(style.font_size(), 1.41);
        assert_eq!(style.outer_font_size(), 1.0);
        assert_eq!(style.to_css(), "font-size:1.41em;");

        let mut nested = TextStyle::new(style.font_size());
        nested.update_by_command("normalsize").unwrap();
        assert_eq!(nested.to_css(), "font-size:0.7092em;");
    }

    #[test]
    fn test_same_size_emits_nothing() {
        let mut style = TextStyle::new(1.0);
        style.update_by_command("normalsize").unwrap();
        assert_eq!(style.to_css(), "");
    }

    #[test]
    fn test_size_lookup_case() {
        assert_eq!(sizing_scale("LARGE"), Some(1.58));
        assert_eq!(sizing_scale("large"), Some(1.17));
        assert_eq!(sizing_scale("TINY"), Some(0.68));
        assert_eq!(sizing_scale("enormous"), None);
    }

    #[test]
    fn test_unknown_command() {
        let mut style = TextStyle::default();
        assert_eq!(
            style.update_by_command("bogus"),
            Err(UnknownStyleCommand("bogus".to_string()))
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.2), "1.2");
        assert_eq!(format_number(1.2 + 0.6), "1.8");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(0.0), "0");
    }
}

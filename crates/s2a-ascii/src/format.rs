use std::fmt;
use std::str::FromStr;

use s2a_core::grid::ToneGrid;
use serde::Serialize;

/// How a converted sprite is written out.
///
/// # Example
/// ```
/// use s2a_ascii::format::OutputFormat;
/// let f: OutputFormat = "ts".parse().unwrap();
/// assert_eq!(f, OutputFormat::TypeScript);
/// assert_eq!(f.extension(), "ts");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum OutputFormat {
    /// Bare text block.
    #[default]
    Text,
    /// Array literal, one quoted string per row.
    TypeScript,
    /// JSON object with name, size and rows.
    Json,
}

impl OutputFormat {
    /// File extension used for batch output.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::TypeScript => "ts",
            Self::Json => "json",
        }
    }

    /// Human-readable label for console headers.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::TypeScript => "TypeScript",
            Self::Json => "JSON",
        }
    }

    /// Render `grid` in this format. `name` labels the sprite where the
    /// format has room for it.
    #[must_use]
    pub fn format(self, grid: &ToneGrid, name: &str) -> String {
        match self {
            Self::Text => grid.to_text(),
            Self::TypeScript => format_typescript(grid, name),
            Self::Json => format_json(grid, name),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "format inconnu '{other}' (attendu text, typescript ou json)"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::TypeScript => "typescript",
            Self::Json => "json",
        })
    }
}

/// Array literal with a `// name` header, rows single-quoted.
///
/// # Example
/// ```
/// use s2a_core::grid::ToneGrid;
/// use s2a_ascii::format::format_typescript;
///
/// let grid = ToneGrid::from_rows(&["#.", ".O"]).unwrap();
/// assert_eq!(
///     format_typescript(&grid, "shark"),
///     "// shark\n[\n  '#.',\n  '.O',\n]"
/// );
/// ```
#[must_use]
pub fn format_typescript(grid: &ToneGrid, name: &str) -> String {
    let mut out = format!("// {name}\n[\n");
    for row in grid.rows() {
        out.push_str("  '");
        for ch in row.chars() {
            if ch == '\'' || ch == '\\' {
                out.push('\\');
            }
            out.push(ch);
        }
        out.push_str("',\n");
    }
    out.push(']');
    out
}

#[derive(Serialize)]
struct SpriteJson<'a> {
    name: &'a str,
    size: u32,
    rows: Vec<String>,
}

/// Pretty-printed JSON: `{"name", "size", "rows"}`.
///
/// Canvases are square, so `size` is both the row count and the row width.
#[must_use]
pub fn format_json(grid: &ToneGrid, name: &str) -> String {
    let sprite = SpriteJson {
        name,
        size: grid.width,
        rows: grid.rows(),
    };
    // Strings and integers only: serialization cannot fail
    serde_json::to_string_pretty(&sprite).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typescript_escapes_quotes() {
        let grid = ToneGrid::from_rows(&["'\\"]).unwrap();
        assert_eq!(format_typescript(&grid, "q"), "// q\n[\n  '\\'\\\\',\n]");
    }

    #[test]
    fn json_carries_rows() {
        let grid = ToneGrid::from_rows(&["#O", "O#"]).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&format_json(&grid, "fin")).unwrap();
        assert_eq!(value["name"], "fin");
        assert_eq!(value["size"], 2);
        assert_eq!(value["rows"][1], "O#");
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
    }

    #[test]
    fn titles_keep_their_casing() {
        assert_eq!(OutputFormat::TypeScript.title(), "TypeScript");
        assert_eq!(OutputFormat::Json.title(), "JSON");
    }

    #[test]
    fn text_is_plain_block() {
        let grid = ToneGrid::from_rows(&["ab", "cd"]).unwrap();
        assert_eq!(OutputFormat::Text.format(&grid, "x"), "ab\ncd");
    }
}

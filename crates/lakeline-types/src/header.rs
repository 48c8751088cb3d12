//! Metadata headers of transformation units.
//!
//! A transformation unit is UTF-8 text whose leading `-- key: value`
//! comment lines form a header; the first non-comment, non-blank line ends
//! the header and starts the executable body.

use crate::layer::Layer;

/// Parsed header fields of a transformation unit.
///
/// All fields are optional at parse time; callers decide which ones they
/// require. `depends_on` is informational and never drives execution
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformHeader {
    pub name: Option<String>,
    pub layer: Option<Layer>,
    pub description: Option<String>,
    pub depends_on: Vec<String>,
}

/// A transformation unit split into header and executable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformUnit<'a> {
    pub header: TransformHeader,
    /// Everything from the first non-comment, non-blank line onward.
    pub body: &'a str,
}

impl<'a> TransformUnit<'a> {
    /// Split `text` into a parsed header and the remaining body.
    ///
    /// Comment lines that are not `key: value` pairs, and pairs with
    /// unrecognized keys, are skipped without error. A `layer:` value that
    /// is not a known layer name is ignored; the header is advisory.
    #[must_use]
    pub fn parse(text: &'a str) -> Self {
        let mut header = TransformHeader::default();
        let mut body_start = text.len();

        for (offset, line) in line_offsets(text) {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Some(comment) = trimmed.strip_prefix("--") else {
                body_start = offset;
                break;
            };
            let Some((key, value)) = comment.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "name" => header.name = Some(value.to_string()),
                "layer" => header.layer = value.parse().ok(),
                "description" => header.description = Some(value.to_string()),
                "depends_on" => {
                    header.depends_on = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect();
                }
                _ => {}
            }
        }

        Self {
            header,
            body: &text[body_start..],
        }
    }
}

/// Iterate lines together with their byte offset in `text`.
fn line_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0usize, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line.trim_end_matches(['\r', '\n'])))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: &str = "\
-- name: customers_cleaned
-- layer: cleaned
-- description: Clean and standardize customer data
-- depends_on: raw.customers

CREATE OR REPLACE TABLE cleaned.customers_cleaned AS
SELECT * FROM raw.customers;
";

    #[test]
    fn parses_all_recognized_keys() {
        let unit = TransformUnit::parse(UNIT);
        assert_eq!(unit.header.name.as_deref(), Some("customers_cleaned"));
        assert_eq!(unit.header.layer, Some(Layer::Cleaned));
        assert_eq!(
            unit.header.description.as_deref(),
            Some("Clean and standardize customer data")
        );
        assert_eq!(unit.header.depends_on, vec!["raw.customers"]);
    }

    #[test]
    fn body_starts_at_first_non_comment_line() {
        let unit = TransformUnit::parse(UNIT);
        assert!(unit.body.starts_with("CREATE OR REPLACE TABLE"));
        assert!(unit.body.contains("FROM raw.customers"));
    }

    #[test]
    fn header_ends_even_when_comments_follow_body() {
        let text = "-- name: t\nSELECT 1;\n-- layer: curated\n";
        let unit = TransformUnit::parse(text);
        assert_eq!(unit.header.name.as_deref(), Some("t"));
        // Comment after the body must not be parsed as header.
        assert_eq!(unit.header.layer, None);
        assert!(unit.body.starts_with("SELECT 1;"));
    }

    #[test]
    fn depends_on_splits_on_commas() {
        let text = "-- name: t\n-- depends_on: raw.a, raw.b ,raw.c\nSELECT 1;";
        let unit = TransformUnit::parse(text);
        assert_eq!(unit.header.depends_on, vec!["raw.a", "raw.b", "raw.c"]);
    }

    #[test]
    fn unknown_keys_and_plain_comments_are_skipped() {
        let text = "-- just a note\n-- owner: data-team\n-- name: t\nSELECT 1;";
        let unit = TransformUnit::parse(text);
        assert_eq!(unit.header.name.as_deref(), Some("t"));
    }

    #[test]
    fn invalid_layer_value_is_ignored() {
        let text = "-- name: t\n-- layer: gold\nSELECT 1;";
        let unit = TransformUnit::parse(text);
        assert_eq!(unit.header.layer, None);
    }

    #[test]
    fn header_only_text_has_empty_body() {
        let text = "-- name: t\n-- layer: raw\n";
        let unit = TransformUnit::parse(text);
        assert_eq!(unit.header.name.as_deref(), Some("t"));
        assert_eq!(unit.body, "");
    }

    #[test]
    fn value_may_contain_colons() {
        let text = "-- description: ratio: rows to bytes\nSELECT 1;";
        let unit = TransformUnit::parse(text);
        assert_eq!(
            unit.header.description.as_deref(),
            Some("ratio: rows to bytes")
        );
    }
}

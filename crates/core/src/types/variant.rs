//! Composite variant identifiers.
//!
//! Ecwid does not return an id for every option combination of a product,
//! so the storefront synthesizes one: the base product id followed by the
//! ordered `name:value` option pairs, separated by `|`:
//!
//! ```text
//! 123456|Size:Large|Color:Blue
//! ```
//!
//! The same string doubles as the cart line id, and cart mutations parse it
//! back into the option selection Ecwid expects.
//!
//! Option names and values that contain one of the delimiters (`|`, `:`) or
//! the escape character (`%`) are percent-encoded, so parsing never splits
//! inside a value. Ids built from delimiter-free values are unchanged.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const PAIR_SEPARATOR: char = '|';
const NAME_VALUE_SEPARATOR: char = ':';

/// Errors that can occur when parsing a [`VariantId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VariantIdError {
    /// The input string is empty.
    #[error("variant id cannot be empty")]
    Empty,
    /// The leading product id segment is empty.
    #[error("variant id is missing a product id")]
    MissingProductId,
    /// An option segment has no `name:value` separator.
    #[error("malformed option segment: {0}")]
    MalformedOption(String),
    /// A percent-escape did not decode to valid UTF-8.
    #[error("invalid escape in variant id: {0}")]
    InvalidEscape(String),
}

/// A selected option on a variant or cart line (e.g., `Size` = `Large`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Selected value (e.g., "Large").
    pub value: String,
}

impl SelectedOption {
    /// Create a selected option.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for SelectedOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.value)
    }
}

/// Synthetic variant id: base product id plus ordered option selections.
///
/// ```
/// use ecwid_headless_core::{SelectedOption, VariantId};
///
/// let id = VariantId::new(
///     "42",
///     vec![SelectedOption::new("Size", "L"), SelectedOption::new("Color", "Red")],
/// );
/// assert_eq!(id.to_string(), "42|Size:L|Color:Red");
///
/// let parsed = VariantId::parse("42|Size:L|Color:Red").unwrap();
/// assert_eq!(parsed, id);
///
/// assert_eq!(VariantId::parse("42").unwrap().options().len(), 0);
/// assert!(VariantId::parse("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariantId {
    product_id: String,
    options: Vec<SelectedOption>,
}

impl VariantId {
    /// Build an id from a product id and its ordered option selections.
    #[must_use]
    pub fn new(product_id: impl Into<String>, options: Vec<SelectedOption>) -> Self {
        Self {
            product_id: product_id.into(),
            options,
        }
    }

    /// Parse an encoded id.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, has no product id, contains an
    /// option segment without a `:` separator, or an escape that is not UTF-8.
    pub fn parse(s: &str) -> Result<Self, VariantIdError> {
        if s.is_empty() {
            return Err(VariantIdError::Empty);
        }

        let mut segments = s.split(PAIR_SEPARATOR);
        let product_id = segments.next().unwrap_or_default();
        if product_id.is_empty() {
            return Err(VariantIdError::MissingProductId);
        }

        let options = segments
            .map(|segment| {
                let (name, value) = segment
                    .split_once(NAME_VALUE_SEPARATOR)
                    .ok_or_else(|| VariantIdError::MalformedOption(segment.to_string()))?;
                Ok(SelectedOption {
                    name: unescape(name)?,
                    value: unescape(value)?,
                })
            })
            .collect::<Result<Vec<_>, VariantIdError>>()?;

        Ok(Self {
            product_id: product_id.to_string(),
            options,
        })
    }

    /// The base product id.
    #[must_use]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// The ordered option selections.
    #[must_use]
    pub fn options(&self) -> &[SelectedOption] {
        &self.options
    }

    /// Whether this id selects every one of `pairs` (in any order).
    #[must_use]
    pub fn selects_all(&self, pairs: &[SelectedOption]) -> bool {
        pairs.iter().all(|pair| self.options.contains(pair))
    }

    /// The option pairs joined for display: `Size:L, Color:Red`.
    #[must_use]
    pub fn options_label(&self) -> String {
        self.options
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.product_id)?;
        for option in &self.options {
            write!(
                f,
                "{PAIR_SEPARATOR}{}{NAME_VALUE_SEPARATOR}{}",
                escape(&option.name),
                escape(&option.value)
            )?;
        }
        Ok(())
    }
}

impl FromStr for VariantId {
    type Err = VariantIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VariantId {
    type Error = VariantIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VariantId> for String {
    fn from(id: VariantId) -> Self {
        id.to_string()
    }
}

/// Percent-encode the characters that would break segment parsing.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '%' => out.push_str("%25"),
            '|' => out.push_str("%7C"),
            ':' => out.push_str("%3A"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(encoded: &str) -> Result<String, VariantIdError> {
    if !encoded.contains('%') {
        return Ok(encoded.to_string());
    }
    urlencoding::decode(encoded)
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| VariantIdError::InvalidEscape(encoded.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_product_id() {
        let id = VariantId::parse("123456").unwrap();
        assert_eq!(id.product_id(), "123456");
        assert!(id.options().is_empty());
        assert_eq!(id.to_string(), "123456");
    }

    #[test]
    fn test_parse_preserves_option_order() {
        let id = VariantId::parse("7|Color:Blue|Size:M").unwrap();
        assert_eq!(
            id.options(),
            &[
                SelectedOption::new("Color", "Blue"),
                SelectedOption::new("Size", "M")
            ]
        );
    }

    #[test]
    fn test_round_trip() {
        for raw in ["1", "1|A:x", "99|Size:Extra Large|Fit:Slim|Colour:Navy"] {
            assert_eq!(VariantId::parse(raw).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_delimiters_in_values_survive_round_trip() {
        let id = VariantId::new(
            "5",
            vec![
                SelectedOption::new("Ratio", "16:9"),
                SelectedOption::new("Pack", "A|B"),
                SelectedOption::new("Off", "10%"),
            ],
        );
        let encoded = id.to_string();
        assert_eq!(encoded, "5|Ratio:16%3A9|Pack:A%7CB|Off:10%25");
        assert_eq!(VariantId::parse(&encoded).unwrap(), id);
    }

    #[test]
    fn test_value_may_contain_raw_colon_after_first() {
        // Only the first ':' separates name from value.
        let id = VariantId::parse("5|Time:10:30").unwrap();
        assert_eq!(id.options()[0].value, "10:30");
    }

    #[test]
    fn test_errors() {
        assert_eq!(VariantId::parse(""), Err(VariantIdError::Empty));
        assert_eq!(
            VariantId::parse("|Size:L"),
            Err(VariantIdError::MissingProductId)
        );
        assert_eq!(
            VariantId::parse("5|Size"),
            Err(VariantIdError::MalformedOption("Size".to_string()))
        );
    }

    #[test]
    fn test_selects_all_ignores_order() {
        let id = VariantId::parse("5|Size:L|Color:Red|Fit:Slim").unwrap();
        assert!(id.selects_all(&[
            SelectedOption::new("Color", "Red"),
            SelectedOption::new("Size", "L"),
        ]));
        assert!(id.selects_all(&[]));
        assert!(!id.selects_all(&[SelectedOption::new("Size", "S")]));
    }

    #[test]
    fn test_options_label() {
        let id = VariantId::parse("5|Size:L|Color:Red").unwrap();
        assert_eq!(id.options_label(), "Size:L, Color:Red");
    }

    #[test]
    fn test_serde_as_string() {
        let id = VariantId::parse("5|Size:L").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"5|Size:L\"");
        let back: VariantId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

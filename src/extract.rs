//! Field extraction rules.
//!
//! Pure functions turning an identifier string and a spec string into the
//! five catalog columns. Which variant of a rule runs is decided by
//! [`RuleConfig`], never by editing this module.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::config::{ImageCodePolicy, RuleConfig, StyleCodePolicy};

lazy_static! {
    static ref STYLE_SINGLE_REGEX: Regex = Regex::new(r"A([0-9])").unwrap();
    static ref STYLE_RUN_REGEX: Regex = Regex::new(r"A([0-9]+)").unwrap();
    static ref IMAGE_AFTER_DASH_REGEX: Regex = Regex::new(r"^A[0-9]+-([0-9]+)").unwrap();
    static ref IMAGE_PREFIX_REGEX: Regex = Regex::new(r"^(A[0-9]+)-").unwrap();
    static ref IMAGE_LEADING_DIGITS_REGEX: Regex = Regex::new(r"^([0-9]+)[-_]").unwrap();
}

/// The five derived values of one row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DerivedFields {
    pub style_code: String,
    pub color: String,
    pub size: String,
    pub image_code: String,
    pub process_type: String,
}

impl DerivedFields {
    /// Values in output order: style, color, size, image, process.
    pub fn as_array(&self) -> [&str; 5] {
        [
            &self.style_code,
            &self.color,
            &self.size,
            &self.image_code,
            &self.process_type,
        ]
    }
}

/// Data-quality flags raised while deriving a row.
///
/// A note never stops processing; it tells the user which derived values are
/// fallbacks rather than real matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowNote {
    /// Neither identifier column held a value.
    EmptyIdentifier,
    /// No `A<digit>` pattern, the default style code was used.
    StyleCodeDefaulted,
    /// No image-code branch matched, the identifier was copied as is.
    ImageCodeUnparsed,
    /// The spec cell was blank, color and size are empty.
    MissingSpec,
    /// The spec had no `/` or `-` separator, size is empty.
    SizeMissing,
}

impl RowNote {
    pub fn message(&self) -> &'static str {
        match self {
            RowNote::EmptyIdentifier => "identifier is empty",
            RowNote::StyleCodeDefaulted => "no A<digit> pattern, default style code used",
            RowNote::ImageCodeUnparsed => "image code not recognised, identifier copied",
            RowNote::MissingSpec => "spec is empty",
            RowNote::SizeMissing => "spec has no size part",
        }
    }
}

/// Derived values of a row together with the notes raised on the way.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowOutcome {
    pub fields: DerivedFields,
    pub notes: Vec<RowNote>,
}

impl RowOutcome {
    pub fn is_clean(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Replace en-dash, em-dash and fullwidth hyphen-minus with `-`.
pub fn normalize_dashes(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{FF0D}' => '-',
            other => other,
        })
        .collect()
}

/// Find the style code in `id`, or `None` when there is no `A<digit>`.
pub fn match_style_code(id: &str, policy: StyleCodePolicy) -> Option<String> {
    let id = normalize_dashes(id);
    let regex = match policy {
        StyleCodePolicy::SingleDigit => &*STYLE_SINGLE_REGEX,
        StyleCodePolicy::DigitRun => &*STYLE_RUN_REGEX,
    };
    regex
        .captures(&id)
        .and_then(|caps| caps.get(1))
        .map(|digits| format!("A{}", digits.as_str()))
}

/// Style code of `id`, falling back to `rules.default_style_code`.
///
/// # Examples
/// ```
/// use catalog_filler::config::RuleConfig;
/// use catalog_filler::extract::extract_style_code;
///
/// let rules = RuleConfig::default();
/// assert_eq!(extract_style_code("A8250523149R", &rules), "A8");
/// assert_eq!(extract_style_code("no-a-here", &rules), "A2");
/// ```
pub fn extract_style_code(id: &str, rules: &RuleConfig) -> String {
    match_style_code(id, rules.style_code).unwrap_or_else(|| rules.default_style_code.clone())
}

/// Find the image code in `id`, or `None` when no rule applies.
pub fn match_image_code(id: &str, policy: ImageCodePolicy) -> Option<String> {
    let id = normalize_dashes(id);
    match policy {
        ImageCodePolicy::FallbackChain => [
            &*IMAGE_AFTER_DASH_REGEX,
            &*IMAGE_PREFIX_REGEX,
            &*IMAGE_LEADING_DIGITS_REGEX,
        ]
        .iter()
        .find_map(|regex| regex.captures(&id))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()),
        ImageCodePolicy::FirstToken => id.split_whitespace().next().map(str::to_string),
    }
}

/// Image code of `id`; the input is returned unchanged when no rule applies.
///
/// # Examples
/// ```
/// use catalog_filler::config::ImageCodePolicy;
/// use catalog_filler::extract::extract_image_code;
///
/// let chain = ImageCodePolicy::FallbackChain;
/// assert_eq!(extract_image_code("A8-2025001-B", chain), "2025001");
/// assert_eq!(extract_image_code("plainid", chain), "plainid");
/// ```
pub fn extract_image_code(id: &str, policy: ImageCodePolicy) -> String {
    match_image_code(id, policy).unwrap_or_else(|| id.to_string())
}

/// Split a "color/size" descriptor.
///
/// The first `/` wins; without a slash the last `-` is used, because color
/// names may themselves contain hyphens. No separator means the whole
/// string is the color.
pub fn split_color_size(spec: Option<&str>) -> (String, String) {
    let Some(spec) = spec else {
        return (String::new(), String::new());
    };
    let spec = normalize_dashes(spec);
    let spec = spec.trim();

    let parts = spec.split_once('/').or_else(|| spec.rsplit_once('-'));
    match parts {
        Some((color, size)) => (color.trim().to_string(), size.trim().to_string()),
        None => (spec.to_string(), String::new()),
    }
}

/// The constant process label written into every row.
pub fn process_type(rules: &RuleConfig) -> &str {
    &rules.process_label
}

/// Run every rule for one row and collect the notes.
///
/// # Arguments
/// * `identifier` - Identifier chosen by the picker, already trimmed
/// * `spec` - Spec string, `None` when the cell is blank
/// * `rules` - Active rule policies
pub fn derive_fields(identifier: &str, spec: Option<&str>, rules: &RuleConfig) -> RowOutcome {
    let mut notes = Vec::new();

    if identifier.is_empty() {
        notes.push(RowNote::EmptyIdentifier);
    }

    let style_code = match match_style_code(identifier, rules.style_code) {
        Some(code) => code,
        None => {
            notes.push(RowNote::StyleCodeDefaulted);
            rules.default_style_code.clone()
        }
    };

    let image_code = match match_image_code(identifier, rules.image_code) {
        Some(code) => code,
        None => {
            if !identifier.is_empty() {
                notes.push(RowNote::ImageCodeUnparsed);
            }
            identifier.to_string()
        }
    };

    let spec = spec.filter(|s| !s.trim().is_empty());
    let (color, size) = split_color_size(spec);
    if spec.is_none() {
        notes.push(RowNote::MissingSpec);
    } else if size.is_empty() {
        notes.push(RowNote::SizeMissing);
    }

    RowOutcome {
        fields: DerivedFields {
            style_code,
            color,
            size,
            image_code,
            process_type: process_type(rules).to_string(),
        },
        notes,
    }
}

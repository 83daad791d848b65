//! Whole-document conversion between the two wire formats.

use crate::error::{Result, SerdeError};
use helios_fhir::ResourceEnvelope;
use std::fmt;
use std::str::FromStr;

/// A FHIR wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    /// Guesses the format from the first non-whitespace byte after an optional UTF-8
    /// byte order mark: `{` is JSON, `<` is XML.
    pub fn detect(input: &[u8]) -> Option<Format> {
        let input = input.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(input);
        let first = input.iter().copied().find(|b| !b.is_ascii_whitespace())?;
        match first {
            b'{' => Some(Format::Json),
            b'<' => Some(Format::Xml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "JSON"),
            Format::Xml => write!(f, "XML"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            other => Err(format!("unknown format `{}`, expected `json` or `xml`", other)),
        }
    }
}

/// Decodes any registered resource from `input` in the given format.
pub fn read_resource(input: &[u8], format: Format) -> Result<ResourceEnvelope> {
    match format {
        Format::Json => crate::json::resource_from_json_slice(input),
        #[cfg(feature = "xml")]
        Format::Xml => crate::xml::resource_from_xml_slice(input),
        #[cfg(not(feature = "xml"))]
        Format::Xml => Err(SerdeError::Custom(
            "XML support requires the `xml` feature".to_string(),
        )),
    }
}

/// Encodes a resource in the given format.
pub fn write_resource(resource: &ResourceEnvelope, format: Format, pretty: bool) -> Result<String> {
    let value = resource.as_composite();
    match (format, pretty) {
        (Format::Json, false) => crate::json::to_json_string(value),
        (Format::Json, true) => crate::json::to_json_string_pretty(value),
        #[cfg(feature = "xml")]
        (Format::Xml, false) => crate::xml::to_xml_string(value),
        #[cfg(feature = "xml")]
        (Format::Xml, true) => crate::xml::to_xml_string_pretty(value),
        #[cfg(not(feature = "xml"))]
        (Format::Xml, _) => Err(SerdeError::Custom(
            "XML support requires the `xml` feature".to_string(),
        )),
    }
}

/// Converts one resource document. With `from` unset the input format is detected.
///
/// # Examples
///
/// ```rust
/// use helios_serde::convert::{Format, convert};
///
/// let xml = convert(
///     br#"{"resourceType":"Patient","active":true}"#,
///     None,
///     Format::Xml,
///     false,
/// )
/// .unwrap();
/// assert!(xml.contains(r#"<active value="true"/>"#));
/// ```
pub fn convert(input: &[u8], from: Option<Format>, to: Format, pretty: bool) -> Result<String> {
    let from = match from.or_else(|| Format::detect(input)) {
        Some(format) => format,
        None => {
            return Err(SerdeError::Custom(
                "cannot detect input format: expected `{` or `<`".to_string(),
            ));
        }
    };
    let resource = read_resource(input, from)?;
    write_resource(&resource, to, pretty)
}

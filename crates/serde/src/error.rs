use crate::convert::Format;
use helios_fhir::SlotError;

/// Error types for FHIR serialization and deserialization.
#[derive(Debug)]
pub enum SerdeError {
    /// JSON syntax error or I/O failure inside `serde_json`
    Json(serde_json::Error),

    /// XML syntax error
    #[cfg(feature = "xml")]
    Xml(quick_xml::Error),

    /// IO error during serialization/deserialization
    Io(std::io::Error),

    /// Well-formed input that does not match the element model
    Decode(DecodeError),

    /// Custom error message
    Custom(String),
}

impl std::fmt::Display for SerdeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerdeError::Json(e) => write!(f, "JSON error: {}", e),
            #[cfg(feature = "xml")]
            SerdeError::Xml(e) => write!(f, "XML error: {}", e),
            SerdeError::Io(e) => write!(f, "IO error: {}", e),
            SerdeError::Decode(e) => write!(f, "{} decode error: {}", e.format, e),
            SerdeError::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SerdeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerdeError::Json(e) => Some(e),
            #[cfg(feature = "xml")]
            SerdeError::Xml(e) => Some(e),
            SerdeError::Io(e) => Some(e),
            SerdeError::Decode(e) => Some(e),
            SerdeError::Custom(_) => None,
        }
    }
}

impl SerdeError {
    /// The structural decode failure, if that is what this is.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            SerdeError::Decode(e) => Some(e),
            _ => None,
        }
    }

    /// Shorthand for matching on the kind of a structural decode failure.
    pub fn decode_kind(&self) -> Option<&DecodeErrorKind> {
        self.decode_error().map(|e| &e.kind)
    }
}

impl From<serde_json::Error> for SerdeError {
    fn from(err: serde_json::Error) -> Self {
        SerdeError::Json(err)
    }
}

#[cfg(feature = "xml")]
impl From<quick_xml::Error> for SerdeError {
    fn from(err: quick_xml::Error) -> Self {
        SerdeError::Xml(err)
    }
}

#[cfg(feature = "xml")]
impl From<quick_xml::events::attributes::AttrError> for SerdeError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        SerdeError::Xml(err.into())
    }
}

impl From<std::io::Error> for SerdeError {
    fn from(err: std::io::Error) -> Self {
        SerdeError::Io(err)
    }
}

impl From<DecodeError> for SerdeError {
    fn from(err: DecodeError) -> Self {
        SerdeError::Decode(err)
    }
}

impl From<String> for SerdeError {
    fn from(msg: String) -> Self {
        SerdeError::Custom(msg)
    }
}

impl From<&str> for SerdeError {
    fn from(msg: &str) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}

/// Input that parsed as JSON or XML but does not fit the target type.
///
/// The message names the type and the wire field:
/// `Observation.valueFoo: unknown field`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    pub format: Format,
    /// FHIR type being decoded when the failure was found.
    pub type_name: String,
    /// Wire name of the offending key, element or attribute.
    pub field: Option<String>,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub fn new(format: Format, type_name: impl Into<String>, kind: DecodeErrorKind) -> Self {
        Self {
            format,
            type_name: type_name.into(),
            field: None,
            kind,
        }
    }

    pub fn at(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Maps a failed slot lookup on `type_name.field`.
    pub fn from_slot(format: Format, type_name: &str, field: &str, err: SlotError) -> Self {
        let kind = match err {
            SlotError::Unknown => DecodeErrorKind::UnknownField,
            SlotError::ChoiceConflict { existing, incoming } => {
                DecodeErrorKind::ChoiceConflict { existing, incoming }
            }
        };
        Self::new(format, type_name, kind).at(field)
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}.{}: {}", self.type_name, field, self.kind),
            None => write!(f, "{}: {}", self.type_name, self.kind),
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeErrorKind {
    UnknownField,
    UnknownAttribute,
    /// The namespace the element resolved to, `None` when unbound.
    WrongNamespace(Option<String>),
    UnknownResourceType(String),
    ResourceTypeMismatch {
        expected: &'static str,
        found: String,
    },
    MissingResourceType,
    ChoiceConflict {
        existing: &'static str,
        incoming: String,
    },
    DuplicateField,
    /// A required attribute (`Extension.url`) is absent or empty.
    MissingField,
    InvalidValue(String),
    UnexpectedContent(String),
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeErrorKind::UnknownField => write!(f, "unknown field"),
            DecodeErrorKind::UnknownAttribute => write!(f, "unknown attribute"),
            DecodeErrorKind::WrongNamespace(Some(ns)) => {
                write!(f, "element in namespace `{}`, expected `http://hl7.org/fhir`", ns)
            }
            DecodeErrorKind::WrongNamespace(None) => {
                write!(f, "element has no namespace, expected `http://hl7.org/fhir`")
            }
            DecodeErrorKind::UnknownResourceType(name) => {
                write!(f, "unknown resource type `{}`", name)
            }
            DecodeErrorKind::ResourceTypeMismatch { expected, found } => {
                write!(f, "expected resource type `{}`, found `{}`", expected, found)
            }
            DecodeErrorKind::MissingResourceType => {
                write!(f, "resource must start with `resourceType`")
            }
            DecodeErrorKind::ChoiceConflict { existing, incoming } => write!(
                f,
                "choice already holds `{}`, cannot also hold `{}`",
                existing, incoming
            ),
            DecodeErrorKind::DuplicateField => write!(f, "duplicate field"),
            DecodeErrorKind::MissingField => write!(f, "missing required field"),
            DecodeErrorKind::InvalidValue(msg) => write!(f, "{}", msg),
            DecodeErrorKind::UnexpectedContent(msg) => write!(f, "{}", msg),
        }
    }
}

/// Result type alias for FHIR serialization operations
pub type Result<T> = std::result::Result<T, SerdeError>;

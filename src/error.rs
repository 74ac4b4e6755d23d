use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, HclError>;

/// Error type for HCL encoding and the JSON-to-HCL pipeline.
#[derive(Debug)]
pub struct HclError {
    kind: HclErrorKind,
}

impl HclError {
    /// Returns a reference to the error kind for detailed error inspection.
    pub fn kind(&self) -> &HclErrorKind {
        &self.kind
    }

    /// Whether this error is an invariant violation rather than a data or I/O problem.
    ///
    /// Fatal errors mean the type metadata and the value graph disagree; no
    /// amount of retrying changes the outcome, and continuing would produce
    /// wrong configuration text.
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

impl Display for HclError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = &self.kind;
        write!(f, "{kind}")
    }
}

impl Error for HclError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            HclErrorKind::Decode(e) => Some(e),
            HclErrorKind::Io(e) => Some(e),
            HclErrorKind::Format(e) => Some(e),
            _ => None,
        }
    }
}

impl<K: Into<HclErrorKind>> From<K> for HclError {
    fn from(value: K) -> Self {
        let kind = value.into();
        HclError { kind }
    }
}

/// Detailed classification of HCL errors.
#[derive(Debug)]
#[non_exhaustive]
pub enum HclErrorKind {
    // Recoverable
    /// The input document could not be decoded into the job schema.
    Decode(serde_json::Error),
    /// Reading the source or writing the sink failed.
    Io(io::Error),
    /// A rendered export has no entry for the requested namespace.
    MissingNamespace {
        /// The requested namespace.
        namespace: String,
    },
    /// A rendered export's namespace has no entry for the requested job.
    MissingJob {
        /// The namespace that was searched.
        namespace: String,
        /// The requested job.
        job: String,
    },

    // Fatal
    /// A value has a shape no encoding rule covers.
    UnsupportedValue {
        /// Dotted path of the field holding the value.
        path: String,
        /// Reflected type of the value.
        type_name: String,
    },
    /// A field declares a role keyword the encoder does not know.
    UnknownFieldRole {
        /// Type declaring the field.
        type_name: String,
        /// Field carrying the keyword.
        field: &'static str,
        /// The offending keyword.
        role: String,
    },
    /// A field carries two roles that exclude each other, like `label` and `block`.
    ConflictingRoles {
        /// Type declaring the field.
        type_name: String,
        /// Field carrying the roles.
        field: &'static str,
        /// The role kept so far.
        first: &'static str,
        /// The role that contradicts it.
        second: &'static str,
    },
    /// More than one field of a type is marked as the block label.
    DuplicateLabel {
        /// Type declaring the fields.
        type_name: String,
    },
    /// A label field resolved to something other than a string.
    LabelNotString {
        /// Dotted path of the label field.
        path: String,
    },
    /// An expression could not be formatted as HCL.
    Format(hcl::Error),
    /// The reflection layer refused an operation the shape promised.
    Reflect {
        /// Dotted path of the field being read.
        path: String,
        /// Reflection diagnostic.
        message: String,
    },
}

impl HclErrorKind {
    fn is_fatal(&self) -> bool {
        !matches!(
            self,
            HclErrorKind::Decode(_)
                | HclErrorKind::Io(_)
                | HclErrorKind::MissingNamespace { .. }
                | HclErrorKind::MissingJob { .. }
        )
    }
}

impl Display for HclErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HclErrorKind::Decode(e) => write!(f, "decoding input: {e}"),
            HclErrorKind::Io(e) => write!(f, "io: {e}"),
            HclErrorKind::MissingNamespace { namespace } => {
                write!(f, "Missing namespace {namespace}")
            }
            HclErrorKind::MissingJob { namespace, job } => {
                write!(f, "Missing job {job} in namespace {namespace}")
            }
            HclErrorKind::UnsupportedValue { path, type_name } => {
                write!(f, "no encoding rule for `{path}` of type {type_name}")
            }
            HclErrorKind::UnknownFieldRole {
                type_name,
                field,
                role,
            } => write!(
                f,
                "unknown hcl role `{role}` on field `{field}` of {type_name}"
            ),
            HclErrorKind::ConflictingRoles {
                type_name,
                field,
                first,
                second,
            } => write!(
                f,
                "field `{field}` of {type_name} is both {first} and {second}"
            ),
            HclErrorKind::DuplicateLabel { type_name } => {
                write!(f, "{type_name} declares more than one label field")
            }
            HclErrorKind::LabelNotString { path } => {
                write!(f, "label field `{path}` is not a string")
            }
            HclErrorKind::Format(e) => write!(f, "formatting hcl: {e}"),
            HclErrorKind::Reflect { path, message } => {
                write!(f, "reflecting `{path}`: {message}")
            }
        }
    }
}

impl From<serde_json::Error> for HclErrorKind {
    fn from(value: serde_json::Error) -> Self {
        HclErrorKind::Decode(value)
    }
}

impl From<hcl::Error> for HclErrorKind {
    fn from(value: hcl::Error) -> Self {
        HclErrorKind::Format(value)
    }
}

impl From<io::Error> for HclErrorKind {
    fn from(value: io::Error) -> Self {
        HclErrorKind::Io(value)
    }
}

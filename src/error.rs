use crate::swagger::Verb;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    /// A dotted setting references a property the attribute shape does not have,
    /// or a processor key is unknown to the registry.
    Configuration { attribute: String, message: String },
    /// The same (path, verb) pair was inserted twice.
    DuplicateOperation { path: String, verb: Verb },
    /// A configured base-type/controller name could not be resolved
    /// against the descriptor snapshot.
    UnresolvedTypeReference(String),
    SerializationError(String),
    OutputError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::Configuration { attribute, message } => {
                write!(f, "Configuration error on '{}': {}", attribute, message)
            }
            Error::DuplicateOperation { path, verb } => write!(
                f,
                "The method '{}' on path '{}' is registered multiple times",
                verb.as_str().to_uppercase(),
                path
            ),
            Error::UnresolvedTypeReference(name) => {
                write!(f, "Unable to resolve type: {}", name)
            }
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::OutputError(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML serialization error: {}", err))
    }
}

impl Error {
    /// Shorthand for the missing-property case of a dotted setting.
    pub fn missing_property(attribute: &str, property: &str) -> Self {
        Error::Configuration {
            attribute: attribute.to_string(),
            message: format!("attribute has no property '{}'", property),
        }
    }
}

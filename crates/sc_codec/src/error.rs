use thiserror::Error;

/// Alias of `Result<T, CodecError>`.
pub type Result<T, E = CodecError> = core::result::Result<T, E>;

/// Everything that can go wrong while registering processors, encoding,
/// decoding or persisting a value.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CodecError {
    /// A processor was registered for a type key or type that is already taken.
    #[error("a processor for type `{type_key}` is already registered")]
    DuplicateType { type_key: String },

    /// No processor is registered under the given type key.
    #[error("no processor is registered for type key `{type_key}`")]
    UnknownType { type_key: String },

    /// The value's type has no processor and is not a record.
    #[error("no processor is available for type `{type_key}`")]
    ProcessorNotFound { type_key: String },

    /// A type key could not be mapped back to a concrete type.
    #[error("cannot resolve type key `{type_key}`: {reason}")]
    UnresolvedType { type_key: String, reason: String },

    /// The persisted container is missing the schema or is otherwise unreadable.
    #[error("invalid container: {reason}")]
    InvalidContainer { reason: String },

    /// The persisted container could not be produced.
    #[error("failed to write container: {reason}")]
    ContainerWrite { reason: String },

    /// The persisted schema version has a different major version.
    #[error("schema version `{found}` is incompatible with supported version `{expected}`")]
    IncompatibleVersion { found: String, expected: String },

    /// A processor returned a node that breaks the schema contract.
    #[error("processor for `{type_key}` broke the schema contract: {reason}")]
    PluginContract { type_key: String, reason: String },

    /// An engine operation was invoked outside of the matching pass.
    #[error("cannot {operation} while the serializer is in {mode} mode")]
    InvalidMode {
        operation: &'static str,
        mode: &'static str,
    },

    /// A schema node does not have the shape its processor expects.
    #[error("malformed `{type_key}` node: {reason}")]
    Malformed { type_key: String, reason: String },

    /// A schema node refers to an array id absent from the array store.
    #[error("array `{id}` is missing from the array store")]
    MissingArray { id: String },

    /// A processor received a value of a type other than the one it handles.
    #[error("expected a value of type `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// An array has an inconsistent shape or cannot be converted.
    #[error("array error: {reason}")]
    Array { reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Shorthand for [`CodecError::Malformed`].
    #[inline]
    pub fn malformed(type_key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            type_key: type_key.into(),
            reason: reason.into(),
        }
    }

    #[inline]
    pub(crate) fn array(reason: impl Into<String>) -> Self {
        Self::Array {
            reason: reason.into(),
        }
    }

    #[inline]
    pub(crate) fn contract(type_key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PluginContract {
            type_key: type_key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CodecError;

    #[test]
    fn messages_name_the_offender() {
        let err = CodecError::UnknownType {
            type_key: String::from("my::Thing"),
        };
        assert_eq!(
            err.to_string(),
            "no processor is registered for type key `my::Thing`"
        );

        let err = CodecError::InvalidMode {
            operation: "serialize",
            mode: "load",
        };
        assert_eq!(
            err.to_string(),
            "cannot serialize while the serializer is in load mode"
        );
    }
}

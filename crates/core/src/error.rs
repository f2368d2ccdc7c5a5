//! Error types for the query-function generator.

use thiserror::Error;

/// Errors that abort a generation run.
///
/// No partial output is written once one of these is raised: every file is
/// rendered in memory before the first write happens.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A `$ref` pointer names a component that does not exist.
    #[error("Unresolved reference '{pointer}'")]
    UnresolvedRef {
        /// The JSON pointer that could not be resolved.
        pointer: String,
    },

    /// A chain of component aliases loops back on itself without reaching a concrete node.
    #[error("Circular reference chain detected at '{pointer}'")]
    CircularRef {
        /// The pointer at which the loop was detected.
        pointer: String,
    },

    /// Two operations declare the same raw operationId.
    #[error(
        "Duplicate operationId '{operation_id}' ({first} and {second}). Each operation must have a unique identifier."
    )]
    DuplicateOperationId {
        /// The repeated operationId.
        operation_id: String,
        /// Location of the first operation (`METHOD /path`).
        first: String,
        /// Location of the second operation.
        second: String,
    },

    /// Two distinct operationIds normalize to the same generated identifier.
    #[error("Generated name '{name}' is produced by both '{first}' and '{second}'")]
    NameCollision {
        /// The colliding generated identifier.
        name: String,
        /// First raw operationId mapping to the identifier.
        first: String,
        /// Second raw operationId mapping to the identifier.
        second: String,
    },

    /// A response key is neither a status code, a status class, nor `default`.
    #[error("Invalid response status '{status}' in operation '{operation_id}'")]
    InvalidStatusPattern {
        /// The offending response key.
        status: String,
        /// The operation declaring it.
        operation_id: String,
    },

    /// The same (name, location) pair appears twice within one parameter list.
    #[error("Duplicate {location} parameter '{name}' in {scope} parameters")]
    DuplicateParameter {
        /// Parameter name.
        name: String,
        /// Parameter location (`path`, `query`, `header`).
        location: String,
        /// Where the list lives (`path-level` or `operation-level`).
        scope: String,
    },

    /// The document could not be parsed.
    #[error("Failed to parse OpenAPI document: {0}")]
    Parse(String),

    /// A bootstrap template failed to render.
    #[error("Failed to render template '{name}': {message}")]
    Template {
        /// Template name.
        name: String,
        /// Renderer message.
        message: String,
    },

    /// A read or write through the file-system collaborator failed.
    #[error("I/O error on '{path}': {message}")]
    Io {
        /// The path being accessed.
        path: String,
        /// Underlying error message.
        message: String,
    },
}

impl CodegenError {
    /// Shorthand for an [`CodegenError::UnresolvedRef`].
    pub fn unresolved(pointer: impl Into<String>) -> Self {
        Self::UnresolvedRef {
            pointer: pointer.into(),
        }
    }

    /// Shorthand for an [`CodegenError::Io`] built from any displayable error.
    pub fn io(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_operation_id_message() {
        let err = CodegenError::DuplicateOperationId {
            operation_id: "listPets".into(),
            first: "GET /pets".into(),
            second: "GET /animals".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Duplicate operationId 'listPets'"));
        assert!(msg.contains("GET /animals"));
    }

    #[test]
    fn test_unresolved_shorthand() {
        let err = CodegenError::unresolved("#/components/schemas/Missing");
        assert!(matches!(
            err,
            CodegenError::UnresolvedRef { ref pointer } if pointer == "#/components/schemas/Missing"
        ));
    }
}

//! Generator configuration and the output names derived from it.

use serde::{Deserialize, Serialize};

use crate::openapi::ir::naming::{to_camel_case, to_pascal_case};
use crate::openapi::ir::resolve::ComponentKind;

/// Output file names for the component namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemasFiles {
    /// File holding `components/parameters` types.
    pub parameters: String,
    /// File holding `components/schemas` types.
    pub schemas: String,
    /// File holding `components/responses` types.
    pub responses: String,
    /// File holding `components/requestBodies` types.
    pub request_bodies: String,
}

impl SchemasFiles {
    /// Default file stems for a prefix: `petstore` gives `petstoreSchemas`, `petstoreResponses`, ...
    pub fn for_prefix(prefix: &str) -> Self {
        let stem = |suffix: &str| prefixed(prefix, suffix);
        Self {
            parameters: stem("Parameters"),
            schemas: stem("Schemas"),
            responses: stem("Responses"),
            request_bodies: stem("RequestBodies"),
        }
    }

    /// File stem for a component kind.
    pub fn file_for(&self, kind: ComponentKind) -> &str {
        match kind {
            ComponentKind::Parameters => &self.parameters,
            ComponentKind::Schemas => &self.schemas,
            ComponentKind::Responses => &self.responses,
            ComponentKind::RequestBodies => &self.request_bodies,
        }
    }
}

/// Options controlling one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Prefix for every generated file and the fetcher / context identifiers.
    #[serde(default)]
    pub filename_prefix: String,
    /// Component namespace files.
    pub schemas_files: SchemasFiles,
    /// Header names supplied by the runtime context. Matching is ASCII case-insensitive.
    #[serde(default)]
    pub injected_headers: Vec<String>,
}

impl GeneratorConfig {
    /// Configuration with default component file names for `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        let filename_prefix = prefix.into();
        Self {
            schemas_files: SchemasFiles::for_prefix(&filename_prefix),
            filename_prefix,
            injected_headers: Vec::new(),
        }
    }

    /// Add injected header names.
    pub fn with_injected_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.injected_headers.extend(headers.into_iter().map(Into::into));
        self
    }

    /// Whether a header parameter is provided by the runtime context.
    pub fn is_injected_header(&self, name: &str) -> bool {
        self.injected_headers
            .iter()
            .any(|header| header.eq_ignore_ascii_case(name))
    }

    /// Derive every file stem and identifier from the prefix.
    pub fn output_names(&self) -> OutputNames {
        let prefix = self.filename_prefix.as_str();
        let pascal = if prefix.is_empty() {
            String::new()
        } else {
            to_pascal_case(prefix)
        };
        OutputNames {
            functions_file: prefixed(prefix, "Functions"),
            context_file: prefixed(prefix, "Context"),
            fetcher_file: prefixed(prefix, "Fetcher"),
            utils_file: prefixed(prefix, "Utils"),
            fetch_fn: prefixed(prefix, "Fetch"),
            context_type: format!("{pascal}Context"),
            use_context_fn: format!("use{pascal}Context"),
            schemas_files: self.schemas_files.clone(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new("")
    }
}

/// Every name a generation run writes or references.
///
/// File fields are stems without extension; [`OutputNames::filename`] adds `.ts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    /// `<prefix>Functions`
    pub functions_file: String,
    /// `<prefix>Context`
    pub context_file: String,
    /// `<prefix>Fetcher`
    pub fetcher_file: String,
    /// `<prefix>Utils`
    pub utils_file: String,
    /// `<prefix>Fetch`
    pub fetch_fn: String,
    /// `<Prefix>Context`
    pub context_type: String,
    /// `use<Prefix>Context`
    pub use_context_fn: String,
    /// Component namespace files.
    pub schemas_files: SchemasFiles,
}

impl OutputNames {
    /// Filename for a stem.
    pub fn filename(stem: &str) -> String {
        format!("{stem}.ts")
    }

    /// Relative import specifier for a stem.
    pub fn import_path(stem: &str) -> String {
        format!("./{stem}")
    }
}

/// `petstore` + `Functions` -> `petstoreFunctions`; empty prefix -> `functions`.
fn prefixed(prefix: &str, suffix: &str) -> String {
    if prefix.is_empty() {
        to_camel_case(suffix)
    } else {
        format!("{}{suffix}", to_camel_case(prefix))
    }
}

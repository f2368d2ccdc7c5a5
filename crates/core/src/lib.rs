//! Core of `rqgen`: turns an OpenAPI document into typed react-query query
//! functions for TypeScript.
//!
//! The pipeline is pure apart from the [`fs::FileSystem`] collaborator:
//! every output file is rendered in memory before the first write, so a
//! failed run leaves the output directory untouched.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod fs;
pub mod openapi;
pub mod query_key;

pub use config::{GeneratorConfig, OutputNames, SchemasFiles};
pub use error::CodegenError;
pub use fs::{FileSystem, MemoryFs};
pub use openapi::{
    FileDrift, GeneratedFile, OpenApiSpec, detect_drift, generate, generate_react_query_functions,
    render_files,
};
pub use query_key::build_query_key;

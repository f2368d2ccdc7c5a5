//! Loading the generator configuration and the input document.

use std::path::Path;

use rqgen_core::{GeneratorConfig, OpenApiSpec};

/// Read a TOML configuration file.
///
/// ```toml
/// filenamePrefix = "petstore"
/// injectedHeaders = ["Authorization"]
///
/// [schemasFiles]
/// parameters = "petstoreParameters"
/// schemas = "petstoreSchemas"
/// responses = "petstoreResponses"
/// requestBodies = "petstoreRequestBodies"
/// ```
pub async fn load_config(path: &Path) -> Result<GeneratorConfig, String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| format!("Failed to read config {}: {err}", path.display()))?;
    parse_config(&content).map_err(|err| format!("Invalid config {}: {err}", path.display()))
}

fn parse_config(content: &str) -> Result<GeneratorConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Read an OpenAPI document, as YAML for `.yaml`/`.yml` files and JSON otherwise.
pub async fn load_spec(path: &Path) -> Result<OpenApiSpec, String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let spec = if is_yaml {
        OpenApiSpec::from_yaml(&content)
    } else {
        OpenApiSpec::from_json(&content)
    };
    spec.map_err(|err| format!("{}: {err}", path.display()))
}

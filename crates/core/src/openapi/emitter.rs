//! Generation pipeline: document in, ordered TypeScript files out.

use crate::bootstrap::bootstrap_files;
use crate::config::{GeneratorConfig, OutputNames};
use crate::error::CodegenError;
use crate::fs::FileSystem;

use super::ir::Emit;
use super::ir::api::RoutingKind;
use super::ir::codegen::{FunctionsModule, banner, component_module, utils_module};
use super::ir::extract::extract_operations;
use super::ir::naming::NameTable;
use super::ir::resolve::{ComponentKind, ComponentRegistry};
use super::ir::synth::{TypeRegistry, TypeSynthesizer};
use super::spec::OpenApiSpec;

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Filename relative to the output directory, with extension
    pub path: String,
    pub content: String,
}

/// Render every generated file in write order, without touching any file system.
///
/// Order: component namespace files (non-empty only), the utils file (only
/// when a status range is used), then the functions file.
pub fn render_files(
    spec: &OpenApiSpec,
    config: &GeneratorConfig,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    let names = config.output_names();
    let components = ComponentRegistry::build(spec);
    let operations = extract_operations(spec, &components)?;
    let file_banner = || banner(spec.version());

    let mut name_table = NameTable::default();
    let mut registry = TypeRegistry::default();
    let mut functions = FunctionsModule::new(&names);
    let ranges = {
        let mut synth = TypeSynthesizer::new(&components, &mut registry, config);
        for op in &operations {
            if op.routing_kind != RoutingKind::Query {
                continue;
            }
            let op_names = name_table.claim(&op.operation_id)?;
            let types = synth.operation(op)?;
            functions.add_operation(op, &op_names, types);
        }
        synth.used_ranges().clone()
    };

    tracing::debug!(
        operations = operations.len(),
        queries = functions.query_count(),
        named_types = registry.len(),
        "Synthesized query functions"
    );

    let mut files = Vec::new();
    for kind in ComponentKind::ALL {
        if let Some(module) = component_module(kind, &registry, &names, file_banner()) {
            files.push(GeneratedFile {
                path: OutputNames::filename(names.schemas_files.file_for(kind)),
                content: module.emit(),
            });
        }
    }
    if let Some(module) = utils_module(&ranges, file_banner()) {
        files.push(GeneratedFile {
            path: OutputNames::filename(&names.utils_file),
            content: module.emit(),
        });
    }
    files.push(GeneratedFile {
        path: OutputNames::filename(&names.functions_file),
        content: functions.build(file_banner()).emit(),
    });

    Ok(files)
}

/// Parse a JSON document and render its generated files.
pub fn generate(spec_json: &str, config: &GeneratorConfig) -> Result<Vec<GeneratedFile>, CodegenError> {
    let spec = OpenApiSpec::from_json(spec_json)?;
    render_files(&spec, config)
}

/// Generate react-query functions for a document and write them through `fs`.
///
/// The fetcher and context files are written first, and only when they do not
/// exist yet. Every file is rendered before the first write, so an error
/// leaves the output directory untouched. Returns the written files in order.
pub async fn generate_react_query_functions<F: FileSystem>(
    fs: &F,
    spec: &OpenApiSpec,
    config: &GeneratorConfig,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    let names = config.output_names();
    let mut files = bootstrap_files(fs, &names)?;
    files.extend(render_files(spec, config)?);

    for file in &files {
        tracing::debug!(path = %file.path, bytes = file.content.len(), "Writing file");
        fs.write_file(&file.path, &file.content).await?;
    }

    tracing::info!(files = files.len(), "Generated react-query functions");
    Ok(files)
}

/// A rendered file whose on-disk content differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDrift {
    pub path: String,
    /// Current content, `None` when the file does not exist
    pub current: Option<String>,
    pub expected: String,
}

/// Compare rendered files against what `fs` currently holds.
pub async fn detect_drift<F: FileSystem>(
    fs: &F,
    files: &[GeneratedFile],
) -> Result<Vec<FileDrift>, CodegenError> {
    let mut drift = Vec::new();
    for file in files {
        let current = if fs.exists_file(&file.path) {
            Some(fs.read_file(&file.path).await?)
        } else {
            None
        };
        if current.as_deref() != Some(file.content.as_str()) {
            drift.push(FileDrift {
                path: file.path.clone(),
                current,
                expected: file.content.clone(),
            });
        }
    }
    Ok(drift)
}

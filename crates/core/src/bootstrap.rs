//! Fetcher and context bootstrap.
//!
//! Both files are meant to be edited by hand after the first run, so they are
//! only rendered when no file exists at their path yet.

use tera::Context;

use crate::config::OutputNames;
use crate::error::CodegenError;
use crate::fs::FileSystem;
use crate::openapi::emitter::GeneratedFile;

const FETCHER_TEMPLATE: &str = include_str!("../templates/fetcher.ts.tera");
const CONTEXT_TEMPLATE: &str = include_str!("../templates/context.ts.tera");

/// Render the fetcher and context files that do not exist yet, fetcher first.
pub fn bootstrap_files<F: FileSystem>(
    fs: &F,
    names: &OutputNames,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    let context = template_context(names);
    let mut files = Vec::new();

    for (stem, template) in [
        (&names.fetcher_file, FETCHER_TEMPLATE),
        (&names.context_file, CONTEXT_TEMPLATE),
    ] {
        let path = OutputNames::filename(stem);
        if fs.exists_file(&path) {
            tracing::debug!(path = %path, "Keeping existing file");
            continue;
        }
        let content = render(&path, template, &context)?;
        files.push(GeneratedFile { path, content });
    }

    Ok(files)
}

fn template_context(names: &OutputNames) -> Context {
    let pascal = names
        .context_type
        .strip_suffix("Context")
        .unwrap_or_default();

    let mut context = Context::new();
    context.insert("fetch_fn", &names.fetch_fn);
    context.insert("fetcher_options_type", &format!("{pascal}FetcherOptions"));
    context.insert("context_type", &names.context_type);
    context.insert("use_context_fn", &names.use_context_fn);
    context.insert(
        "context_import",
        &OutputNames::import_path(&names.context_file),
    );
    context.insert(
        "functions_import",
        &OutputNames::import_path(&names.functions_file),
    );
    context
}

fn render(name: &str, template: &str, context: &Context) -> Result<String, CodegenError> {
    tera::Tera::one_off(template, context, false).map_err(|err| CodegenError::Template {
        name: name.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::fs::MemoryFs;

    #[test]
    fn test_renders_both_files_when_absent() {
        let names = GeneratorConfig::new("petstore").output_names();
        let files = bootstrap_files(&MemoryFs::new(), &names).unwrap();

        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["petstoreFetcher.ts", "petstoreContext.ts"]);

        let fetcher = &files[0].content;
        assert!(fetcher.contains("import { PetstoreContext } from \"./petstoreContext\";"));
        assert!(fetcher.contains("export async function petstoreFetch<"));
        assert!(fetcher.contains("}: PetstoreFetcherOptions<TBody, THeaders, TQueryParams, TPathParams>)"));
        assert!(fetcher.contains("export type ErrorWrapper<TError> ="));

        let context = &files[1].content;
        assert!(context.contains("import type { QueryOperation } from \"./petstoreFunctions\";"));
        assert!(context.contains("export type PetstoreContext<"));
        assert!(context.contains("export function usePetstoreContext<"));
        assert!(context.contains("export const queryKeyFn = (operation: QueryOperation) => {"));
    }

    #[test]
    fn test_existing_files_are_kept() {
        let names = GeneratorConfig::new("petstore").output_names();
        let fs = MemoryFs::new().with_file("petstoreFetcher.ts", "// custom");
        let files = bootstrap_files(&fs, &names).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "petstoreContext.ts");
    }

    #[test]
    fn test_empty_prefix_names() {
        let names = GeneratorConfig::default().output_names();
        let files = bootstrap_files(&MemoryFs::new(), &names).unwrap();

        assert_eq!(files[0].path, "fetcher.ts");
        assert!(files[0].content.contains("export async function fetch<"));
        assert!(files[0].content.contains("}: FetcherOptions<"));
        assert_eq!(files[1].path, "context.ts");
        assert!(files[1].content.contains("export function useContext<"));
    }
}

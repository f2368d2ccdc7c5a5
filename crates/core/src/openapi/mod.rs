//! OpenAPI to react-query TypeScript code generator.
//!
//! This module parses OpenAPI 3.x documents and generates TypeScript code with:
//! - Type definitions for referenced components, one file per component kind
//! - A typed fetch wrapper per query operation
//! - A react-query query builder (`queryKey` + `queryFn`) per query operation
//! - Status-range helper types when error responses use wildcards

pub mod emitter;
pub mod ir;
pub mod spec;

pub use emitter::{
    FileDrift, GeneratedFile, detect_drift, generate, generate_react_query_functions, render_files,
};
pub use spec::OpenApiSpec;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::error::CodegenError;

    const PETSTORE_JSON: &str = r##"{
  "openapi": "3.0.0",
  "info": { "title": "Swagger Petstore", "version": "1.0.0" },
  "paths": {
    "/pets": {
      "get": {
        "operationId": "listPets",
        "summary": "List all pets",
        "parameters": [
          { "name": "limit", "in": "query", "required": false, "description": "How many items to return", "schema": { "type": "integer" } }
        ],
        "responses": {
          "200": { "description": "A paged array of pets", "content": { "application/json": { "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } } } } },
          "default": { "description": "unexpected error", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } } }
        }
      },
      "post": {
        "operationId": "createPets",
        "requestBody": { "required": true, "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } },
        "responses": { "201": { "description": "Null response" } }
      }
    },
    "/pets/{pet_id}": {
      "get": {
        "operationId": "showPetById",
        "parameters": [
          { "name": "pet_id", "in": "path", "required": true, "schema": { "type": "string" } }
        ],
        "responses": {
          "200": { "description": "Expected response", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } },
          "404": { "$ref": "#/components/responses/NotFound" }
        }
      }
    }
  },
  "components": {
    "schemas": {
      "Pet": {
        "type": "object",
        "description": "A pet from the store",
        "required": ["id", "name"],
        "properties": {
          "id": { "type": "integer", "format": "int64" },
          "name": { "type": "string" },
          "tag": { "type": "string" }
        }
      },
      "Error": {
        "type": "object",
        "required": ["code", "message"],
        "properties": {
          "code": { "type": "integer" },
          "message": { "type": "string" }
        }
      }
    },
    "responses": {
      "NotFound": {
        "description": "Not found",
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
      }
    }
  }
}"##;

    fn file<'f>(files: &'f [GeneratedFile], path: &str) -> &'f str {
        files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.content.as_str())
            .expect("generated file")
    }

    #[test]
    fn test_generate_petstore_files() {
        let files = generate(PETSTORE_JSON, &GeneratorConfig::new("petstore")).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "petstoreSchemas.ts",
                "petstoreResponses.ts",
                "petstoreUtils.ts",
                "petstoreFunctions.ts",
            ]
        );

        let functions = file(&files, "petstoreFunctions.ts");
        assert!(functions.starts_with("/**\n * Generated by rqgen\n *\n * @version 1.0.0\n */\n"));
        assert!(functions.contains("import * as reactQuery from \"@tanstack/react-query\";"));
        assert!(functions.contains("import { PetstoreContext, queryKeyFn } from \"./petstoreContext\";"));
        assert!(functions.contains("import type * as Fetcher from \"./petstoreFetcher\";"));
        assert!(functions.contains("import { petstoreFetch } from \"./petstoreFetcher\";"));
        assert!(functions.contains("import type * as Schemas from \"./petstoreSchemas\";"));
        assert!(functions.contains("import type * as Responses from \"./petstoreResponses\";"));

        assert!(functions.contains("export type ListPetsResponse = Schemas.Pet[];"));
        assert!(functions.contains(
            "export type ListPetsVariables = {\n  queryParams?: ListPetsQueryParams;\n} & PetstoreContext[\"fetcherOptions\"];"
        ));
        assert!(functions.contains(
            "export const fetchListPets = (variables: ListPetsVariables, signal?: AbortSignal) => {"
        ));
        assert!(functions.contains("export const listPetsQuery = (variables: ListPetsVariables)"));
        assert!(functions.contains("ClientErrorStatus | ServerErrorStatus"));

        assert!(functions.contains("export type ShowPetByIdPathParams = {\n  petId: string;\n};"));
        assert!(functions.contains("url: \"/pets/{petId}\""));
        assert!(functions.contains("Responses.NotFound"));

        // Mutations are not emitted
        assert!(!functions.contains("createPets"));
        assert!(!functions.contains("CreatePets"));
    }

    #[test]
    fn test_component_files_hold_named_types() {
        let files = generate(PETSTORE_JSON, &GeneratorConfig::new("petstore")).unwrap();

        let schemas = file(&files, "petstoreSchemas.ts");
        assert!(schemas.contains("/**\n * A pet from the store\n */\nexport type Pet = {"));
        assert!(schemas.contains("  tag?: string;"));
        assert!(schemas.contains("export type Error = {"));
        assert!(!schemas.contains("import"));

        let responses = file(&files, "petstoreResponses.ts");
        assert!(responses.contains("import type * as Schemas from \"./petstoreSchemas\";"));
        assert!(responses.contains("export type NotFound = Schemas.Error;"));

        let utils = file(&files, "petstoreUtils.ts");
        assert!(utils.contains("export type ClientErrorStatus = Exclude<"));
        assert!(utils.contains("export type ServerErrorStatus = Exclude<"));
        assert!(!utils.contains("InformationalStatus"));
    }

    #[test]
    fn test_property_docs() {
        let files = generate(PETSTORE_JSON, &GeneratorConfig::new("petstore")).unwrap();
        let functions = file(&files, "petstoreFunctions.ts");
        assert!(functions.contains("  /**\n   * How many items to return\n   */\n  limit?: number;"));
        assert!(functions.contains("/**\n * List all pets\n */\nexport const fetchListPets"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = GeneratorConfig::new("petstore");
        let first = generate(PETSTORE_JSON, &config).unwrap();
        let second = generate(PETSTORE_JSON, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unresolved_ref_fails() {
        let json = r##"{
  "openapi": "3.0.0",
  "info": { "title": "Broken", "version": "1.0.0" },
  "paths": {
    "/pets": {
      "get": {
        "operationId": "listPets",
        "responses": {
          "200": { "description": "OK", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Missing" } } } }
        }
      }
    }
  }
}"##;
        let err = generate(json, &GeneratorConfig::new("petstore")).unwrap_err();
        assert!(
            matches!(err, CodegenError::UnresolvedRef { ref pointer } if pointer == "#/components/schemas/Missing"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_invalid_status_fails() {
        let json = r##"{
  "openapi": "3.0.0",
  "info": { "title": "Broken", "version": "1.0.0" },
  "paths": {
    "/pets": {
      "get": {
        "operationId": "listPets",
        "responses": { "2X0": { "description": "OK" } }
      }
    }
  }
}"##;
        let err = generate(json, &GeneratorConfig::new("petstore")).unwrap_err();
        assert!(matches!(err, CodegenError::InvalidStatusPattern { .. }));
    }

    #[test]
    fn test_custom_component_marker_excludes_operation() {
        let json = r##"{
  "openapi": "3.0.0",
  "info": { "title": "Custom", "version": "1.0.0" },
  "paths": {
    "/pets": {
      "get": {
        "operationId": "listPets",
        "x-openapi-codegen-component": "useCustomThing",
        "responses": { "200": { "description": "OK" } }
      }
    }
  }
}"##;
        let files = generate(json, &GeneratorConfig::new("petstore")).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].content.contains("operationId: never;"));
    }
}

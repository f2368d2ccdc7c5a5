//! End-to-end generation through the file-system collaborator.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use rqgen_core::{
    CodegenError, GeneratorConfig, MemoryFs, OpenApiSpec, build_query_key, detect_drift,
    generate_react_query_functions, render_files,
};
use serde_json::json;

const PETSTORE_YAML: &str = r##"
openapi: 3.0.0
info:
  title: Petstore
  version: 2.1.0
paths:
  /pets:
    get:
      operationId: listPets
      parameters:
        - name: status
          in: query
          schema:
            type: string
            enum: [sold, available, pending]
        - name: X-Api-Key
          in: header
          required: true
          schema:
            type: string
      responses:
        200:
          description: OK
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/Pet"
        5XX:
          description: Server error
  /pets/{petId}:
    parameters:
      - name: petId
        in: path
        required: true
        schema:
          type: string
    get:
      operationId: showPetById
      responses:
        "200":
          description: OK
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Pet"
    delete:
      operationId: deletePet
      responses:
        "204":
          description: Deleted
components:
  schemas:
    Pet:
      type: object
      required: [id]
      properties:
        id:
          type: string
        status:
          type: string
          enum: [sold, available, pending]
"##;

const MUTATIONS_ONLY: &str = r##"{
  "openapi": "3.0.0",
  "info": { "title": "Writes", "version": "1.0.0" },
  "paths": {
    "/pets": {
      "post": { "operationId": "createPet", "responses": { "201": { "description": "Created" } } },
      "put": { "operationId": "replacePet", "responses": { "200": { "description": "OK" } } }
    }
  }
}"##;

fn petstore() -> OpenApiSpec {
    OpenApiSpec::from_yaml(PETSTORE_YAML).unwrap()
}

fn config() -> GeneratorConfig {
    GeneratorConfig::new("petstore").with_injected_headers(["x-api-key"])
}

#[tokio::test]
async fn test_write_order() {
    let fs = MemoryFs::new();
    let written = generate_react_query_functions(&fs, &petstore(), &config())
        .await
        .unwrap();

    let expected = vec![
        "petstoreFetcher.ts",
        "petstoreContext.ts",
        "petstoreSchemas.ts",
        "petstoreUtils.ts",
        "petstoreFunctions.ts",
    ];
    assert_eq!(fs.writes(), expected);
    let returned: Vec<&str> = written.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(returned, expected);
}

#[tokio::test]
async fn test_existing_fetcher_is_not_overwritten() {
    let fs = MemoryFs::new().with_file("petstoreFetcher.ts", "// my fetcher\n");
    generate_react_query_functions(&fs, &petstore(), &config())
        .await
        .unwrap();

    assert_eq!(fs.file("petstoreFetcher.ts").unwrap(), "// my fetcher\n");
    assert!(!fs.writes().contains(&"petstoreFetcher.ts".to_string()));
    assert!(fs.writes().contains(&"petstoreContext.ts".to_string()));
}

#[tokio::test]
async fn test_generated_functions() {
    let fs = MemoryFs::new();
    generate_react_query_functions(&fs, &petstore(), &config())
        .await
        .unwrap();
    let functions = fs.file("petstoreFunctions.ts").unwrap();

    assert!(functions.contains("@version 2.1.0"));
    // Enum members keep declaration order
    assert!(functions.contains("status?: \"sold\" | \"available\" | \"pending\";"));
    // Injected headers become optional
    assert!(functions.contains("\"X-Api-Key\"?: string;"));
    assert!(functions.contains(
        "export type ListPetsVariables = {\n  headers?: ListPetsHeaders;\n  queryParams?: ListPetsQueryParams;\n} & PetstoreContext[\"fetcherOptions\"];"
    ));
    assert!(functions.contains("export const fetchListPets = "));
    assert!(functions.contains("export const listPetsQuery = "));
    assert!(functions.contains("export const showPetByIdQuery = "));
    assert_eq!(functions.matches("export type ListPetsResponse = ").count(), 1);
    assert!(functions.contains("ServerErrorStatus"));
    assert!(functions.contains("import type { ServerErrorStatus } from \"./petstoreUtils\";"));

    // DELETE is a mutation
    assert!(!functions.contains("deletePet"));

    let utils = fs.file("petstoreUtils.ts").unwrap();
    assert!(utils.contains("export type ServerErrorStatus"));
    assert!(!utils.contains("ClientErrorStatus"));
}

#[tokio::test]
async fn test_mutations_only_document() {
    let spec = OpenApiSpec::from_json(MUTATIONS_ONLY).unwrap();
    let fs = MemoryFs::new();
    generate_react_query_functions(&fs, &spec, &GeneratorConfig::new("writes"))
        .await
        .unwrap();

    assert_eq!(
        fs.writes(),
        vec!["writesFetcher.ts", "writesContext.ts", "writesFunctions.ts"]
    );
    let functions = fs.file("writesFunctions.ts").unwrap();
    assert!(functions.contains("operationId: never;"));
    assert!(functions.contains("import * as reactQuery from \"@tanstack/react-query\";"));
    assert!(functions.contains("import { WritesContext, queryKeyFn } from \"./writesContext\";"));
    assert!(functions.contains("import type * as Fetcher from \"./writesFetcher\";"));
    assert!(functions.contains("import { writesFetch } from \"./writesFetcher\";"));
    assert!(!functions.contains("Schemas"));
}

#[tokio::test]
async fn test_empty_prefix() {
    let spec = OpenApiSpec::from_json(MUTATIONS_ONLY).unwrap();
    let fs = MemoryFs::new();
    generate_react_query_functions(&fs, &spec, &GeneratorConfig::default())
        .await
        .unwrap();

    assert_eq!(fs.writes(), vec!["fetcher.ts", "context.ts", "functions.ts"]);
}

#[tokio::test]
async fn test_duplicate_operation_id_writes_nothing() {
    let json = r##"{
  "openapi": "3.0.0",
  "info": { "title": "Dupes", "version": "1.0.0" },
  "paths": {
    "/a": { "get": { "operationId": "same", "responses": { "200": { "description": "OK" } } } },
    "/b": { "get": { "operationId": "same", "responses": { "200": { "description": "OK" } } } }
  }
}"##;
    let spec = OpenApiSpec::from_json(json).unwrap();
    let fs = MemoryFs::new();
    let err = generate_react_query_functions(&fs, &spec, &config())
        .await
        .unwrap_err();

    assert!(matches!(err, CodegenError::DuplicateOperationId { .. }));
    assert!(fs.writes().is_empty());
}

#[tokio::test]
async fn test_name_collision_writes_nothing() {
    let json = r##"{
  "openapi": "3.0.0",
  "info": { "title": "Collide", "version": "1.0.0" },
  "paths": {
    "/a": { "get": { "operationId": "list_pets", "responses": { "200": { "description": "OK" } } } },
    "/b": { "get": { "operationId": "listPets", "responses": { "200": { "description": "OK" } } } }
  }
}"##;
    let spec = OpenApiSpec::from_json(json).unwrap();
    let fs = MemoryFs::new();
    let err = generate_react_query_functions(&fs, &spec, &config())
        .await
        .unwrap_err();

    assert!(matches!(err, CodegenError::NameCollision { ref name, .. } if name == "ListPets"));
    assert!(fs.writes().is_empty());
}

#[tokio::test]
async fn test_drift_detection() {
    let fs = MemoryFs::new();
    generate_react_query_functions(&fs, &petstore(), &config())
        .await
        .unwrap();

    let files = render_files(&petstore(), &config()).unwrap();
    assert!(detect_drift(&fs, &files).await.unwrap().is_empty());

    let changed = GeneratorConfig::new("petstore");
    let files = render_files(&petstore(), &changed).unwrap();
    let drift = detect_drift(&fs, &files).await.unwrap();
    let paths: Vec<&str> = drift.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, vec!["petstoreFunctions.ts"]);
}

#[test]
fn test_query_keys_match_generated_paths() {
    assert_eq!(build_query_key("/pets", &json!({})), vec![json!("pets")]);
    assert_eq!(
        build_query_key("/pets/{petId}", &json!({ "pathParams": { "petId": "42" } })),
        vec![json!("pets"), json!("42")]
    );
}

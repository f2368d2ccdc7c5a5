//! Code generation from synthesized types to TypeScript AST.
//!
//! This module turns extracted operations and their synthesized types into
//! the declarations of each output file: the functions file, one file per
//! component namespace and the status-range utils file.
//!
//! The generated AST can then be emitted to strings via the `Emit` trait.

use std::collections::BTreeSet;

use crate::config::OutputNames;

use super::api::{OperationDescriptor, StatusClass};
use super::imports::FileScope;
use super::naming::{OperationNames, camelize_path};
use super::resolve::ComponentKind;
use super::synth::{OperationTypes, TypeRegistry};
use super::types::{
    ObjectEntry, TsExpr, TsFunction, TsItem, TsLiteral, TsModule, TsParam, TsPrimitive, TsProp,
    TsStmt, TsType, TsTypeDef,
};

/// Module specifier of the query runtime.
const REACT_QUERY_MODULE: &str = "@tanstack/react-query";
/// Namespace alias of the query runtime.
const REACT_QUERY_NAMESPACE: &str = "reactQuery";
/// Namespace alias of the fetcher types.
const FETCHER_NAMESPACE: &str = "Fetcher";
/// Runtime query-key builder exported by the context file.
const QUERY_KEY_FN: &str = "queryKeyFn";

/// Banner placed at the top of every generated file.
pub fn banner(version: Option<&str>) -> String {
    match version {
        Some(version) => format!("/**\n * Generated by rqgen\n *\n * @version {version}\n */"),
        None => "/**\n * Generated by rqgen\n */".to_string(),
    }
}

/// Accumulates the declarations of the functions file.
#[derive(Debug)]
pub struct FunctionsModule<'n> {
    names: &'n OutputNames,
    items: Vec<TsItem>,
    /// One `QueryOperation` member per query operation
    query_operations: Vec<TsType>,
}

impl<'n> FunctionsModule<'n> {
    pub fn new(names: &'n OutputNames) -> Self {
        Self {
            names,
            items: Vec::new(),
            query_operations: Vec::new(),
        }
    }

    /// Number of query operations added.
    pub fn query_count(&self) -> usize {
        self.query_operations.len()
    }

    /// Emit the types, fetch wrapper and query builder of one query operation.
    pub fn add_operation(
        &mut self,
        op: &OperationDescriptor<'_>,
        op_names: &OperationNames,
        types: OperationTypes,
    ) {
        let path = camelize_path(op.http_path);
        let alias = |suffix: &str| TsType::Ref(op_names.type_name(suffix));

        let mut variables = Vec::new();
        let mut fetch_body = TsType::undefined();
        let mut fetch_headers = TsType::Object(Vec::new());
        let mut fetch_query = TsType::Object(Vec::new());
        let mut fetch_path = TsType::Object(Vec::new());

        if let Some(path_params) = types.path_params {
            variables.push(("pathParams", alias("PathParams"), path_params.has_required_fields()));
            fetch_path = alias("PathParams");
            self.push_alias(op_names.type_name("PathParams"), path_params);
        }
        if let Some(query_params) = types.query_params {
            variables.push(("queryParams", alias("QueryParams"), query_params.has_required_fields()));
            fetch_query = alias("QueryParams");
            self.push_alias(op_names.type_name("QueryParams"), query_params);
        }
        if let Some(headers) = types.headers {
            variables.push(("headers", alias("Headers"), headers.has_required_fields()));
            fetch_headers = alias("Headers");
            self.push_alias(op_names.type_name("Headers"), headers);
        }
        if let Some(body) = types.body {
            let body_ty = if body.inline {
                self.push_alias(op_names.type_name("RequestBody"), body.ty);
                alias("RequestBody")
            } else {
                body.ty
            };
            fetch_body = body_ty.clone();
            variables.push(("body", body_ty, body.required));
        }

        self.push_alias(
            op_names.type_name("Error"),
            TsType::Generic {
                name: format!("{FETCHER_NAMESPACE}.ErrorWrapper"),
                args: vec![types.error],
            },
        );
        self.push_alias(op_names.type_name("Response"), types.response);

        // Variables keys in fixed order
        variables.sort_by_key(|(key, _, _)| *key);
        let context_options = TsType::Ref(format!("{}[\"fetcherOptions\"]", self.names.context_type));
        let variables_ty = if variables.is_empty() {
            context_options
        } else {
            let props = variables
                .into_iter()
                .map(|(key, ty, required)| TsProp::new(key, ty, !required))
                .collect();
            TsType::Intersection(vec![TsType::Object(props), context_options])
        };
        self.push_alias(op_names.type_name("Variables"), variables_ty);

        let fetch_fn = self.fetch_function(
            op,
            op_names,
            &path,
            [
                alias("Response"),
                alias("Error"),
                fetch_body,
                fetch_headers,
                fetch_query,
                fetch_path,
            ],
        );
        self.items.push(TsItem::Function(fetch_fn));
        let query_fn = self.query_function(op, op_names, &path);
        self.items.push(TsItem::Function(query_fn));

        self.query_operations.push(TsType::Object(vec![
            TsProp::new("path", TsType::Literal(TsLiteral::String(path)), false),
            TsProp::new(
                "operationId",
                TsType::Literal(TsLiteral::String(op.operation_id.clone())),
                false,
            ),
            TsProp::new("variables", alias("Variables"), false),
        ]));
    }

    fn push_alias(&mut self, name: String, ty: TsType) {
        self.items.push(TsItem::Type(TsTypeDef::alias(name, ty)));
    }

    fn variables_param(op_names: &OperationNames) -> TsParam {
        TsParam {
            name: "variables".into(),
            ty: Some(TsType::Ref(op_names.type_name("Variables"))),
            optional: false,
        }
    }

    /// `({ signal }: { signal?: AbortSignal })`
    fn signal_destructure() -> TsParam {
        TsParam {
            name: "{ signal }".into(),
            ty: Some(TsType::Object(vec![TsProp::new(
                "signal",
                TsType::Ref("AbortSignal".into()),
                true,
            )])),
            optional: false,
        }
    }

    /// `fetch<Op> = (variables, signal?) => <px>Fetch<...>({ url, method, ...variables, signal })`
    fn fetch_function(
        &self,
        op: &OperationDescriptor<'_>,
        op_names: &OperationNames,
        path: &str,
        type_args: [TsType; 6],
    ) -> TsFunction {
        let request = TsExpr::Object(vec![
            ObjectEntry::Prop("url".into(), TsExpr::string(path)),
            ObjectEntry::Prop("method".into(), TsExpr::string(op.http_method.as_str())),
            ObjectEntry::Spread(TsExpr::ident("variables")),
            ObjectEntry::Shorthand("signal".into()),
        ]);

        TsFunction {
            name: op_names.fetch_fn(),
            params: vec![
                Self::variables_param(op_names),
                TsParam {
                    name: "signal".into(),
                    ty: Some(TsType::Ref("AbortSignal".into())),
                    optional: true,
                },
            ],
            return_type: None,
            body: vec![TsStmt::Return(TsExpr::Call {
                callee: Box::new(TsExpr::ident(self.names.fetch_fn.clone())),
                type_args: type_args.into(),
                args: vec![request],
            })],
            is_export: true,
            doc: op.doc.clone(),
        }
    }

    /// `<op>Query = (variables) => ({ queryKey, queryFn })`
    fn query_function(
        &self,
        op: &OperationDescriptor<'_>,
        op_names: &OperationNames,
        path: &str,
    ) -> TsFunction {
        let response = op_names.type_name("Response");
        let return_type = TsType::Object(vec![
            TsProp::new(
                "queryKey",
                TsType::Ref(format!("{REACT_QUERY_NAMESPACE}.QueryKey")),
                false,
            ),
            TsProp::new(
                "queryFn",
                TsType::Ref(format!(
                    "({{ signal }}: {{ signal?: AbortSignal }}) => Promise<{response}>"
                )),
                false,
            ),
        ]);

        let query_key = TsExpr::call(
            QUERY_KEY_FN,
            vec![TsExpr::Object(vec![
                ObjectEntry::Prop("path".into(), TsExpr::string(path)),
                ObjectEntry::Prop("operationId".into(), TsExpr::string(op.operation_id.clone())),
                ObjectEntry::Shorthand("variables".into()),
            ])],
        );
        let query_fn = TsExpr::Arrow {
            params: vec![Self::signal_destructure()],
            body: Box::new(TsExpr::call(
                op_names.fetch_fn(),
                vec![TsExpr::ident("variables"), TsExpr::ident("signal")],
            )),
        };

        TsFunction {
            name: op_names.query_fn(),
            params: vec![Self::variables_param(op_names)],
            return_type: Some(return_type),
            body: vec![TsStmt::Return(TsExpr::Object(vec![
                ObjectEntry::Prop("queryKey".into(), query_key),
                ObjectEntry::Prop("queryFn".into(), query_fn),
            ]))],
            is_export: true,
            doc: op.doc.clone(),
        }
    }

    /// Finish the module: resolve imports and append the `QueryOperation` union.
    pub fn build(self, banner: String) -> TsModule {
        let Self {
            names,
            mut items,
            query_operations,
        } = self;
        let mut scope = FileScope::new(names, None);

        // Present even when no operation qualifies
        let context = OutputNames::import_path(&names.context_file);
        let fetcher = OutputNames::import_path(&names.fetcher_file);
        let imports = scope.imports_mut();
        imports.value_namespace(REACT_QUERY_NAMESPACE, REACT_QUERY_MODULE);
        imports.value(&names.context_type, &context);
        imports.value(QUERY_KEY_FN, &context);
        imports.type_namespace(FETCHER_NAMESPACE, &fetcher);
        imports.value(&names.fetch_fn, &fetcher);

        let query_operation = if query_operations.is_empty() {
            TsType::Object(vec![
                TsProp::new("path", TsType::Primitive(TsPrimitive::String), false),
                TsProp::new("operationId", TsType::Primitive(TsPrimitive::Never), false),
                TsProp::new("variables", TsType::unknown(), false),
            ])
        } else {
            TsType::union(query_operations)
        };
        items.push(TsItem::Type(TsTypeDef::alias("QueryOperation", query_operation)));

        for item in &mut items {
            scope.localize_item(item);
        }

        TsModule {
            banner: Some(banner),
            imports: scope.finish(),
            items,
        }
    }
}

/// Module declaring every registered type of one component kind, `None` if there are none.
pub fn component_module(
    kind: ComponentKind,
    registry: &TypeRegistry,
    names: &OutputNames,
    banner: String,
) -> Option<TsModule> {
    let mut scope = FileScope::new(names, Some(kind));
    let mut items: Vec<TsItem> = registry
        .of_kind(kind)
        .map(|named| {
            TsItem::Type(
                TsTypeDef::alias(named.canonical_name.clone(), named.shape.clone())
                    .with_doc(named.description.clone()),
            )
        })
        .collect();
    if items.is_empty() {
        return None;
    }

    for item in &mut items {
        scope.localize_item(item);
    }
    Some(TsModule {
        banner: Some(banner),
        imports: scope.finish(),
        items,
    })
}

/// Status-range aliases computed at type level, `None` if no range is used.
pub fn utils_module(ranges: &BTreeSet<StatusClass>, banner: String) -> Option<TsModule> {
    if ranges.is_empty() {
        return None;
    }

    let mut items = vec![TsItem::Type(TsTypeDef {
        name: "ComputeRange".into(),
        type_params: vec![
            "N extends number".into(),
            "Result extends Array<unknown> = []".into(),
        ],
        ty: TsType::Ref(
            "Result[\"length\"] extends N\n  ? Result\n  : ComputeRange<N, [...Result, Result[\"length\"]]>"
                .into(),
        ),
        is_export: false,
        doc: None,
    })];

    for class in ranges {
        let (low, high) = class.bounds();
        items.push(TsItem::Type(TsTypeDef::alias(
            class.range_type_name(),
            TsType::Generic {
                name: "Exclude".into(),
                args: vec![
                    TsType::Ref(format!("ComputeRange<{high}>[number]")),
                    TsType::Ref(format!("ComputeRange<{low}>[number]")),
                ],
            },
        )));
    }

    Some(TsModule {
        banner: Some(banner),
        imports: Vec::new(),
        items,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::openapi::ir::api::{HttpMethod, RoutingKind};
    use crate::openapi::ir::emit::Emit;
    use crate::openapi::ir::synth::BodyType;

    fn descriptor(operation_id: &str, path: &'static str) -> OperationDescriptor<'static> {
        OperationDescriptor {
            operation_id: operation_id.to_string(),
            http_method: HttpMethod::Get,
            http_path: path,
            doc: None,
            path_parameters: Vec::new(),
            query_parameters: Vec::new(),
            header_parameters: Vec::new(),
            request_body: None,
            responses_by_status: Vec::new(),
            routing_kind: RoutingKind::Query,
        }
    }

    fn bare_types() -> OperationTypes {
        OperationTypes {
            path_params: None,
            query_params: None,
            headers: None,
            body: None,
            response: TsType::undefined(),
            error: TsType::undefined(),
        }
    }

    #[test]
    fn test_bare_variables_are_context_options() {
        let names = GeneratorConfig::new("petstore").output_names();
        let mut module = FunctionsModule::new(&names);
        let op = descriptor("listPets", "/pets");
        module.add_operation(&op, &OperationNames::new("listPets"), bare_types());
        let code = module.build(banner(None)).emit();

        assert!(
            code.contains("export type ListPetsVariables = PetstoreContext[\"fetcherOptions\"];"),
            "Variables should be bare context options:\n{code}"
        );
        assert!(code.contains("export type ListPetsError = Fetcher.ErrorWrapper<undefined>;"));
        assert!(code.contains(
            "return petstoreFetch<ListPetsResponse, ListPetsError, undefined, {}, {}, {}>({\n    url: \"/pets\",\n    method: \"get\",\n    ...variables,\n    signal,\n  });"
        ));
        assert!(code.contains(
            "queryKey: queryKeyFn({ path: \"/pets\", operationId: \"listPets\", variables })"
        ));
        assert!(code.contains(
            "queryFn: ({ signal }: { signal?: AbortSignal }) => fetchListPets(variables, signal)"
        ));
    }

    #[test]
    fn test_variables_key_order_and_optionality() {
        let names = GeneratorConfig::new("petstore").output_names();
        let mut module = FunctionsModule::new(&names);
        let op = descriptor("updatePet", "/pets/{pet_id}");
        let types = OperationTypes {
            path_params: Some(TsType::Object(vec![TsProp::new(
                "petId",
                TsType::Primitive(TsPrimitive::String),
                false,
            )])),
            query_params: Some(TsType::Object(vec![TsProp::new(
                "limit",
                TsType::Primitive(TsPrimitive::Number),
                true,
            )])),
            headers: None,
            body: Some(BodyType {
                ty: TsType::Object(vec![TsProp::new(
                    "name",
                    TsType::Primitive(TsPrimitive::String),
                    false,
                )]),
                required: true,
                inline: true,
            }),
            response: TsType::undefined(),
            error: TsType::undefined(),
        };
        module.add_operation(&op, &OperationNames::new("updatePet"), types);
        let code = module.build(banner(None)).emit();

        assert!(
            code.contains(
                "export type UpdatePetVariables = {\n  body: UpdatePetRequestBody;\n  pathParams: UpdatePetPathParams;\n  queryParams?: UpdatePetQueryParams;\n} & PetstoreContext[\"fetcherOptions\"];"
            ),
            "unexpected variables:\n{code}"
        );
        assert!(code.contains("url: \"/pets/{petId}\""));
        assert!(code.contains("path: \"/pets/{petId}\";"));
    }

    #[test]
    fn test_empty_query_operation_keeps_imports() {
        let names = GeneratorConfig::new("petstore").output_names();
        let code = FunctionsModule::new(&names).build(banner(Some("1.0.0"))).emit();
        assert_eq!(
            code,
            "/**\n * Generated by rqgen\n *\n * @version 1.0.0\n */\n\n\
             import * as reactQuery from \"@tanstack/react-query\";\n\
             import { PetstoreContext, queryKeyFn } from \"./petstoreContext\";\n\
             import type * as Fetcher from \"./petstoreFetcher\";\n\
             import { petstoreFetch } from \"./petstoreFetcher\";\n\
             \nexport type QueryOperation = {\n  path: string;\n  operationId: never;\n  variables: unknown;\n};\n"
        );
    }

    #[test]
    fn test_utils_module_only_used_ranges() {
        let ranges = BTreeSet::from([StatusClass::ServerError]);
        let code = utils_module(&ranges, banner(None)).unwrap().emit();
        assert!(code.contains("type ComputeRange<N extends number, Result extends Array<unknown> = []> ="));
        assert!(code.contains(
            "export type ServerErrorStatus = Exclude<ComputeRange<600>[number], ComputeRange<500>[number]>;"
        ));
        assert!(!code.contains("ClientErrorStatus"));
        assert!(utils_module(&BTreeSet::new(), banner(None)).is_none());
    }
}

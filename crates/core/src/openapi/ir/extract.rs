//! Operation extraction.
//!
//! Walks every path x method pair in document order and produces an
//! [`OperationDescriptor`] with path-level and operation-level parameters
//! merged, response keys classified and a routing decision attached.

use std::collections::{HashMap, HashSet};

use crate::error::CodegenError;
use crate::openapi::spec::{MaybeRef, OpenApiSpec, Operation, Parameter, PathItem};

use super::api::{
    BodyDescriptor, HttpMethod, OperationDescriptor, ParamLocation, ParameterDescriptor,
    ResponseDescriptor, RoutingKind, StatusPattern,
};
use super::naming::to_camel_case;
use super::resolve::ComponentRegistry;

/// Marker value forcing a GET operation into the query group.
const MARKER_QUERY: &str = "useQuery";
/// Marker value forcing an operation into the mutation group.
const MARKER_MUTATE: &str = "useMutate";

/// Extract every operation of the document, in path order then method order.
pub fn extract_operations<'a>(
    spec: &'a OpenApiSpec,
    components: &ComponentRegistry<'a>,
) -> Result<Vec<OperationDescriptor<'a>>, CodegenError> {
    let mut operations = Vec::new();
    let mut seen_ids: HashMap<String, String> = HashMap::new();

    for (path, item) in spec.paths.iter() {
        for (key, op) in item.operations() {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };
            let descriptor = extract_operation(path, method, item, op, components)?;

            // Raw ids of emitted operations must be unique before any name normalization
            if descriptor.routing_kind != RoutingKind::Excluded {
                let location = descriptor.location();
                if let Some(first) = seen_ids.get(&descriptor.operation_id) {
                    return Err(CodegenError::DuplicateOperationId {
                        operation_id: descriptor.operation_id,
                        first: first.clone(),
                        second: location,
                    });
                }
                seen_ids.insert(descriptor.operation_id.clone(), location);
            }

            tracing::debug!(
                operation_id = %descriptor.operation_id,
                method = %method,
                path = %path,
                routing = ?descriptor.routing_kind,
                "Extracted operation"
            );
            operations.push(descriptor);
        }
    }

    Ok(operations)
}

fn extract_operation<'a>(
    path: &'a str,
    method: HttpMethod,
    item: &'a PathItem,
    op: &'a Operation,
    components: &ComponentRegistry<'a>,
) -> Result<OperationDescriptor<'a>, CodegenError> {
    let operation_id = op
        .operation_id
        .clone()
        .unwrap_or_else(|| derive_operation_id(path, method));

    let parameters = merge_parameters(&item.parameters, &op.parameters, components)?;
    let by_location = |location: ParamLocation| -> Vec<ParameterDescriptor<'a>> {
        parameters
            .iter()
            .filter(|p| p.location == location)
            .cloned()
            .collect()
    };

    let request_body = op
        .request_body
        .as_ref()
        .map(|source| {
            components
                .request_body(source)
                .map(|body| BodyDescriptor {
                    source,
                    required: body.required,
                })
        })
        .transpose()?;

    let mut responses_by_status = Vec::with_capacity(op.responses.len());
    for (key, source) in op.responses.iter() {
        let status =
            StatusPattern::classify(key).ok_or_else(|| CodegenError::InvalidStatusPattern {
                status: key.to_string(),
                operation_id: operation_id.clone(),
            })?;
        responses_by_status.push(ResponseDescriptor { status, source });
    }

    let routing_kind = route(method, op.codegen_component.as_deref());
    if routing_kind == RoutingKind::Excluded {
        tracing::debug!(%operation_id, "Operation excluded by component marker");
    }

    Ok(OperationDescriptor {
        path_parameters: by_location(ParamLocation::Path),
        query_parameters: by_location(ParamLocation::Query),
        header_parameters: by_location(ParamLocation::Header),
        operation_id,
        http_method: method,
        http_path: path,
        doc: operation_doc(op),
        request_body,
        responses_by_status,
        routing_kind,
    })
}

/// Routing decision for a method and an optional component marker.
///
/// `useQuery` only promotes GET operations; on any other method it is ignored.
pub fn route(method: HttpMethod, marker: Option<&str>) -> RoutingKind {
    match marker {
        None => {
            if method.is_query() {
                RoutingKind::Query
            } else {
                RoutingKind::Mutation
            }
        }
        Some(MARKER_QUERY) if method.is_query() => RoutingKind::Query,
        Some(MARKER_QUERY | MARKER_MUTATE) => RoutingKind::Mutation,
        Some(_) => RoutingKind::Excluded,
    }
}

/// `get /pets/{petId}/toys` -> `getPetsToys`.
fn derive_operation_id(path: &str, method: HttpMethod) -> String {
    let literals: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && !s.starts_with('{'))
        .collect();
    to_camel_case(&format!("{}_{}", method.as_str(), literals.join("_")))
}

fn operation_doc(op: &Operation) -> Option<String> {
    [op.description.as_deref(), op.summary.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Merge path-level and operation-level parameters.
///
/// An operation-level parameter replaces the path-level one with the same
/// (name, location) in place. Cookie parameters are dropped. A pair repeated
/// within one list is an error.
fn merge_parameters<'a>(
    path_level: &'a [MaybeRef<Parameter>],
    operation_level: &'a [MaybeRef<Parameter>],
    components: &ComponentRegistry<'a>,
) -> Result<Vec<ParameterDescriptor<'a>>, CodegenError> {
    let mut merged: Vec<ParameterDescriptor<'a>> = Vec::new();

    for (scope, list) in [("path-level", path_level), ("operation-level", operation_level)] {
        let mut seen = HashSet::new();
        for item in list {
            let param = components.parameter(item)?;
            let Some(location) = ParamLocation::from_openapi(&param.location) else {
                continue;
            };
            if !seen.insert((location, param.name.as_str())) {
                return Err(CodegenError::DuplicateParameter {
                    name: param.name.clone(),
                    location: location.as_str().to_string(),
                    scope: scope.to_string(),
                });
            }

            let descriptor = ParameterDescriptor {
                name: &param.name,
                location,
                // Path parameters are always required
                required: param.required || location == ParamLocation::Path,
                schema: param.schema.as_ref(),
                description: param.description.as_deref(),
            };
            match merged
                .iter_mut()
                .find(|d| d.location == location && d.name == param.name)
            {
                Some(slot) => *slot = descriptor,
                None => merged.push(descriptor),
            }
        }
    }

    Ok(merged)
}

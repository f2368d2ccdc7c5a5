//! Type synthesis from schemas to TypeScript types.
//!
//! This module handles all the schema-specific logic:
//! - Schema to TsType conversion (objects, enums, unions, records, ...)
//! - Named component types, registered once and referenced by name
//! - Per-operation parameter, body, response and error types

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::openapi::spec::{
    AdditionalProperties, MaybeRef, MediaType, RequestBody, Response, Schema,
    SchemaType,
};

use super::api::{
    OperationDescriptor, ParamLocation, ParameterDescriptor, ResponseDescriptor, StatusClass,
    StatusPattern,
};
use super::naming::{to_camel_case, to_pascal_case};
use super::resolve::{ComponentKind, ComponentNode, ComponentRegistry};
use super::types::{TsLiteral, TsPrimitive, TsProp, TsType};
use super::utils::{
    enum_value_to_literal, json_value_to_ts_type, make_string_record, make_unknown_record,
};

/// A component type emitted once into its namespace file.
#[derive(Debug, Clone)]
pub struct NamedType {
    /// PascalCase identifier inside the namespace file
    pub canonical_name: String,
    pub kind: ComponentKind,
    /// Pointer of the component that first claimed the name
    pub pointer: String,
    pub shape: TsType,
    pub description: Option<String>,
}

/// Named types in registration order.
///
/// Names are unique per component kind. When two pointers normalize to the
/// same name, the first registration wins.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: Vec<NamedType>,
    index: HashMap<(ComponentKind, String), usize>,
}

impl TypeRegistry {
    /// Look up a registered type.
    pub fn lookup(&self, kind: ComponentKind, name: &str) -> Option<&NamedType> {
        self.index
            .get(&(kind, name.to_string()))
            .and_then(|&i| self.entries.get(i))
    }

    /// Types of one kind, in registration order.
    pub fn of_kind(&self, kind: ComponentKind) -> impl Iterator<Item = &NamedType> {
        self.entries.iter().filter(move |t| t.kind == kind)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn reserve(&mut self, named: NamedType) -> usize {
        let slot = self.entries.len();
        self.index
            .insert((named.kind, named.canonical_name.clone()), slot);
        self.entries.push(named);
        slot
    }

    fn complete(&mut self, slot: usize, shape: TsType) {
        if let Some(entry) = self.entries.get_mut(slot) {
            entry.shape = shape;
        }
    }
}

/// Request body type of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyType {
    pub ty: TsType,
    pub required: bool,
    /// Declared inline, so it gets its own `<Op>RequestBody` alias
    pub inline: bool,
}

/// Every type an operation contributes to the functions file.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationTypes {
    pub path_params: Option<TsType>,
    pub query_params: Option<TsType>,
    pub headers: Option<TsType>,
    pub body: Option<BodyType>,
    pub response: TsType,
    /// Argument of `ErrorWrapper`, `undefined` when no error responses are declared
    pub error: TsType,
}

/// Converts schemas into TypeScript types, registering named components on the way.
#[derive(Debug)]
pub struct TypeSynthesizer<'r, 'a> {
    components: &'r ComponentRegistry<'a>,
    registry: &'r mut TypeRegistry,
    config: &'r GeneratorConfig,
    /// Pointers whose shape is being synthesized; a hit means recursion
    resolving: HashSet<String>,
    /// Status ranges referenced by error types
    ranges: BTreeSet<StatusClass>,
}

impl<'r, 'a> TypeSynthesizer<'r, 'a> {
    pub fn new(
        components: &'r ComponentRegistry<'a>,
        registry: &'r mut TypeRegistry,
        config: &'r GeneratorConfig,
    ) -> Self {
        Self {
            components,
            registry,
            config,
            resolving: HashSet::new(),
            ranges: BTreeSet::new(),
        }
    }

    /// Status ranges used so far, for the utils file.
    pub fn used_ranges(&self) -> &BTreeSet<StatusClass> {
        &self.ranges
    }

    // =========================================================================
    // Schemas
    // =========================================================================

    /// Convert a Schema to TsType
    pub fn schema(&mut self, schema: &'a Schema) -> Result<TsType, CodegenError> {
        let ty = self.schema_inner(schema)?;
        if schema.nullable == Some(true) {
            Ok(ty.nullable())
        } else {
            Ok(ty)
        }
    }

    fn schema_inner(&mut self, schema: &'a Schema) -> Result<TsType, CodegenError> {
        // Handle $ref first
        if let Some(ref_path) = &schema.ref_path {
            return self.reference(ComponentKind::Schemas, ref_path);
        }

        // Handle const keyword
        if let Some(const_value) = &schema.const_value {
            return Ok(json_value_to_ts_type(const_value));
        }

        // Handle allOf (intersection)
        if let Some(all_of) = &schema.all_of {
            let mut types = self.schema_list(all_of)?;
            return Ok(match types.len() {
                0 => TsType::unknown(),
                1 => types.remove(0),
                _ => TsType::Intersection(types),
            });
        }

        // Handle anyOf / oneOf (union)
        if let Some(variants) = schema.any_of.as_ref().or(schema.one_of.as_ref()) {
            let types = self.schema_list(variants)?;
            return Ok(if types.is_empty() {
                TsType::unknown()
            } else {
                TsType::union(types)
            });
        }

        // Enum values keep document order
        if let Some(values) = &schema.enum_values {
            let literals = values
                .iter()
                .map(|v| TsType::Literal(enum_value_to_literal(v)))
                .collect();
            let ty = TsType::union(literals);
            return Ok(if schema.is_nullable() { ty.nullable() } else { ty });
        }

        match &schema.schema_type {
            Some(SchemaType::Single(t)) => self.schema_type(t, schema),
            Some(SchemaType::Multiple(types)) => {
                let mut members = Vec::new();
                for t in types.iter().filter(|t| *t != "null") {
                    members.push(self.schema_type(t, schema)?);
                }
                if types.iter().any(|t| t == "null") {
                    members.push(TsType::Primitive(TsPrimitive::Null));
                }
                Ok(if members.is_empty() {
                    TsType::unknown()
                } else {
                    TsType::union(members)
                })
            }
            // No type: infer from structural keywords, otherwise unknown
            None if schema.properties.is_some() || schema.additional_properties.is_some() => {
                self.object_type(schema)
            }
            None if schema.items.is_some() => self.schema_type("array", schema),
            None => {
                tracing::warn!(
                    title = schema.title.as_deref().unwrap_or_default(),
                    "Schema declares no recognized shape, emitting unknown"
                );
                Ok(TsType::unknown())
            }
        }
    }

    fn schema_list(&mut self, schemas: &'a [Schema]) -> Result<Vec<TsType>, CodegenError> {
        schemas.iter().map(|s| self.schema(s)).collect()
    }

    /// Convert single schema type to TsType
    fn schema_type(&mut self, schema_type: &str, schema: &'a Schema) -> Result<TsType, CodegenError> {
        match schema_type {
            "string" if schema.format.as_deref() == Some("binary") => Ok(TsType::Ref("Blob".into())),
            "string" => Ok(TsType::Primitive(TsPrimitive::String)),
            "number" | "integer" => Ok(TsType::Primitive(TsPrimitive::Number)),
            "boolean" => Ok(TsType::Primitive(TsPrimitive::Boolean)),
            "null" => Ok(TsType::Primitive(TsPrimitive::Null)),
            "array" => {
                let item_type = match &schema.items {
                    Some(items) => self.schema(items)?,
                    None => TsType::unknown(),
                };
                Ok(TsType::Array(Box::new(item_type)))
            }
            "object" => self.object_type(schema),
            other => {
                tracing::warn!(schema_type = other, "Unsupported schema shape, emitting unknown");
                Ok(TsType::unknown())
            }
        }
    }

    /// Normalize object type
    fn object_type(&mut self, schema: &'a Schema) -> Result<TsType, CodegenError> {
        let props = match &schema.properties {
            Some(properties) => Some(self.properties(properties, schema.required.as_deref())?),
            None => None,
        };
        let additional = match &schema.additional_properties {
            Some(additional) => Some(self.additional_properties(additional)?),
            None => None,
        };

        Ok(match (props, additional) {
            (Some(props), Some(additional)) => {
                TsType::Intersection(vec![TsType::Object(props), additional])
            }
            (Some(props), None) => TsType::Object(props),
            (None, Some(additional)) => additional,
            (None, None) => make_unknown_record(),
        })
    }

    /// Normalize object properties, keeping document order
    fn properties(
        &mut self,
        properties: &'a IndexMap<String, Schema>,
        required: Option<&[String]>,
    ) -> Result<Vec<TsProp>, CodegenError> {
        let required: HashSet<&str> = required
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect();

        let mut props = Vec::with_capacity(properties.len());
        for (name, schema) in properties.iter() {
            props.push(TsProp {
                name: name.to_string(),
                ty: self.schema(schema)?,
                optional: !required.contains(name.as_str()),
                doc: schema.description.clone(),
            });
        }
        Ok(props)
    }

    /// Normalize additional properties to a Record type
    fn additional_properties(
        &mut self,
        additional: &'a AdditionalProperties,
    ) -> Result<TsType, CodegenError> {
        match additional {
            AdditionalProperties::Bool(true) => Ok(make_unknown_record()),
            AdditionalProperties::Bool(false) => Ok(TsType::Object(Vec::new())),
            AdditionalProperties::Schema(s) => Ok(make_string_record(self.schema(s)?)),
        }
    }

    // =========================================================================
    // Named components
    // =========================================================================

    /// Reference a component by pointer, registering its named type on first use.
    fn reference(&mut self, expected: ComponentKind, pointer: &str) -> Result<TsType, CodegenError> {
        let (kind, raw_name) = ComponentKind::parse_pointer(pointer)
            .filter(|(kind, _)| *kind == expected)
            .ok_or_else(|| CodegenError::unresolved(pointer))?;
        let canonical_name = to_pascal_case(&raw_name);
        let named = TsType::Component {
            kind,
            name: canonical_name.clone(),
        };

        if self.resolving.contains(pointer) {
            tracing::debug!(pointer, "Recursive reference, emitting forward reference");
            return Ok(named);
        }
        if let Some(existing) = self.registry.lookup(kind, &canonical_name) {
            if existing.pointer != pointer {
                tracing::warn!(
                    name = %canonical_name,
                    first = %existing.pointer,
                    second = pointer,
                    "Components normalize to the same name, keeping the first"
                );
            }
            return Ok(named);
        }

        // Validate the whole alias chain before registering anything
        let node = self.components.resolve(pointer)?;
        let description = match node {
            ComponentNode::Schema(schema) => schema.description.clone(),
            ComponentNode::Response(response) => response.description.clone(),
            ComponentNode::RequestBody(body) => body.description.clone(),
            ComponentNode::Parameter(_) => None,
        };

        let slot = self.registry.reserve(NamedType {
            canonical_name,
            kind,
            pointer: pointer.to_string(),
            shape: TsType::unknown(),
            description,
        });
        self.resolving.insert(pointer.to_string());

        let shape = match self.components.alias_target(pointer) {
            Some(target) => self.reference(kind, target),
            None => match node {
                ComponentNode::Schema(schema) => self.schema(schema),
                ComponentNode::Response(response) => self.response_content(response),
                ComponentNode::RequestBody(body) => self.body_content(body),
                ComponentNode::Parameter(_) => Err(CodegenError::unresolved(pointer)),
            },
        };

        self.resolving.remove(pointer);
        self.registry.complete(slot, shape?);
        Ok(named)
    }

    // =========================================================================
    // Responses and bodies
    // =========================================================================

    /// Type of a response, named when the response is a component.
    pub fn response(&mut self, source: &'a MaybeRef<Response>) -> Result<TsType, CodegenError> {
        match source {
            MaybeRef::Ref { ref_path } => self.reference(ComponentKind::Responses, ref_path),
            MaybeRef::Item(response) => self.response_content(response),
        }
    }

    /// Type of a request body, named when the body is a component.
    pub fn request_body(
        &mut self,
        source: &'a MaybeRef<RequestBody>,
    ) -> Result<TsType, CodegenError> {
        match source {
            MaybeRef::Ref { ref_path } => self.reference(ComponentKind::RequestBodies, ref_path),
            MaybeRef::Item(body) => self.body_content(body),
        }
    }

    fn response_content(&mut self, response: &'a Response) -> Result<TsType, CodegenError> {
        self.content(&response.content)
    }

    fn body_content(&mut self, body: &'a RequestBody) -> Result<TsType, CodegenError> {
        self.content(&body.content)
    }

    /// `application/json` first, then any JSON flavour, then the first media
    /// type with a schema. No schema at all means `undefined`.
    fn content(
        &mut self,
        content: &'a IndexMap<String, MediaType>,
    ) -> Result<TsType, CodegenError> {
        let with_schema = || {
            content
                .iter()
                .filter_map(|(media, m)| m.schema.as_ref().map(|s| (media, s)))
        };
        let chosen = with_schema()
            .find(|(media, _)| *media == "application/json")
            .or_else(|| with_schema().find(|(media, _)| media.contains("json")))
            .or_else(|| with_schema().next());

        match chosen {
            Some((_, schema)) => self.schema(schema),
            None => Ok(TsType::undefined()),
        }
    }

    /// Type of the lowest declared 2xx response, `undefined` if none.
    pub fn success_type(
        &mut self,
        responses: &[ResponseDescriptor<'a>],
    ) -> Result<TsType, CodegenError> {
        let chosen = responses
            .iter()
            .filter(|r| matches!(r.status, StatusPattern::Literal(_)) && r.status.is_success())
            .min_by_key(|r| r.status)
            .or_else(|| {
                responses
                    .iter()
                    .find(|r| r.status == StatusPattern::Class(StatusClass::Success))
            });

        match chosen {
            Some(response) => self.response(response.source),
            None => Ok(TsType::undefined()),
        }
    }

    /// Union of `{ status; payload }` for every non-2xx response.
    pub fn error_type(
        &mut self,
        responses: &[ResponseDescriptor<'a>],
    ) -> Result<TsType, CodegenError> {
        let mut errors: Vec<&ResponseDescriptor<'a>> =
            responses.iter().filter(|r| !r.status.is_success()).collect();
        errors.sort_by_key(|r| r.status);

        let literal_error_codes: Vec<u16> = errors
            .iter()
            .filter_map(|r| match r.status {
                StatusPattern::Literal(code) if code >= 400 => Some(code),
                _ => None,
            })
            .collect();

        let mut members = Vec::with_capacity(errors.len());
        for response in errors {
            let status = match response.status {
                StatusPattern::Literal(code) => TsType::Literal(TsLiteral::Int(i64::from(code))),
                StatusPattern::Class(class) => {
                    self.ranges.insert(class);
                    TsType::StatusRange(class)
                }
                StatusPattern::Default => self.default_status(&literal_error_codes),
            };
            members.push(TsType::Object(vec![
                TsProp::new("status", status, false),
                TsProp::new("payload", self.response(response.source)?, false),
            ]));
        }

        Ok(if members.is_empty() {
            TsType::undefined()
        } else {
            TsType::union(members)
        })
    }

    /// Any client or server error status not declared explicitly.
    fn default_status(&mut self, declared: &[u16]) -> TsType {
        self.ranges.insert(StatusClass::ClientError);
        self.ranges.insert(StatusClass::ServerError);
        let ranges = TsType::Union(vec![
            TsType::StatusRange(StatusClass::ClientError),
            TsType::StatusRange(StatusClass::ServerError),
        ]);
        if declared.is_empty() {
            return ranges;
        }
        let excluded = declared
            .iter()
            .map(|&code| TsType::Literal(TsLiteral::Int(i64::from(code))))
            .collect();
        TsType::Generic {
            name: "Exclude".into(),
            args: vec![ranges, TsType::union(excluded)],
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Object type for one parameter group, `None` when the group is empty.
    pub fn parameters(
        &mut self,
        params: &[ParameterDescriptor<'a>],
    ) -> Result<Option<TsType>, CodegenError> {
        if params.is_empty() {
            return Ok(None);
        }

        let mut props = Vec::with_capacity(params.len());
        for param in params {
            let name = match param.location {
                ParamLocation::Path => to_camel_case(param.name),
                ParamLocation::Query | ParamLocation::Header => param.name.to_string(),
            };
            let injected = param.location == ParamLocation::Header
                && self.config.is_injected_header(param.name);
            let ty = match param.schema {
                Some(schema) => self.schema(schema)?,
                None => TsType::Primitive(TsPrimitive::String),
            };
            props.push(TsProp {
                name,
                ty,
                optional: !param.required || injected,
                doc: param.description.map(str::to_string),
            });
        }
        Ok(Some(TsType::Object(props)))
    }

    /// Synthesize every type of one operation.
    pub fn operation(
        &mut self,
        op: &OperationDescriptor<'a>,
    ) -> Result<OperationTypes, CodegenError> {
        let path_params = self.parameters(&op.path_parameters)?;
        let query_params = self.parameters(&op.query_parameters)?;
        let headers = self.parameters(&op.header_parameters)?;

        let body = match &op.request_body {
            Some(descriptor) => {
                let ty = self.request_body(descriptor.source)?;
                if ty == TsType::undefined() {
                    None
                } else {
                    Some(BodyType {
                        inline: !matches!(ty, TsType::Component { .. }),
                        ty,
                        required: descriptor.required,
                    })
                }
            }
            None => None,
        };

        Ok(OperationTypes {
            path_params,
            query_params,
            headers,
            body,
            response: self.success_type(&op.responses_by_status)?,
            error: self.error_type(&op.responses_by_status)?,
        })
    }
}

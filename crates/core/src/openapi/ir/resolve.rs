//! Reference resolution against `#/components/...`.
//!
//! [`ComponentRegistry`] indexes every component once. Resolving a pointer
//! follows component-to-component aliases (a response component that is
//! itself a `$ref` to another response, and so on) until a concrete node is
//! reached. The returned reference points into the parsed document, so two
//! resolutions of the same pointer yield the same node.

use std::collections::{HashMap, HashSet};

use crate::error::CodegenError;
use crate::openapi::spec::{MaybeRef, OpenApiSpec, Parameter, RequestBody, Response, Schema};

/// Component sections the generator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Schemas,
    Parameters,
    Responses,
    RequestBodies,
}

impl ComponentKind {
    /// Every kind, in output file order.
    pub const ALL: [Self; 4] = [
        Self::Schemas,
        Self::Parameters,
        Self::Responses,
        Self::RequestBodies,
    ];

    /// Section name under `#/components/`.
    pub fn section(self) -> &'static str {
        match self {
            Self::Schemas => "schemas",
            Self::Parameters => "parameters",
            Self::Responses => "responses",
            Self::RequestBodies => "requestBodies",
        }
    }

    /// Namespace alias used when another file imports this kind.
    pub fn namespace(self) -> &'static str {
        match self {
            Self::Schemas => "Schemas",
            Self::Parameters => "Parameters",
            Self::Responses => "Responses",
            Self::RequestBodies => "RequestBodies",
        }
    }

    /// Split `#/components/<section>/<name>` into kind and unescaped name.
    pub fn parse_pointer(pointer: &str) -> Option<(Self, String)> {
        let rest = pointer.strip_prefix("#/components/")?;
        let (section, name) = rest.split_once('/')?;
        let kind = Self::ALL.into_iter().find(|kind| kind.section() == section)?;
        if name.is_empty() || name.contains('/') {
            return None;
        }
        Some((kind, name.replace("~1", "/").replace("~0", "~")))
    }

    /// Pointer for a component name.
    pub fn pointer(self, name: &str) -> String {
        let escaped = name.replace('~', "~0").replace('/', "~1");
        format!("#/components/{}/{escaped}", self.section())
    }
}

/// A concrete component node.
#[derive(Debug, Clone, Copy)]
pub enum ComponentNode<'a> {
    Schema(&'a Schema),
    Parameter(&'a Parameter),
    Response(&'a Response),
    RequestBody(&'a RequestBody),
}

#[derive(Debug, Clone, Copy)]
enum Entry<'a> {
    Node(ComponentNode<'a>),
    Alias(&'a str),
}

/// Index of every component keyed by its JSON pointer.
#[derive(Debug, Default)]
pub struct ComponentRegistry<'a> {
    entries: HashMap<String, Entry<'a>>,
}

impl<'a> ComponentRegistry<'a> {
    /// Index the components of a document.
    pub fn build(spec: &'a OpenApiSpec) -> Self {
        let mut entries = HashMap::new();
        let Some(components) = &spec.components else {
            return Self { entries };
        };

        for (name, schema) in components.schemas.iter() {
            let entry = match &schema.ref_path {
                Some(target) => Entry::Alias(target.as_str()),
                None => Entry::Node(ComponentNode::Schema(schema)),
            };
            entries.insert(ComponentKind::Schemas.pointer(name), entry);
        }
        for (name, parameter) in components.parameters.iter() {
            entries.insert(
                ComponentKind::Parameters.pointer(name),
                index_entry(parameter, ComponentNode::Parameter),
            );
        }
        for (name, response) in components.responses.iter() {
            entries.insert(
                ComponentKind::Responses.pointer(name),
                index_entry(response, ComponentNode::Response),
            );
        }
        for (name, body) in components.request_bodies.iter() {
            entries.insert(
                ComponentKind::RequestBodies.pointer(name),
                index_entry(body, ComponentNode::RequestBody),
            );
        }

        tracing::debug!(components = entries.len(), "Indexed components");
        Self { entries }
    }

    /// Follow a pointer, through any alias chain, to a concrete node.
    pub fn resolve(&self, pointer: &str) -> Result<ComponentNode<'a>, CodegenError> {
        let mut visited = HashSet::new();
        let mut current = pointer;
        loop {
            if !visited.insert(current) {
                return Err(CodegenError::CircularRef {
                    pointer: current.to_string(),
                });
            }
            match self.entries.get(current) {
                None => return Err(CodegenError::unresolved(current)),
                Some(Entry::Node(node)) => return Ok(*node),
                Some(Entry::Alias(target)) => current = *target,
            }
        }
    }

    /// Target of a component that is itself a `$ref`, if any.
    pub fn alias_target(&self, pointer: &str) -> Option<&'a str> {
        match self.entries.get(pointer) {
            Some(Entry::Alias(target)) => Some(*target),
            _ => None,
        }
    }

    /// Resolve a pointer that must land on a schema.
    pub fn resolve_schema(&self, pointer: &str) -> Result<&'a Schema, CodegenError> {
        match self.resolve(pointer)? {
            ComponentNode::Schema(schema) => Ok(schema),
            _ => Err(CodegenError::unresolved(pointer)),
        }
    }

    /// Resolve an inline-or-referenced parameter.
    pub fn parameter(&self, item: &'a MaybeRef<Parameter>) -> Result<&'a Parameter, CodegenError> {
        match item {
            MaybeRef::Item(parameter) => Ok(parameter),
            MaybeRef::Ref { ref_path } => match self.resolve(ref_path)? {
                ComponentNode::Parameter(parameter) => Ok(parameter),
                _ => Err(CodegenError::unresolved(ref_path.as_str())),
            },
        }
    }

    /// Resolve an inline-or-referenced response.
    pub fn response(&self, item: &'a MaybeRef<Response>) -> Result<&'a Response, CodegenError> {
        match item {
            MaybeRef::Item(response) => Ok(response),
            MaybeRef::Ref { ref_path } => match self.resolve(ref_path)? {
                ComponentNode::Response(response) => Ok(response),
                _ => Err(CodegenError::unresolved(ref_path.as_str())),
            },
        }
    }

    /// Resolve an inline-or-referenced request body.
    pub fn request_body(
        &self,
        item: &'a MaybeRef<RequestBody>,
    ) -> Result<&'a RequestBody, CodegenError> {
        match item {
            MaybeRef::Item(body) => Ok(body),
            MaybeRef::Ref { ref_path } => match self.resolve(ref_path)? {
                ComponentNode::RequestBody(body) => Ok(body),
                _ => Err(CodegenError::unresolved(ref_path.as_str())),
            },
        }
    }
}

fn index_entry<'a, T>(
    item: &'a MaybeRef<T>,
    node: impl FnOnce(&'a T) -> ComponentNode<'a>,
) -> Entry<'a> {
    match item {
        MaybeRef::Ref { ref_path } => Entry::Alias(ref_path.as_str()),
        MaybeRef::Item(value) => Entry::Node(node(value)),
    }
}

//! TypeScript IR types for code generation.
//!
//! This module defines the TypeScript syntax the generator can produce:
//! - TsType: Types (primitives, arrays, unions, objects, component refs, etc.)
//! - TsExpr: Expressions (calls, arrows, object literals)
//! - TsModule: A whole output file (banner, imports, declarations)

use super::api::StatusClass;
use super::resolve::ComponentKind;

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, undefined, unknown, never
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Intersection type: A & B & C
    Intersection(Vec<TsType>),
    /// Object type: { foo: string; bar?: number }
    Object(Vec<TsProp>),
    /// Record type: Record<K, V>
    Record {
        key: Box<TsType>,
        value: Box<TsType>,
    },
    /// Literal type: "foo", 42, true
    Literal(TsLiteral),
    /// Named type reference already valid in the current file
    Ref(String),
    /// Generic instantiation: Exclude<A, B>, Fetcher.ErrorWrapper<T>
    Generic { name: String, args: Vec<TsType> },
    /// Named type living in a component file, qualified per output file
    Component { kind: ComponentKind, name: String },
    /// Status-range alias from the utils file
    StatusRange(StatusClass),
}

impl TsType {
    /// `unknown`
    pub const fn unknown() -> Self {
        Self::Primitive(TsPrimitive::Unknown)
    }

    /// `undefined`
    pub const fn undefined() -> Self {
        Self::Primitive(TsPrimitive::Undefined)
    }

    /// Build a union, flattening nested unions and collapsing a single member.
    pub fn union(members: Vec<TsType>) -> Self {
        let mut flat = Vec::with_capacity(members.len());
        for member in members {
            match member {
                TsType::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Self::Primitive(TsPrimitive::Never),
            1 => flat.remove(0),
            _ => Self::Union(flat),
        }
    }

    /// Add `null` to a type unless it is already present.
    pub fn nullable(self) -> Self {
        match self {
            TsType::Union(members) if members.iter().any(TsType::is_null) => {
                TsType::Union(members)
            }
            ty if ty.is_null() => ty,
            other => Self::union(vec![other, Self::Primitive(TsPrimitive::Null)]),
        }
    }

    /// `null`, either as the primitive or as an enum literal.
    fn is_null(&self) -> bool {
        matches!(
            self,
            TsType::Primitive(TsPrimitive::Null) | TsType::Literal(TsLiteral::Null)
        )
    }

    /// Whether an object type has at least one required field. Non-object types count as required.
    pub fn has_required_fields(&self) -> bool {
        match self {
            TsType::Object(props) => props.iter().any(|p| !p.optional),
            _ => true,
        }
    }
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Unknown,
    Never,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
    /// Rendered as JSDoc when the enclosing object is printed as a block.
    pub doc: Option<String>,
}

impl TsProp {
    /// Property without documentation.
    pub fn new(name: impl Into<String>, ty: TsType, optional: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            optional,
            doc: None,
        }
    }
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    Null,
}

/// TypeScript expression
#[derive(Debug, Clone, PartialEq)]
pub enum TsExpr {
    /// Identifier: foo
    Ident(String),
    /// Literal value: "bar", 42
    Literal(TsLiteral),
    /// Function call: foo<T>(a, b)
    Call {
        callee: Box<TsExpr>,
        type_args: Vec<TsType>,
        args: Vec<TsExpr>,
    },
    /// Arrow function: (x) => x.foo
    Arrow {
        params: Vec<TsParam>,
        body: Box<TsExpr>,
    },
    /// Object literal: { a: 1, ...rest, b }
    Object(Vec<ObjectEntry>),
}

impl TsExpr {
    /// Identifier expression.
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    /// String literal expression.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(TsLiteral::String(value.into()))
    }

    /// Plain call without type arguments.
    pub fn call(callee: impl Into<String>, args: Vec<TsExpr>) -> Self {
        Self::Call {
            callee: Box::new(Self::Ident(callee.into())),
            type_args: Vec::new(),
            args,
        }
    }
}

/// Entry of an object literal
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEntry {
    /// key: value
    Prop(String, TsExpr),
    /// key
    Shorthand(String),
    /// ...expr
    Spread(TsExpr),
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    /// Identifier or destructuring pattern.
    pub name: String,
    pub ty: Option<TsType>,
    pub optional: bool,
}

// =============================================================================
// Module-Level IR (for printer)
// =============================================================================

/// Import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsImport {
    /// `import * as <namespace>`; mutually exclusive with `items`
    pub namespace: Option<String>,
    /// Named items to import
    pub items: Vec<String>,
    /// Module path
    pub from: String,
    /// Whether this is a type-only import
    pub type_only: bool,
}

/// Type alias definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeDef {
    pub name: String,
    pub type_params: Vec<String>,
    pub ty: TsType,
    pub is_export: bool,
    pub doc: Option<String>,
}

impl TsTypeDef {
    /// `export type <name> = <ty>;`
    pub fn alias(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            ty,
            is_export: true,
            doc: None,
        }
    }

    /// Attach documentation.
    pub fn with_doc(mut self, doc: Option<String>) -> Self {
        self.doc = doc;
        self
    }
}

/// Statement in a function body
#[derive(Debug, Clone, PartialEq)]
pub enum TsStmt {
    /// Return statement
    Return(TsExpr),
}

/// Function definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsFunction {
    pub name: String,
    pub params: Vec<TsParam>,
    pub return_type: Option<TsType>,
    pub body: Vec<TsStmt>,
    pub is_export: bool,
    pub doc: Option<String>,
}

/// Top-level declaration, kept in introduction order
#[derive(Debug, Clone, PartialEq)]
pub enum TsItem {
    Type(TsTypeDef),
    Function(TsFunction),
}

/// Complete TypeScript module
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsModule {
    /// Leading comment block, emitted verbatim
    pub banner: Option<String>,
    pub imports: Vec<TsImport>,
    pub items: Vec<TsItem>,
}

impl TsModule {
    /// Whether the module declares nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

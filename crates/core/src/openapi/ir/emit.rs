//! TypeScript code emission via the Emit trait.
//!
//! Each AST type implements `Emit` for its single-line form. Declarations
//! additionally use the `emit_block` helpers, which break non-empty object
//! types and object literals over several lines and print JSDoc for
//! documented properties.

use super::types::{
    ObjectEntry, TsExpr, TsFunction, TsImport, TsItem, TsLiteral, TsModule, TsParam, TsPrimitive,
    TsProp, TsStmt, TsType, TsTypeDef,
};
use super::utils::{escape_js_string, format_doc, quote_if_needed};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

fn indent_str(indent: usize) -> String {
    "  ".repeat(indent)
}

// =============================================================================
// Primitive Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string".to_string(),
            TsPrimitive::Number => "number".to_string(),
            TsPrimitive::Boolean => "boolean".to_string(),
            TsPrimitive::Null => "null".to_string(),
            TsPrimitive::Undefined => "undefined".to_string(),
            TsPrimitive::Unknown => "unknown".to_string(),
            TsPrimitive::Never => "never".to_string(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                // Wrap complex types in parentheses
                if matches!(**inner, TsType::Union(_) | TsType::Intersection(_)) {
                    format!("({})[]", inner_str)
                } else {
                    format!("{}[]", inner_str)
                }
            }
            TsType::Union(types) => types.iter().map(|t| t.emit()).collect::<Vec<_>>().join(" | "),
            TsType::Intersection(types) => types
                .iter()
                .map(|t| {
                    let s = t.emit();
                    if matches!(t, TsType::Union(_)) {
                        format!("({})", s)
                    } else {
                        s
                    }
                })
                .collect::<Vec<_>>()
                .join(" & "),
            TsType::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<_> = props.iter().map(|p| p.emit()).collect();
                    format!("{{ {} }}", parts.join("; "))
                }
            }
            TsType::Record { key, value } => {
                format!("Record<{}, {}>", key.emit(), value.emit())
            }
            TsType::Literal(lit) => lit.emit(),
            TsType::Ref(name) => name.clone(),
            TsType::Generic { name, args } => {
                let args_str = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("{name}<{args_str}>")
            }
            TsType::Component { kind, name } => format!("{}.{name}", kind.namespace()),
            TsType::StatusRange(class) => class.range_type_name().to_string(),
        }
    }
}

impl TsType {
    /// Multi-line rendering for declaration position.
    ///
    /// `indent` is the level of the line the type starts on; closing braces
    /// return to it.
    pub fn emit_block(&self, indent: usize) -> String {
        match self {
            TsType::Object(props) if !props.is_empty() => {
                let mut out = "{\n".to_string();
                for prop in props {
                    out.push_str(&prop.emit_block(indent + 1));
                }
                out.push_str(&indent_str(indent));
                out.push('}');
                out
            }
            TsType::Union(types) => types
                .iter()
                .map(|t| t.emit_block(indent))
                .collect::<Vec<_>>()
                .join(" | "),
            TsType::Intersection(types) => types
                .iter()
                .map(|t| {
                    let s = t.emit_block(indent);
                    if matches!(t, TsType::Union(_)) {
                        format!("({s})")
                    } else {
                        s
                    }
                })
                .collect::<Vec<_>>()
                .join(" & "),
            TsType::Generic { name, args } => {
                let args_str = args
                    .iter()
                    .map(|a| a.emit_block(indent))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{name}<{args_str}>")
            }
            _ => self.emit(),
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", key, opt, self.ty.emit())
    }
}

impl TsProp {
    /// One property line (with JSDoc) inside a block object.
    pub fn emit_block(&self, indent: usize) -> String {
        let mut out = String::new();
        if let Some(doc) = &self.doc {
            out.push_str(&format_doc(doc, indent));
        }
        let key = quote_if_needed(&self.name);
        let opt = if self.optional { "?" } else { "" };
        out.push_str(&format!(
            "{}{}{}: {};\n",
            indent_str(indent),
            key,
            opt,
            self.ty.emit_block(indent)
        ));
        out
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

impl Emit for TsTypeDef {
    fn emit(&self) -> String {
        let mut output = String::new();
        if let Some(doc) = &self.doc {
            output.push_str(&format_doc(doc, 0));
        }
        if self.is_export {
            output.push_str("export ");
        }
        let type_params_str = if self.type_params.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.type_params.join(", "))
        };
        output.push_str(&format!(
            "type {}{} = {};\n",
            self.name,
            type_params_str,
            self.ty.emit_block(0)
        ));
        output
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for TsExpr {
    fn emit(&self) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Literal(lit) => lit.emit(),
            TsExpr::Call {
                callee,
                type_args,
                args,
            } => {
                let args_str = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("{}{}({})", callee.emit(), emit_type_args(type_args), args_str)
            }
            TsExpr::Arrow { params, body } => {
                let params_str = params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ");
                format!("({}) => {}", params_str, body.emit())
            }
            TsExpr::Object(entries) => {
                if entries.is_empty() {
                    "{}".to_string()
                } else {
                    let parts: Vec<_> = entries.iter().map(|e| e.emit()).collect();
                    format!("{{ {} }}", parts.join(", "))
                }
            }
        }
    }
}

fn emit_type_args(type_args: &[TsType]) -> String {
    if type_args.is_empty() {
        String::new()
    } else {
        let args = type_args.iter().map(|t| t.emit()).collect::<Vec<_>>();
        format!("<{}>", args.join(", "))
    }
}

impl TsExpr {
    /// Multi-line rendering: object literals passed as call arguments or
    /// returned from a function get one entry per line.
    pub fn emit_block(&self, indent: usize) -> String {
        match self {
            TsExpr::Object(entries) if !entries.is_empty() => {
                let pad = indent_str(indent + 1);
                let mut out = "{\n".to_string();
                for entry in entries {
                    out.push_str(&format!("{pad}{},\n", entry.emit()));
                }
                out.push_str(&indent_str(indent));
                out.push('}');
                out
            }
            TsExpr::Call {
                callee,
                type_args,
                args,
            } => {
                let args_str = args
                    .iter()
                    .map(|a| a.emit_block(indent))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}{}({})", callee.emit(), emit_type_args(type_args), args_str)
            }
            _ => self.emit(),
        }
    }
}

impl Emit for ObjectEntry {
    fn emit(&self) -> String {
        match self {
            ObjectEntry::Prop(key, value) => format!("{}: {}", quote_if_needed(key), value.emit()),
            ObjectEntry::Shorthand(key) => key.clone(),
            ObjectEntry::Spread(expr) => format!("...{}", expr.emit()),
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        match &self.ty {
            Some(ty) => format!("{}{}: {}", self.name, opt, ty.emit()),
            None => format!("{}{}", self.name, opt),
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for TsStmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl TsStmt {
    /// Emit with specified indentation level (2 spaces per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = indent_str(indent);
        match self {
            TsStmt::Return(expr) => format!("{}return {};\n", prefix, expr.emit_block(indent)),
        }
    }
}

// =============================================================================
// Functions
// =============================================================================

impl Emit for TsFunction {
    fn emit(&self) -> String {
        let mut output = String::new();

        if let Some(doc) = &self.doc {
            output.push_str(&format_doc(doc, 0));
        }

        // Export keyword
        if self.is_export {
            output.push_str("export ");
        }

        // Parameters
        let params_str = self.params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ");

        // Return type
        let return_type_str = self
            .return_type
            .as_ref()
            .map(|t| format!(": {}", t.emit_block(0)))
            .unwrap_or_default();

        // Arrow function: export const name = (...): Type => { ... }
        output.push_str(&format!(
            "const {} = ({}){}",
            self.name, params_str, return_type_str
        ));
        if self.body.is_empty() {
            output.push_str(" => {};\n");
        } else {
            output.push_str(" => {\n");
            for stmt in &self.body {
                output.push_str(&stmt.emit_indented(1));
            }
            output.push_str("};\n");
        }

        output
    }
}

// =============================================================================
// Imports
// =============================================================================

impl Emit for TsImport {
    fn emit(&self) -> String {
        let type_keyword = if self.type_only { "type " } else { "" };
        match &self.namespace {
            Some(namespace) => format!(
                "import {}* as {} from \"{}\";\n",
                type_keyword, namespace, self.from
            ),
            None => format!(
                "import {}{{ {} }} from \"{}\";\n",
                type_keyword,
                self.items.join(", "),
                self.from
            ),
        }
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsItem {
    fn emit(&self) -> String {
        match self {
            TsItem::Type(def) => def.emit(),
            TsItem::Function(func) => func.emit(),
        }
    }
}

impl Emit for TsModule {
    fn emit(&self) -> String {
        // Banner, import block and each declaration are separated by a blank line
        let mut sections = Vec::new();

        if let Some(banner) = &self.banner {
            sections.push(format!("{banner}\n"));
        }

        if !self.imports.is_empty() {
            sections.push(self.imports.iter().map(|i| i.emit()).collect::<String>());
        }

        sections.extend(self.items.iter().map(|item| item.emit()));

        sections.join("\n")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, ty: TsType, optional: bool) -> TsProp {
        TsProp::new(name, ty, optional)
    }

    #[test]
    fn test_emit_primitive() {
        assert_eq!(TsPrimitive::String.emit(), "string");
        assert_eq!(TsPrimitive::Number.emit(), "number");
        assert_eq!(TsPrimitive::Undefined.emit(), "undefined");
        assert_eq!(TsPrimitive::Never.emit(), "never");
        assert_eq!(TsPrimitive::Unknown.emit(), "unknown");
    }

    #[test]
    fn test_emit_literal() {
        assert_eq!(TsLiteral::String("hello".into()).emit(), "\"hello\"");
        assert_eq!(TsLiteral::String("say \"hi\"".into()).emit(), "\"say \\\"hi\\\"\"");
        assert_eq!(TsLiteral::Number(2.5).emit(), "2.5");
        assert_eq!(TsLiteral::Int(42).emit(), "42");
        assert_eq!(TsLiteral::Bool(true).emit(), "true");
        assert_eq!(TsLiteral::Null.emit(), "null");
    }

    #[test]
    fn test_emit_union_array() {
        // (string | null)[] - union inside array needs parens
        let inner = TsType::Union(vec![
            TsType::Primitive(TsPrimitive::String),
            TsType::Primitive(TsPrimitive::Null),
        ]);
        let ty = TsType::Array(Box::new(inner));
        assert_eq!(ty.emit(), "(string | null)[]");
    }

    #[test]
    fn test_emit_record_type() {
        let ty = TsType::Record {
            key: Box::new(TsType::Primitive(TsPrimitive::String)),
            value: Box::new(TsType::unknown()),
        };
        assert_eq!(ty.emit(), "Record<string, unknown>");
    }

    #[test]
    fn test_emit_object_type_inline() {
        let ty = TsType::Object(vec![
            prop("id", TsType::Primitive(TsPrimitive::Number), false),
            prop("x-trace", TsType::Primitive(TsPrimitive::String), true),
        ]);
        assert_eq!(ty.emit(), "{ id: number; \"x-trace\"?: string }");
    }

    #[test]
    fn test_emit_object_type_block_with_docs() {
        let mut name = prop("name", TsType::Primitive(TsPrimitive::String), true);
        name.doc = Some("Display name".into());
        let ty = TsType::Object(vec![
            prop("id", TsType::Primitive(TsPrimitive::Number), false),
            name,
        ]);
        let expected = "{\n  id: number;\n  /**\n   * Display name\n   */\n  name?: string;\n}";
        assert_eq!(ty.emit_block(0), expected);
    }

    #[test]
    fn test_emit_nested_block_indentation() {
        let inner = TsType::Object(vec![prop("limit", TsType::Primitive(TsPrimitive::Number), true)]);
        let ty = TsType::Intersection(vec![
            TsType::Object(vec![prop("queryParams", inner, true)]),
            TsType::Ref("Context[\"fetcherOptions\"]".into()),
        ]);
        let expected = "{\n  queryParams?: {\n    limit?: number;\n  };\n} & Context[\"fetcherOptions\"]";
        assert_eq!(ty.emit_block(0), expected);
    }

    #[test]
    fn test_emit_type_def_alias() {
        let def = TsTypeDef::alias("ID", TsType::Primitive(TsPrimitive::String));
        assert_eq!(def.emit(), "export type ID = string;\n");

        let documented = TsTypeDef::alias("ID", TsType::Primitive(TsPrimitive::String))
            .with_doc(Some("Identifier".into()));
        assert_eq!(documented.emit(), "/**\n * Identifier\n */\nexport type ID = string;\n");
    }

    #[test]
    fn test_emit_generic_type_def() {
        let def = TsTypeDef {
            name: "Box".into(),
            type_params: vec!["T".into()],
            ty: TsType::Generic {
                name: "Array".into(),
                args: vec![TsType::Ref("T".into())],
            },
            is_export: false,
            doc: None,
        };
        assert_eq!(def.emit(), "type Box<T> = Array<T>;\n");
    }

    #[test]
    fn test_emit_imports() {
        let namespace = TsImport {
            namespace: Some("Schemas".into()),
            items: vec![],
            from: "./petstoreSchemas".into(),
            type_only: true,
        };
        assert_eq!(
            namespace.emit(),
            "import type * as Schemas from \"./petstoreSchemas\";\n"
        );

        let named = TsImport {
            namespace: None,
            items: vec!["PetstoreContext".into(), "queryKeyFn".into()],
            from: "./petstoreContext".into(),
            type_only: false,
        };
        assert_eq!(
            named.emit(),
            "import { PetstoreContext, queryKeyFn } from \"./petstoreContext\";\n"
        );
    }

    #[test]
    fn test_emit_arrow_function_with_block_call() {
        let func = TsFunction {
            name: "fetchPing".into(),
            params: vec![TsParam {
                name: "signal".into(),
                ty: Some(TsType::Ref("AbortSignal".into())),
                optional: true,
            }],
            return_type: None,
            body: vec![TsStmt::Return(TsExpr::Call {
                callee: Box::new(TsExpr::ident("apiFetch")),
                type_args: vec![TsType::undefined()],
                args: vec![TsExpr::Object(vec![
                    ObjectEntry::Prop("url".into(), TsExpr::string("/ping")),
                    ObjectEntry::Shorthand("signal".into()),
                ])],
            })],
            is_export: true,
            doc: None,
        };
        let expected = "export const fetchPing = (signal?: AbortSignal) => {\n  return apiFetch<undefined>({\n    url: \"/ping\",\n    signal,\n  });\n};\n";
        assert_eq!(func.emit(), expected);
    }

    #[test]
    fn test_emit_module_separates_items() {
        let module = TsModule {
            banner: Some("/**\n * Banner\n */".into()),
            imports: vec![],
            items: vec![
                TsItem::Type(TsTypeDef::alias("A", TsType::Primitive(TsPrimitive::String))),
                TsItem::Type(TsTypeDef::alias("B", TsType::Primitive(TsPrimitive::Number))),
            ],
        };
        assert_eq!(
            module.emit(),
            "/**\n * Banner\n */\n\nexport type A = string;\n\nexport type B = number;\n"
        );
    }
}

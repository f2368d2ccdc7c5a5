//! Per-file import aggregation.
//!
//! Synthesized types refer to components and status ranges abstractly.
//! [`FileScope`] rewrites those references into identifiers that are valid
//! in one particular output file and records the imports they need.

use std::collections::BTreeSet;

use crate::config::OutputNames;

use super::resolve::ComponentKind;
use super::types::{ObjectEntry, TsExpr, TsImport, TsItem, TsStmt, TsType};

#[derive(Debug)]
struct ModuleImports {
    from: String,
    value_namespace: Option<String>,
    type_namespace: Option<String>,
    values: BTreeSet<String>,
    types: BTreeSet<String>,
}

/// Imports grouped by module, modules in first-use order.
#[derive(Debug, Default)]
pub struct ImportSet {
    modules: Vec<ModuleImports>,
}

impl ImportSet {
    fn module(&mut self, from: &str) -> &mut ModuleImports {
        let index = match self.modules.iter().position(|m| m.from == from) {
            Some(index) => index,
            None => {
                self.modules.push(ModuleImports {
                    from: from.to_string(),
                    value_namespace: None,
                    type_namespace: None,
                    values: BTreeSet::new(),
                    types: BTreeSet::new(),
                });
                self.modules.len() - 1
            }
        };
        &mut self.modules[index]
    }

    /// `import * as <alias> from "<from>"`
    pub fn value_namespace(&mut self, alias: &str, from: &str) {
        self.module(from).value_namespace = Some(alias.to_string());
    }

    /// `import type * as <alias> from "<from>"`
    pub fn type_namespace(&mut self, alias: &str, from: &str) {
        self.module(from).type_namespace = Some(alias.to_string());
    }

    /// `import { <name> } from "<from>"`
    pub fn value(&mut self, name: &str, from: &str) {
        self.module(from).values.insert(name.to_string());
    }

    /// `import type { <name> } from "<from>"`
    pub fn type_only(&mut self, name: &str, from: &str) {
        self.module(from).types.insert(name.to_string());
    }

    /// Import statements: per module, namespaces before named imports and
    /// value imports before type-only ones.
    pub fn into_imports(self) -> Vec<TsImport> {
        let mut imports = Vec::new();
        for module in self.modules {
            let namespaces = [
                (module.value_namespace, false),
                (module.type_namespace, true),
            ];
            for (namespace, type_only) in namespaces {
                if let Some(namespace) = namespace {
                    imports.push(TsImport {
                        namespace: Some(namespace),
                        items: Vec::new(),
                        from: module.from.clone(),
                        type_only,
                    });
                }
            }
            for (items, type_only) in [(module.values, false), (module.types, true)] {
                if !items.is_empty() {
                    imports.push(TsImport {
                        namespace: None,
                        items: items.into_iter().collect(),
                        from: module.from.clone(),
                        type_only,
                    });
                }
            }
        }
        imports
    }
}

/// Reference rewriting for one output file.
#[derive(Debug)]
pub struct FileScope<'n> {
    names: &'n OutputNames,
    /// Component kind declared by this file, referenced without a namespace
    own: Option<ComponentKind>,
    imports: ImportSet,
}

impl<'n> FileScope<'n> {
    pub fn new(names: &'n OutputNames, own: Option<ComponentKind>) -> Self {
        Self {
            names,
            own,
            imports: ImportSet::default(),
        }
    }

    /// Direct access for imports that do not come from type references.
    pub fn imports_mut(&mut self) -> &mut ImportSet {
        &mut self.imports
    }

    /// Rewrite component and status-range references inside a type.
    pub fn localize_type(&mut self, ty: &mut TsType) {
        match ty {
            TsType::Component { kind, name } => {
                let kind = *kind;
                let local = if self.own == Some(kind) {
                    std::mem::take(name)
                } else {
                    let from = OutputNames::import_path(self.names.schemas_files.file_for(kind));
                    self.imports.type_namespace(kind.namespace(), &from);
                    format!("{}.{name}", kind.namespace())
                };
                *ty = TsType::Ref(local);
            }
            TsType::StatusRange(class) => {
                let name = class.range_type_name();
                self.imports
                    .type_only(name, &OutputNames::import_path(&self.names.utils_file));
                *ty = TsType::Ref(name.to_string());
            }
            TsType::Array(inner) => self.localize_type(inner),
            TsType::Union(types) | TsType::Intersection(types) => {
                for t in types {
                    self.localize_type(t);
                }
            }
            TsType::Generic { args, .. } => {
                for t in args {
                    self.localize_type(t);
                }
            }
            TsType::Object(props) => {
                for prop in props {
                    self.localize_type(&mut prop.ty);
                }
            }
            TsType::Record { key, value } => {
                self.localize_type(key);
                self.localize_type(value);
            }
            TsType::Primitive(_) | TsType::Literal(_) | TsType::Ref(_) => {}
        }
    }

    fn localize_expr(&mut self, expr: &mut TsExpr) {
        match expr {
            TsExpr::Call {
                callee,
                type_args,
                args,
            } => {
                self.localize_expr(callee);
                for t in type_args {
                    self.localize_type(t);
                }
                for arg in args {
                    self.localize_expr(arg);
                }
            }
            TsExpr::Arrow { params, body } => {
                for param in params {
                    if let Some(ty) = &mut param.ty {
                        self.localize_type(ty);
                    }
                }
                self.localize_expr(body);
            }
            TsExpr::Object(entries) => {
                for entry in entries {
                    match entry {
                        ObjectEntry::Prop(_, value) | ObjectEntry::Spread(value) => {
                            self.localize_expr(value);
                        }
                        ObjectEntry::Shorthand(_) => {}
                    }
                }
            }
            TsExpr::Ident(_) | TsExpr::Literal(_) => {}
        }
    }

    /// Rewrite every type reachable from a declaration.
    pub fn localize_item(&mut self, item: &mut TsItem) {
        match item {
            TsItem::Type(def) => self.localize_type(&mut def.ty),
            TsItem::Function(func) => {
                for param in &mut func.params {
                    if let Some(ty) = &mut param.ty {
                        self.localize_type(ty);
                    }
                }
                if let Some(ty) = &mut func.return_type {
                    self.localize_type(ty);
                }
                for stmt in &mut func.body {
                    let TsStmt::Return(expr) = stmt;
                    self.localize_expr(expr);
                }
            }
        }
    }

    /// Finished import list.
    pub fn finish(self) -> Vec<TsImport> {
        self.imports.into_imports()
    }
}

//! Intermediate Representation for OpenAPI to TypeScript code generation.
//!
//! This module defines a layered pipeline:
//! 1. Resolution and extraction: components indexed by pointer, operations
//!    normalized into descriptors
//! 2. Synthesis: schemas become TypeScript types, named components are
//!    registered once
//! 3. Code generation and emission: TypeScript AST per output file, printed
//!    via the `Emit` trait
//!
//! ## Module Structure
//!
//! - `resolve`: `$ref` resolution against `#/components`
//! - `naming`: identifier normalization
//! - `api`: operation descriptors, status patterns, routing
//! - `extract`: document -> operation descriptors
//! - `synth`: schemas -> TypeScript types, named type registry
//! - `types`: TypeScript AST IR (TsType, TsExpr, TsFunction, TsModule)
//! - `imports`: per-file reference qualification and import lists
//! - `codegen`: descriptors + types -> TypeScript AST
//! - `emit`: TypeScript AST -> code strings (via Emit trait)
//! - `utils`: Common utilities shared across modules

pub mod api;
pub mod codegen;
pub mod emit;
pub mod extract;
pub mod imports;
pub mod naming;
pub mod resolve;
pub mod synth;
pub mod types;
pub mod utils;

pub use emit::Emit;

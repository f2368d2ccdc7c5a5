//! Naming engine.
//!
//! Turns raw operationIds, component keys and parameter names into the
//! identifiers that appear in generated code. Every conversion is pure and
//! deterministic; distinct raw inputs that land on the same identifier are
//! detected through [`NameTable`].

use std::collections::HashMap;

use crate::error::CodegenError;

/// Split a raw identifier into words.
///
/// Non-alphanumeric characters separate words, and so do case boundaries:
/// `listPets`, `list_pets`, `list-pets` and `ListPets` all split into
/// `["list", "Pets"]`-like pieces; acronyms stay together (`getHTTPStatus`
/// gives `get`, `HTTP`, `Status`).
pub fn split_words(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().next_back() {
            let lower_to_upper = (prev.is_lowercase() || prev.is_ascii_digit()) && c.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && chars.get(i + 1).is_some_and(|next| next.is_lowercase());
            if lower_to_upper || acronym_end {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

fn guard_leading_digit(ident: String) -> String {
    if ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("_{ident}")
    } else {
        ident
    }
}

/// `list_pets` -> `ListPets`.
pub fn to_pascal_case(raw: &str) -> String {
    let words = split_words(raw);
    if words.is_empty() {
        return "Empty".to_string();
    }
    guard_leading_digit(words.iter().map(|w| capitalize_word(w)).collect())
}

/// `list_pets` -> `listPets`.
pub fn to_camel_case(raw: &str) -> String {
    let words = split_words(raw);
    let Some((first, rest)) = words.split_first() else {
        return "empty".to_string();
    };
    let mut ident = first.to_lowercase();
    for word in rest {
        ident.push_str(&capitalize_word(word));
    }
    guard_leading_digit(ident)
}

/// Rewrite `{param}` placeholders of a path template to camelCase:
/// `/pets/{pet_id}` -> `/pets/{petId}`.
pub fn camelize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        out.push_str(&rest[..=open]);
        out.push_str(&to_camel_case(&rest[open + 1..open + close]));
        out.push('}');
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Identifiers derived from one operationId.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationNames {
    /// PascalCase base, prefix of every type name (`ListPets`).
    pub pascal: String,
    /// camelCase base (`listPets`).
    pub camel: String,
}

impl OperationNames {
    /// Derive names from a raw operationId.
    pub fn new(operation_id: &str) -> Self {
        Self {
            pascal: to_pascal_case(operation_id),
            camel: to_camel_case(operation_id),
        }
    }

    /// `ListPets` + `Response` -> `ListPetsResponse`.
    pub fn type_name(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.pascal)
    }

    /// `fetchListPets`
    pub fn fetch_fn(&self) -> String {
        format!("fetch{}", self.pascal)
    }

    /// `listPetsQuery`
    pub fn query_fn(&self) -> String {
        format!("{}Query", self.camel)
    }
}

/// Tracks which raw operationId claimed each generated base name.
#[derive(Debug, Default)]
pub struct NameTable {
    claimed: HashMap<String, String>,
}

impl NameTable {
    /// Claim the names for `operation_id`, failing if another id already maps to them.
    pub fn claim(&mut self, operation_id: &str) -> Result<OperationNames, CodegenError> {
        let names = OperationNames::new(operation_id);
        if let Some(first) = self.claimed.get(&names.pascal)
            && first != operation_id
        {
            return Err(CodegenError::NameCollision {
                name: names.pascal,
                first: first.clone(),
                second: operation_id.to_string(),
            });
        }
        self.claimed
            .insert(names.pascal.clone(), operation_id.to_string());
        Ok(names)
    }
}

//! Naming services: identifier casing and group-scoped uniqueness.
//!
//! The lowering core only talks to these through the [`Namer`] and
//! [`UniqueNames`] traits; the defaults here follow the conventions of the
//! generated client runtime (camelCase members, PascalCase types).

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{LazyLock, Mutex, PoisonError};

use tracing::trace;

/// Words the generated client cannot use as bare identifiers.
pub static RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "abstract",
        "assert",
        "boolean",
        "break",
        "byte",
        "case",
        "catch",
        "char",
        "class",
        "const",
        "continue",
        "default",
        "do",
        "double",
        "else",
        "enum",
        "extends",
        "false",
        "final",
        "finally",
        "float",
        "for",
        "goto",
        "if",
        "implements",
        "import",
        "instanceof",
        "int",
        "interface",
        "long",
        "native",
        "new",
        "null",
        "package",
        "private",
        "protected",
        "public",
        "return",
        "short",
        "static",
        "strictfp",
        "super",
        "switch",
        "synchronized",
        "this",
        "throw",
        "throws",
        "transient",
        "true",
        "try",
        "void",
        "volatile",
        "while",
    ]
    .into_iter()
    .collect()
});

/// Identifier casing service.
pub trait Namer: fmt::Debug + Send + Sync {
    /// `fooBar` form.
    fn camel_case(&self, name: &str) -> String {
        camel_case(name)
    }

    /// `FooBar` form.
    fn pascal_case(&self, name: &str) -> String {
        pascal_case(name)
    }

    /// Drop characters that cannot appear in an identifier.
    fn remove_invalid_characters(&self, name: &str) -> String {
        remove_invalid_characters(name)
    }
}

/// The stock casing rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamer;

impl Namer for DefaultNamer {}

/// Resolves a candidate name against the identifiers already in a scope.
pub trait UniqueNames: fmt::Debug + Send + Sync {
    /// Return a name for `owner` based on `candidate` that collides with
    /// neither the scope's identifiers nor any name in `siblings`.
    ///
    /// Repeated calls for the same owner return the same name.
    fn get_unique(&self, owner: &str, candidate: &str, siblings: &[&str]) -> String;
}

/// Group-scoped uniqueness resolver.
///
/// Allocation is serialized behind a mutex so one scope can be shared by
/// several threads lowering sibling operations.
#[derive(Debug, Default)]
pub struct NameScope {
    identifiers: HashSet<String>,
    allocations: Mutex<HashMap<String, String>>,
}

impl NameScope {
    /// A scope that already contains `identifiers`.
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            identifiers: identifiers
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
            allocations: Mutex::new(HashMap::new()),
        }
    }
}

impl UniqueNames for NameScope {
    fn get_unique(&self, owner: &str, candidate: &str, siblings: &[&str]) -> String {
        let mut allocations = self
            .allocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = allocations.get(owner) {
            return existing.clone();
        }

        let taken: HashSet<String> = siblings
            .iter()
            .map(|s| s.to_ascii_lowercase())
            .chain(
                allocations
                    .iter()
                    .filter(|(other, _)| other.as_str() != owner)
                    .map(|(_, name)| name.to_ascii_lowercase()),
            )
            .collect();
        let is_taken = |name: &str| {
            let lower = name.to_ascii_lowercase();
            self.identifiers.contains(&lower) || taken.contains(&lower)
        };

        let mut name = candidate.to_string();
        let mut suffix = 1;
        while is_taken(&name) {
            name = format!("{candidate}{suffix}");
            suffix += 1;
        }
        if name != candidate {
            trace!(owner, candidate, resolved = %name, "Resolved name collision in scope.");
        }

        allocations.insert(owner.to_string(), name.clone());
        drop(allocations);
        name
    }
}

/// Keep ASCII alphanumerics, `_` and word separators (`-`, `.`, space).
pub fn remove_invalid_characters(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ' '))
        .collect()
}

fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split(['-', '.', ' ', '_']).filter(|part| !part.is_empty())
}

/// Convert to camelCase, splitting on `-`, `.`, ` ` and `_`.
/// - Prepends `_` if the result starts with a digit
/// - Escapes reserved words with a `_` prefix
pub fn camel_case(name: &str) -> String {
    let mut result = String::new();
    for (i, part) in words(name).enumerate() {
        if i == 0 {
            result.push_str(&lowercase_first(part));
        } else {
            result.push_str(&capitalize_first(part));
        }
    }

    if result
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
    {
        result = format!("_{result}");
    }

    if RESERVED_WORDS.contains(result.as_str()) {
        result = format!("_{result}");
    }

    result
}

/// Convert to PascalCase, splitting on `-`, `.`, ` ` and `_`.
pub fn pascal_case(name: &str) -> String {
    words(name).map(capitalize_first).collect()
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lower-case the first letter of a string.
pub fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

//! Type identifiers used throughout the automodel crates.
//!
//! A [`TypeKey`] is the fully qualified name of a type in the catalog.
//! Generic types follow a small notation so that definitions and closed
//! constructions can be told apart without a descriptor:
//!
//! - open definition: `Shop.Repository`1` (name, backtick, arity)
//! - closed construction: `Shop.Repository`1[Shop.Order]`
//!
//! Arguments may themselves be closed generics; brackets nest.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Fully qualified name of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

const ROOT_OBJECT: &str = "object";

impl TypeKey {
    /// Creates a key without validating it. Use [`TypeKey::parse`] for
    /// untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parses and validates a key.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let key = Self(s.to_string());
        key.validate()?;
        Ok(key)
    }

    /// The bare root object type every class ultimately derives from.
    #[must_use]
    pub fn object() -> Self {
        Self(ROOT_OBJECT.to_string())
    }

    /// Builds the closed construction of a generic definition.
    #[must_use]
    pub fn closed(definition: &TypeKey, arguments: &[TypeKey]) -> Self {
        let args = arguments
            .iter()
            .map(TypeKey::as_str)
            .collect::<Vec<_>>()
            .join(",");
        Self(format!("{}[{}]", definition.0, args))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_object(&self) -> bool {
        self.0 == ROOT_OBJECT
    }

    /// True for an open generic definition such as `Repository`1`.
    pub fn is_generic_definition(&self) -> bool {
        self.0.contains('`') && !self.0.contains('[')
    }

    /// True for a closed construction such as `Repository`1[Order]`.
    pub fn is_constructed_generic(&self) -> bool {
        self.split_generic().is_some()
    }

    /// The open definition a closed construction was built from.
    pub fn generic_definition(&self) -> Option<TypeKey> {
        self.split_generic()
            .map(|(definition, _)| TypeKey::new(definition))
    }

    /// Type arguments of a closed construction, in declaration order.
    pub fn generic_arguments(&self) -> Vec<TypeKey> {
        match self.split_generic() {
            Some((_, inner)) => split_top_level(inner)
                .into_iter()
                .map(|arg| TypeKey::new(arg.trim()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Namespace portion of the key, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.definition_part().rsplit_once('.').map(|(ns, _)| ns)
    }

    /// Unqualified type name, without generic arguments.
    pub fn name(&self) -> &str {
        let definition = self.definition_part();
        definition
            .rsplit_once('.')
            .map_or(definition, |(_, name)| name)
    }

    /// Declared arity of a generic definition or construction.
    pub fn arity(&self) -> usize {
        self.definition_part()
            .rsplit_once('`')
            .and_then(|(_, n)| n.parse().ok())
            .unwrap_or(0)
    }

    /// Checks the key is non-empty, bracket-balanced, and that closed
    /// generics supply as many arguments as their definition declares.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |reason: &str| Error::InvalidTypeKey {
            key: self.0.clone(),
            reason: reason.to_string(),
        };

        if self.0.trim().is_empty() {
            return Err(invalid("type key is empty"));
        }
        if self.0.chars().any(char::is_whitespace) {
            return Err(invalid("type key contains whitespace"));
        }

        let mut depth = 0usize;
        for c in self.0.chars() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| invalid("unbalanced ']'"))?;
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(invalid("unbalanced '['"));
        }

        if self.0.contains('[') {
            let Some((definition, inner)) = self.split_generic() else {
                return Err(invalid("generic arguments must close the key"));
            };
            let definition = TypeKey::new(definition);
            if !definition.is_generic_definition() {
                return Err(invalid("generic arguments on a non-generic definition"));
            }
            let args = split_top_level(inner);
            if args.iter().any(|a| a.trim().is_empty()) {
                return Err(invalid("empty generic argument"));
            }
            if args.len() != definition.arity() {
                return Err(invalid("generic argument count does not match arity"));
            }
            for arg in args {
                TypeKey::new(arg.trim()).validate()?;
            }
        }
        Ok(())
    }

    fn split_generic(&self) -> Option<(&str, &str)> {
        let open = self.0.find('[')?;
        if !self.0.ends_with(']') {
            return None;
        }
        Some((&self.0[..open], &self.0[open + 1..self.0.len() - 1]))
    }

    fn definition_part(&self) -> &str {
        self.split_generic().map_or(self.0.as_str(), |(d, _)| d)
    }
}

/// Splits on commas that are not nested inside brackets.
fn split_top_level(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TypeKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<&str> for TypeKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TypeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for TypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

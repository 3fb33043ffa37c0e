//! Property value rewriting.
//!
//! A [`RuleSet`] maps a property name to an ordered list of
//! [`RewriteRule`]s. Rules for one property run in order, each one
//! substituting every non-overlapping match in the output of the previous
//! one. Tombstoned properties are never rewritten.
//!
//! Matching is byte-oriented, so property values that are not valid UTF-8
//! pass through untouched unless a pattern matches them.
//!
//! # Example
//!
//! ```rust
//! use svndump_rewrite::format::properties::PropertyValue;
//! use svndump_rewrite::{Lump, RuleSet};
//!
//! let mut rules = RuleSet::new();
//! rules.add("svn:author", "^jdoe$", "john.doe")?;
//!
//! let mut lump = Lump::default();
//! lump.properties_mut().set("svn:author", "jdoe");
//! rules.apply(&mut lump);
//!
//! assert_eq!(
//!     lump.properties().get("svn:author"),
//!     Some(&PropertyValue::from("john.doe"))
//! );
//! # Ok::<(), svndump_rewrite::Error>(())
//! ```

pub mod rules_file;

use std::borrow::Cow;

use regex::bytes::Regex;

use crate::format::properties::{PropertySet, PropertyValue};
use crate::lump::Lump;
use crate::{Error, Result};

/// One pattern/replacement pair.
///
/// The replacement may reference capture groups as `$1` or `${name}`;
/// write `$$` for a literal dollar sign.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    /// Compiles a rule for `property`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegex`] if `pattern` does not compile.
    pub fn new(property: &str, pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| Error::InvalidRegex {
            property: property.to_string(),
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern,
            replacement: replacement.into(),
        })
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// The replacement template.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replaces every match of the pattern in `value`.
    pub fn apply<'a>(&self, value: &'a [u8]) -> Cow<'a, [u8]> {
        self.pattern
            .replace_all(value, self.replacement.as_bytes())
    }
}

/// Ordered mapping from property name to its rewrite rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(String, Vec<RewriteRule>)>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule for `property`, after any rules it already has.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegex`] if `pattern` does not compile.
    pub fn add(
        &mut self,
        property: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<()> {
        let property = property.into();
        let rule = RewriteRule::new(&property, pattern, replacement)?;
        self.push(property, rule);
        Ok(())
    }

    /// Appends an already compiled rule for `property`.
    pub fn push(&mut self, property: impl Into<String>, rule: RewriteRule) {
        let property = property.into();
        match self.rules.iter_mut().find(|(name, _)| *name == property) {
            Some((_, list)) => list.push(rule),
            None => self.rules.push((property, vec![rule])),
        }
    }

    /// The rules for `property`, in application order.
    pub fn rules_for(&self, property: &str) -> &[RewriteRule] {
        self.rules
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates over property names that have rules.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }

    /// Total number of rules across all properties.
    pub fn len(&self) -> usize {
        self.rules.iter().map(|(_, list)| list.len()).sum()
    }

    /// Returns `true` if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs `property`'s rules over `value` in order.
    ///
    /// Returns `None` when no rule changed the value.
    pub fn rewrite_value(&self, property: &str, value: &[u8]) -> Option<Vec<u8>> {
        let mut current: Cow<'_, [u8]> = Cow::Borrowed(value);
        for rule in self.rules_for(property) {
            let next = match rule.apply(&current) {
                Cow::Owned(v) => Some(v),
                Cow::Borrowed(_) => None,
            };
            if let Some(v) = next {
                current = Cow::Owned(v);
            }
        }
        match current {
            Cow::Owned(v) if v != value => Some(v),
            _ => None,
        }
    }

    /// Rewrites the values in `props`, returning how many changed.
    pub fn apply_to_properties(&self, props: &mut PropertySet) -> usize {
        if self.is_empty() {
            return 0;
        }
        let mut changed = 0;
        for (name, value) in props.iter_mut() {
            let PropertyValue::Value(bytes) = value else {
                continue;
            };
            if let Some(new_value) = self.rewrite_value(name, bytes) {
                log::debug!(
                    "rewrote property '{}': {:?} -> {:?}",
                    name,
                    String::from_utf8_lossy(bytes),
                    String::from_utf8_lossy(&new_value)
                );
                *bytes = new_value;
                changed += 1;
            }
        }
        changed
    }

    /// Rewrites the properties of `lump`, returning how many changed.
    ///
    /// Headers are not touched; derived lengths are recomputed when the
    /// record is written.
    pub fn apply(&self, lump: &mut Lump) -> usize {
        self.apply_to_properties(lump.properties_mut())
    }
}

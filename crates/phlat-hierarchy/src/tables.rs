//! Property and constant tables
//!
//! A class scope delegates its variable and constant bookkeeping here.
//! Property names are case-sensitive (unlike class and method names);
//! the tables answer the visibility/static queries the export surface
//! and downstream collectors need.

use crate::method::Visibility;
use std::collections::HashMap;

/// A declared property
#[derive(Debug, Clone)]
pub struct PropertyInfo {
    name: String,
    visibility: Visibility,
    is_static: bool,
    has_default: bool,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            has_default: false,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_default(mut self, has_default: bool) -> Self {
        self.has_default = has_default;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }
}

/// Per-class property table
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    properties: HashMap<String, PropertyInfo>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property; the first declaration of a name wins
    pub fn add(&mut self, property: PropertyInfo) -> bool {
        match self.properties.entry(property.name.clone()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(v) => {
                v.insert(property);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn is_public(&self, name: &str) -> bool {
        self.get(name).is_some_and(|p| p.visibility == Visibility::Public)
    }

    pub fn is_protected(&self, name: &str) -> bool {
        self.get(name).is_some_and(|p| p.visibility == Visibility::Protected)
    }

    pub fn is_private(&self, name: &str) -> bool {
        self.get(name).is_some_and(|p| p.visibility == Visibility::Private)
    }

    pub fn is_static(&self, name: &str) -> bool {
        self.get(name).is_some_and(|p| p.is_static)
    }

    /// All property names, sorted for stable export
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.properties.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// A declared class constant
#[derive(Debug, Clone)]
pub struct ConstantInfo {
    name: String,
    visibility: Visibility,
}

impl ConstantInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }
}

/// Per-class constant table
#[derive(Debug, Clone, Default)]
pub struct ConstantTable {
    constants: HashMap<String, ConstantInfo>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constant; the first declaration of a name wins
    pub fn add(&mut self, constant: ConstantInfo) -> bool {
        match self.constants.entry(constant.name.clone()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(v) => {
                v.insert(constant);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ConstantInfo> {
        self.constants.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.constants.contains_key(name)
    }

    /// All constant names, sorted for stable export
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.constants.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_visibility_queries() {
        let mut table = PropertyTable::new();
        table.add(PropertyInfo::new("id"));
        table.add(PropertyInfo::new("secret").with_visibility(Visibility::Private));
        table.add(PropertyInfo::new("count").with_visibility(Visibility::Protected).with_static(true));

        assert!(table.is_public("id"));
        assert!(table.is_private("secret"));
        assert!(table.is_protected("count"));
        assert!(table.is_static("count"));
        assert!(!table.is_static("id"));
        // unknown names answer false everywhere
        assert!(!table.is_public("missing"));
    }

    #[test]
    fn test_properties_are_case_sensitive() {
        let mut table = PropertyTable::new();
        table.add(PropertyInfo::new("name"));
        assert!(table.has("name"));
        assert!(!table.has("Name"));
    }

    #[test]
    fn test_first_declaration_wins() {
        let mut table = PropertyTable::new();
        assert!(table.add(PropertyInfo::new("x").with_visibility(Visibility::Private)));
        assert!(!table.add(PropertyInfo::new("x")));
        assert!(table.is_private("x"));
    }

    #[test]
    fn test_sorted_names() {
        let mut table = ConstantTable::new();
        table.add(ConstantInfo::new("ZETA"));
        table.add(ConstantInfo::new("ALPHA"));
        assert_eq!(table.names(), vec!["ALPHA", "ZETA"]);
    }
}

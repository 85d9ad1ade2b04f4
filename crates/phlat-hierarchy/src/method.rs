//! Method scopes
//!
//! One `MethodScope` per declared method. Besides the declared modifiers
//! it carries the two flags resolution computes: `is_virtual` (the name is
//! overridden somewhere in the hierarchy) and `has_override` (this very
//! declaration is shadowed by a subclass).

use phlat_core::SourceSite;
use serde::Serialize;

/// Declared visibility of a method or property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A single method declaration inside a class scope
#[derive(Debug, Clone)]
pub struct MethodScope {
    name: String,
    visibility: Visibility,
    is_static: bool,
    is_abstract: bool,
    is_final: bool,
    is_virtual: bool,
    has_override: bool,
    site: SourceSite,
}

impl MethodScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            is_final: false,
            is_virtual: false,
            has_override: false,
            site: SourceSite::unknown(),
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

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    pub fn with_site(mut self, site: SourceSite) -> Self {
        self.site = site;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive name test
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn has_override(&self) -> bool {
        self.has_override
    }

    pub fn site(&self) -> &SourceSite {
        &self.site
    }

    /// Mark the method's name as overridden somewhere in the hierarchy
    pub fn set_virtual(&mut self) {
        self.is_virtual = true;
    }

    /// Mark this declaration as shadowed by a subclass
    pub fn set_has_override(&mut self) {
        self.has_override = true;
    }
}

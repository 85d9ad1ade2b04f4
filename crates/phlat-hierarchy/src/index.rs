//! Declaration index
//!
//! Owns every class scope of a compilation unit in an id-addressed arena
//! and maps case-insensitive names to declarations. A name can map to
//! zero, one, or many scopes; with many, each scope gets a redeclaration
//! id and stays ambiguous until a later binding stage. The index is
//! passed explicitly into every resolver call, never held as ambient
//! state.

use crate::scope::{ClassKind, ClassScope, DeclarationError};
use phlat_core::{Diagnostics, SourceSite};
use std::collections::{HashMap, HashSet};

/// Stable identifier of one class scope inside its index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Append-only registry of class declarations for one compilation unit
#[derive(Debug, Default)]
pub struct DeclarationIndex {
    scopes: Vec<ClassScope>,
    /// Lowercase name -> every declaration carrying it, in registration order
    by_name: HashMap<String, Vec<ClassId>>,
    /// Lowercase names registered as forward/unknown placeholders
    unknown: HashSet<String>,
}

impl DeclarationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and register a scope in one step.
    pub fn declare(
        &mut self,
        kind: ClassKind,
        name: impl Into<String>,
        parent: Option<String>,
        bases: Vec<String>,
        site: SourceSite,
        diags: &mut Diagnostics,
    ) -> Result<ClassId, DeclarationError> {
        let scope = ClassScope::new(kind, name, parent, bases, site)?;
        Ok(self.add_class(scope, diags))
    }

    /// Register an already-built scope. A second declaration of a name
    /// turns every declaration of that name into a redeclaration, each
    /// with its registration-order id.
    pub fn add_class(&mut self, scope: ClassScope, diags: &mut Diagnostics) -> ClassId {
        let key = scope.name().to_ascii_lowercase();
        let id = ClassId(self.scopes.len() as u32);
        self.scopes.push(scope);
        let ids = self.by_name.entry(key).or_default();
        ids.push(id);

        if ids.len() > 1 {
            let ids = ids.clone();
            for (redec_id, cid) in ids.iter().enumerate() {
                if self.scopes[cid.0 as usize].redeclaring_id().is_none() {
                    self.scopes[cid.0 as usize].set_redeclaring(redec_id as u32, diags);
                }
            }
        }
        id
    }

    /// The representative declaration of a name, if any. With several
    /// declarations this is the first one; check
    /// [`ClassScope::is_redeclaring`] before trusting it.
    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        self.by_name
            .get(&name.to_ascii_lowercase())
            .and_then(|ids| ids.first().copied())
    }

    /// Every declaration sharing a name
    pub fn find_classes(&self, name: &str) -> &[ClassId] {
        self.by_name
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All concrete declarations of a redeclared name
    pub fn find_redeclared_classes(&self, name: &str) -> Vec<ClassId> {
        self.find_classes(name).to_vec()
    }

    /// Register a forward/unknown placeholder for a name
    pub fn declare_unknown_class(&mut self, name: &str) {
        self.unknown.insert(name.to_ascii_lowercase());
    }

    pub fn is_unknown(&self, name: &str) -> bool {
        self.unknown.contains(&name.to_ascii_lowercase())
    }

    pub fn scope(&self, id: ClassId) -> &ClassScope {
        &self.scopes[id.0 as usize]
    }

    pub fn scope_mut(&mut self, id: ClassId) -> &mut ClassScope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Every registered scope id, in registration order
    pub fn ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.scopes.len()).map(|i| ClassId(i as u32))
    }
}

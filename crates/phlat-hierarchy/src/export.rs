//! Export surface for emission and documentation collaborators
//!
//! Flattens one resolved class into plain serializable records: display
//! name, attribute bits, interface list, method table, property and
//! constant maps. Rendering (JSON, docs) stays with the consumer.

use crate::index::{ClassId, DeclarationIndex};
use crate::method::Visibility;
use crate::resolve::{HierarchyResolver, MethodTable};
use crate::scope::ClassKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// Modifier bits derived from the declaration kind
pub mod modifier {
    pub const ABSTRACT: u32 = 1 << 0;
    pub const FINAL: u32 = 1 << 1;
    pub const INTERFACE: u32 = 1 << 2;
    pub const TRAIT: u32 = 1 << 3;
}

/// Property visibility/static bits in the exported property map
pub mod prop {
    pub const PUBLIC: u32 = 1 << 0;
    pub const PROTECTED: u32 = 1 << 1;
    pub const PRIVATE: u32 = 1 << 2;
    pub const STATIC: u32 = 1 << 3;
}

/// One flattened method in the export
#[derive(Debug, Clone, Serialize)]
pub struct MethodExport {
    pub name: String,
    /// Doc name of the declaring class
    pub owner: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_virtual: bool,
    pub has_override: bool,
}

/// Everything a downstream collaborator needs to know about one class
#[derive(Debug, Clone, Serialize)]
pub struct ClassExport {
    /// Display name, disambiguated when redeclared
    pub name: String,
    pub kind: ClassKind,
    /// Raw attribute bits after resolution
    pub attributes: u32,
    /// Parent display name, if declared
    pub parent: Option<String>,
    /// Recursively flattened interface names, parent chain excluded
    pub interfaces: Vec<String>,
    /// Modifier bits derived from the kind
    pub modifiers: u32,
    /// Flattened methods, name-sorted
    pub methods: Vec<MethodExport>,
    /// Property name -> visibility/static bits
    pub properties: BTreeMap<String, u32>,
    pub constants: Vec<String>,
    pub traits: Vec<String>,
    pub requires_extends: Vec<String>,
    pub requires_implements: Vec<String>,
}

/// Modifier mask for a declaration kind
pub fn kind_modifiers(kind: ClassKind) -> u32 {
    match kind {
        ClassKind::AbstractClass => modifier::ABSTRACT,
        ClassKind::Enum | ClassKind::FinalClass => modifier::FINAL,
        ClassKind::UtilClass => modifier::FINAL | modifier::ABSTRACT,
        ClassKind::Interface => modifier::INTERFACE,
        ClassKind::Trait => modifier::TRAIT,
        ClassKind::ObjectClass => 0,
    }
}

impl<'a> HierarchyResolver<'a> {
    /// Resolve `id` and flatten it into an export record.
    pub fn export(&mut self, id: ClassId) -> ClassExport {
        let table = self.resolve(id);
        let index = self.index();
        let scope = index.scope(id);

        let parent = scope.parent().map(|p| parent_doc_name(index, p));
        let interfaces = index.get_interfaces(id, true);

        let mut methods: Vec<MethodExport> = table
            .values()
            .map(|m| {
                let owner = index.scope(m.class);
                let method = owner.method(m.method);
                MethodExport {
                    name: method.name().to_string(),
                    owner: owner.doc_name(),
                    visibility: method.visibility(),
                    is_static: method.is_static(),
                    is_abstract: method.is_abstract(),
                    is_final: method.is_final(),
                    is_virtual: method.is_virtual(),
                    has_override: method.has_override(),
                }
            })
            .collect();
        methods.sort_by(|a, b| a.name.to_ascii_lowercase().cmp(&b.name.to_ascii_lowercase()));

        let mut properties = BTreeMap::new();
        for name in scope.properties().names() {
            let mut bits = 0;
            if scope.properties().is_public(&name) {
                bits |= prop::PUBLIC;
            } else if scope.properties().is_private(&name) {
                bits |= prop::PRIVATE;
            } else if scope.properties().is_protected(&name) {
                bits |= prop::PROTECTED;
            }
            if scope.properties().is_static(&name) {
                bits |= prop::STATIC;
            }
            properties.insert(name, bits);
        }

        ClassExport {
            name: scope.doc_name(),
            kind: scope.kind(),
            attributes: scope.attr().bits(),
            parent,
            interfaces,
            modifiers: kind_modifiers(scope.kind()),
            methods,
            properties,
            constants: scope.constants().names(),
            traits: scope.used_traits().to_vec(),
            requires_extends: scope.required_extends(),
            requires_implements: scope.required_implements(),
        }
    }

    /// Flattened method table of `id`, name-sorted, without building the
    /// full export record.
    pub fn methods_flattened(&mut self, id: ClassId) -> Vec<String> {
        let table: MethodTable = self.resolve(id);
        let index = self.index();
        let mut names: Vec<String> = table
            .values()
            .map(|m| index.scope(m.class).method(m.method).name().to_string())
            .collect();
        names.sort_by(|a, b| a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()));
        names
    }
}

// The parent slot shows the declaration's display name when it resolves
// uniquely; a redeclared or missing parent falls back to the written name.
fn parent_doc_name(index: &DeclarationIndex, name: &str) -> String {
    match index.find_class(name) {
        Some(id) if !index.scope(id).is_redeclaring() => index.scope(id).doc_name(),
        _ => name.to_string(),
    }
}

//! Ancestry queries
//!
//! Recursive lookups over a (cycle-checked) declaration index: derivation
//! tests, lowest-common-ancestor search, method and constructor
//! resolution, and the flattened interface list. Queries that run into an
//! ambiguous parent taint the asking scope, mirroring the collection
//! pass.

use crate::index::{ClassId, DeclarationIndex};
use crate::resolve::MethodRef;
use crate::scope::Derivation;

impl DeclarationIndex {
    /// Whether `id` derives from `base`, directly or transitively.
    ///
    /// Under `strict`, an ambiguous (redeclared) base is skipped unless
    /// `default_when_ambiguous` says to answer true conservatively.
    pub fn derives_from(
        &self,
        id: ClassId,
        base: &str,
        strict: bool,
        default_when_ambiguous: bool,
    ) -> bool {
        if self.scope(id).derives_directly_from(base) {
            return true;
        }

        for base_name in self.scope(id).bases() {
            if let Some(base_id) = self.find_class(base_name) {
                if strict && self.scope(base_id).is_redeclaring() {
                    if default_when_ambiguous {
                        return true;
                    }
                    continue;
                }
                if self.derives_from(base_id, base, strict, default_when_ambiguous) {
                    return true;
                }
            }
        }
        false
    }

    /// First shared ancestor of two class names in base-list order.
    ///
    /// Not guaranteed to be the most specific common ancestor beyond the
    /// search order; real hierarchies are shallow enough for that to hold
    /// in practice.
    pub fn find_common_parent(&self, name1: &str, name2: &str) -> Option<ClassId> {
        let cls1 = self.find_class(name1)?;
        let cls2 = self.find_class(name2)?;

        if self.scope(cls1).is_named(self.scope(cls2).name()) {
            return Some(cls1);
        }
        if self.derives_from(cls1, name2, true, false) {
            return Some(cls2);
        }
        if self.derives_from(cls2, name1, true, false) {
            return Some(cls1);
        }

        for base1 in self.scope(cls1).bases() {
            for base2 in self.scope(cls2).bases() {
                if let Some(parent) = self.find_common_parent(base1, base2) {
                    return Some(parent);
                }
            }
        }
        None
    }

    /// Resolve a method by name, own table first, then up the bases in
    /// order.
    ///
    /// With `exclude_interface_bases` the walk stops before the first
    /// interface base. A base that is both ambiguous and the actual
    /// parent aborts the walk and taints the asking scope; ambiguous
    /// non-parent bases are merely skipped.
    pub fn find_function(
        &mut self,
        id: ClassId,
        name: &str,
        recursive: bool,
        exclude_interface_bases: bool,
    ) -> Option<MethodRef> {
        if let Some(method) = self.scope(id).method_index(name) {
            return Some(MethodRef { class: id, method });
        }

        if recursive {
            let bases = self.scope(id).bases().to_vec();
            let parent = self.scope(id).parent().map(str::to_string);
            for base in bases {
                let Some(super_id) = self.find_class(&base) else {
                    continue;
                };
                if exclude_interface_bases && self.scope(super_id).is_interface() {
                    break;
                }
                if self.scope(super_id).is_redeclaring() {
                    if parent.as_deref().is_some_and(|p| p.eq_ignore_ascii_case(&base)) {
                        self.scope_mut(id).set_derives_from_redeclaring();
                        break;
                    }
                    continue;
                }
                if let Some(found) =
                    self.find_function(super_id, name, true, exclude_interface_bases)
                {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Resolve a constructor: the legacy same-name-as-class convention
    /// first, then the canonical `__construct`. The parent walk proceeds
    /// only while the class is untainted.
    pub fn find_constructor(&self, id: ClassId, recursive: bool) -> Option<MethodRef> {
        let scope = self.scope(id);
        let own = scope
            .method_index(scope.name())
            .or_else(|| scope.method_index("__construct"));
        if let Some(method) = own {
            return Some(MethodRef { class: id, method });
        }

        if recursive && scope.derivation() != Derivation::Redeclaring {
            if let Some(parent) = scope.parent() {
                if let Some(super_id) = self.find_class(parent) {
                    return self.find_constructor(super_id, true);
                }
            }
        }
        None
    }

    /// Scope of the declared parent, when resolvable
    pub fn parent_scope(&self, id: ClassId) -> Option<ClassId> {
        let parent = self.scope(id).parent()?;
        self.find_class(parent)
    }

    /// Recursively flattened interface name list, excluding the parent
    /// chain itself. The parent's interfaces come first; unresolvable
    /// bases are listed by their raw name, deduplicated.
    pub fn get_interfaces(&self, id: ClassId, recursive: bool) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_interfaces(id, recursive, &mut names);
        names
    }

    fn collect_interfaces(&self, id: ClassId, recursive: bool, names: &mut Vec<String>) {
        let scope = self.scope(id);
        if recursive {
            if let Some(parent_id) = self.parent_scope(id) {
                self.collect_interfaces(parent_id, true, names);
            }
        }
        for base in scope.bases() {
            if scope.parent().is_some_and(|p| p.eq_ignore_ascii_case(base)) {
                continue;
            }
            match self.find_class(base) {
                Some(base_id) if recursive => {
                    names.push(self.interface_doc_name(base_id));
                    self.collect_interfaces(base_id, true, names);
                }
                _ => {
                    if !names.iter().any(|n| n.eq_ignore_ascii_case(base)) {
                        names.push(base.clone());
                    }
                }
            }
        }
    }

    // A redeclared interface cannot be pinned to one declaration, so its
    // plain name is used instead of a disambiguated one.
    fn interface_doc_name(&self, id: ClassId) -> String {
        let scope = self.scope(id);
        if scope.is_redeclaring() {
            scope.name().to_string()
        } else {
            scope.doc_name()
        }
    }

    /// Whether dispatch from this class must consult the parent chain at
    /// runtime: true when a private method exists here (with
    /// `consider_self`) or any ancestor link is missing or ambiguous.
    pub fn needs_invoke_parent(&self, id: ClassId, consider_self: bool) -> bool {
        let scope = self.scope(id);
        if consider_self && scope.methods().iter().any(|m| m.is_private()) {
            return true;
        }

        if let Some(parent) = scope.parent() {
            return match self.find_class(parent) {
                None => true,
                Some(super_id) => {
                    self.scope(super_id).is_redeclaring()
                        || self.needs_invoke_parent(super_id, true)
                }
            };
        }
        false
    }
}

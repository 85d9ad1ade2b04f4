//! Hierarchy resolution passes
//!
//! Two passes run per class, both tolerant of broken input:
//!
//! 1. [`HierarchyResolver::check_derivation`] prunes every base edge that
//!    closes a cycle, so the later walks terminate.
//! 2. [`HierarchyResolver::collect_methods`] flattens the inherited
//!    method set, flags overrides, spreads the magic-dispatch capability
//!    bits up and down the hierarchy, and propagates the redeclaration
//!    taint.
//!
//! All flag updates are idempotent bit-ORs, so re-resolving an unchanged
//! hierarchy is a no-op. Recovery is always pruning or tainting, never an
//! abort; problems land in the diagnostics channel.

use crate::attr::{Attr, Capability};
use crate::index::{ClassId, DeclarationIndex};
use crate::logging;
use crate::scope::{Derivation, MOCK_CLASS_ATTRIBUTE};
use phlat_core::{DiagnosticKind, Diagnostics};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// A method found during collection, addressed by its owning scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodRef {
    /// Scope the method is declared in
    pub class: ClassId,
    /// Index into that scope's declaration-ordered method list
    pub method: usize,
}

/// Flattened method accumulator: lowercase method name -> owning method
pub type MethodTable = HashMap<String, MethodRef>;

/// Runs resolution passes against one declaration index, reporting into
/// an explicit diagnostics channel.
pub struct HierarchyResolver<'a> {
    index: &'a mut DeclarationIndex,
    diags: &'a mut Diagnostics,
}

impl<'a> HierarchyResolver<'a> {
    pub fn new(index: &'a mut DeclarationIndex, diags: &'a mut Diagnostics) -> Self {
        Self { index, diags }
    }

    pub fn index(&self) -> &DeclarationIndex {
        &*self.index
    }

    pub fn index_mut(&mut self) -> &mut DeclarationIndex {
        self.index
    }

    /// Full resolution of one class: cycle check, then method collection
    /// seeded with the class's own private methods included.
    pub fn resolve(&mut self, id: ClassId) -> MethodTable {
        logging::log_pass_start(self.index.scope(id).name());
        self.check_derivation(id);
        let mut table = MethodTable::new();
        self.collect_methods(id, &mut table, true);
        logging::log_pass_complete(self.index.scope(id).name(), table.len());
        table
    }

    /// Detect and prune circular derivation reachable from `id`.
    ///
    /// Owns the recursion guard for this invocation; siblings and later
    /// calls start clean.
    pub fn check_derivation(&mut self, id: ClassId) {
        let mut seen = HashSet::new();
        self.check_derivation_guarded(id, &mut seen);
    }

    fn check_derivation_guarded(&mut self, id: ClassId, seen: &mut HashSet<String>) {
        let self_key = self.index.scope(id).name().to_ascii_lowercase();
        seen.insert(self_key.clone());

        // Later-declared bases are checked first so that earlier bases,
        // conventionally the parent, win conflicts.
        let mut bases_seen: HashSet<String> = HashSet::new();
        let mut i = self.index.scope(id).bases().len();
        while i > 0 {
            i -= 1;
            let base = self.index.scope(id).base(i).to_string();
            let base_key = base.to_ascii_lowercase();

            if seen.contains(&base_key) || bases_seen.contains(&base_key) {
                self.diags.report(
                    DiagnosticKind::CircularDerivation,
                    self.index.scope(id).site().clone(),
                    format!(
                        "The class hierarchy contains a circular reference involving {}",
                        base
                    ),
                );
                logging::log_cycle_pruned(self.index.scope(id).name(), &base);
                let scope = self.index.scope_mut(id);
                if i == 0 && scope.parent().is_some_and(|p| p.eq_ignore_ascii_case(&base)) {
                    scope.clear_parent();
                }
                scope.remove_base(i);
                continue;
            }
            bases_seen.insert(base_key);

            let candidates = self.index.find_classes(&base).to_vec();
            for candidate in candidates {
                self.check_derivation_guarded(candidate, seen);
            }
        }

        seen.remove(&self_key);
    }

    /// Merge the class's own declarations and its bases' collected
    /// declarations into `funcs`, applying override, diamond, and
    /// redeclaration rules. Requires a cycle-free base graph (run
    /// [`Self::check_derivation`] first).
    pub fn collect_methods(&mut self, id: ClassId, funcs: &mut MethodTable, collect_private: bool) {
        self.seed_own_methods(id, funcs, collect_private);

        let mut i = 0;
        while i < self.index.scope(id).bases().len() {
            let base = self.index.scope(id).base(i).to_string();
            match self.index.find_class(&base) {
                Some(super_id) if self.index.scope(super_id).is_redeclaring() => {
                    // An ambiguous base fans out: each candidate collects
                    // against a pristine copy, then everything merges back
                    // first-resolved-wins.
                    let candidates = self.index.find_redeclared_classes(&base);
                    logging::log_redeclared_fanout(
                        self.index.scope(id).name(),
                        &base,
                        candidates.len(),
                    );
                    let pristine = funcs.clone();
                    for candidate in candidates {
                        let mut current = pristine.clone();
                        self.derived_magic_methods(id, candidate);
                        self.collect_methods(candidate, &mut current, false);
                        self.inherited_magic_methods(id, candidate);
                        for (name, method) in current {
                            funcs.entry(name).or_insert(method);
                        }
                    }
                    self.index.scope_mut(id).set_derives_from_redeclaring();
                    i += 1;
                }
                Some(super_id) => {
                    self.derived_magic_methods(id, super_id);
                    self.collect_methods(super_id, funcs, false);
                    self.inherited_magic_methods(id, super_id);
                    if self.index.scope(super_id).derivation() == Derivation::Redeclaring {
                        self.index.scope_mut(id).set_derives_from_redeclaring();
                    }
                    i += 1;
                }
                None => {
                    self.diags.report(
                        DiagnosticKind::UnknownBaseClass,
                        self.index.scope(id).site().clone(),
                        format!("Unknown base class {}", base),
                    );
                    logging::log_unknown_base(self.index.scope(id).name(), &base);
                    let is_parent = self
                        .index
                        .scope(id)
                        .parent()
                        .is_some_and(|p| p.eq_ignore_ascii_case(&base));
                    if is_parent {
                        // keep the parent name around, but record it as
                        // unresolvable and taint the class
                        self.index.declare_unknown_class(&base);
                        self.index.scope_mut(id).set_derives_from_redeclaring();
                        i += 1;
                    } else {
                        // a dropped unknown base taints interfaces, but
                        // not plain classes; preserved compatibility
                        // behavior of the reference implementation
                        if self.index.scope(id).is_interface() {
                            self.index.scope_mut(id).set_derives_from_redeclaring();
                        }
                        self.index.scope_mut(id).remove_base(i);
                    }
                }
            }
        }
    }

    fn seed_own_methods(&mut self, id: ClassId, funcs: &mut MethodTable, collect_private: bool) {
        let method_count = self.index.scope(id).methods().len();
        for mi in 0..method_count {
            let (key, is_private, is_final) = {
                let method = self.index.scope(id).method(mi);
                (
                    method.name().to_ascii_lowercase(),
                    method.is_private(),
                    method.is_final(),
                )
            };
            // private methods are invisible to subclasses, so they never
            // participate in override resolution below the declaring class
            if !collect_private && is_private {
                continue;
            }

            match funcs.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(MethodRef {
                        class: id,
                        method: mi,
                    });
                }
                Entry::Occupied(slot) => {
                    // the entry already in the table belongs to a class
                    // further down the hierarchy; this one is overridden
                    let overriding = *slot.get();
                    self.index
                        .scope_mut(overriding.class)
                        .method_mut(overriding.method)
                        .set_virtual();
                    {
                        let method = self.index.scope_mut(id).method_mut(mi);
                        method.set_virtual();
                        method.set_has_override();
                    }
                    if is_final {
                        let exempt = self
                            .index
                            .scope(overriding.class)
                            .has_user_attribute(MOCK_CLASS_ATTRIBUTE);
                        if !exempt {
                            let message = format!(
                                "Cannot override final method {}::{} in {}",
                                self.index.scope(id).name(),
                                self.index.scope(id).method(mi).name(),
                                self.index.scope(overriding.class).name(),
                            );
                            self.diags.report(
                                DiagnosticKind::InvalidOverride,
                                self.index
                                    .scope(overriding.class)
                                    .method(overriding.method)
                                    .site()
                                    .clone(),
                                message,
                            );
                        }
                    }
                }
            }
        }
    }

    /// Downward propagation: the base learns it is derived from and which
    /// capabilities may reach it from below.
    pub fn derived_magic_methods(&mut self, id: ClassId, super_id: ClassId) {
        let attr = self.index.scope(id).attr();
        let superclass = self.index.scope_mut(super_id);
        superclass.set_attr(Attr::NOT_FINAL);
        for capability in Capability::ALL {
            if attr.intersects(capability.any()) {
                superclass.set_attr(capability.may_have());
            }
        }
    }

    /// Upward propagation: this class learns which capabilities its base
    /// actually carries or inherits.
    pub fn inherited_magic_methods(&mut self, id: ClassId, super_id: ClassId) {
        let super_attr = self.index.scope(super_id).attr();
        let scope = self.index.scope_mut(id);
        if super_attr.contains(Attr::USES_UNKNOWN_TRAIT) {
            scope.set_attr(Attr::USES_UNKNOWN_TRAIT);
        }
        for capability in Capability::ALL {
            if super_attr.intersects(capability.has() | capability.inherits()) {
                scope.set_attr(capability.inherits());
            }
        }
    }
}

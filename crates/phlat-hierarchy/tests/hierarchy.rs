//! Whole-graph resolution scenarios
//!
//! Exercises the resolver the way the analysis driver does: build an
//! index from a batch of declarations, run cycle check + collection per
//! class, then query the results.

use phlat_core::{DiagnosticKind, Diagnostics, SourceSite};
use phlat_hierarchy::{
    Attr, ClassId, ClassKind, DeclarationIndex, Derivation, HierarchyResolver, MethodScope,
    Visibility,
};

fn declare(
    index: &mut DeclarationIndex,
    diags: &mut Diagnostics,
    kind: ClassKind,
    name: &str,
    parent: Option<&str>,
    bases: &[&str],
) -> ClassId {
    index
        .declare(
            kind,
            name,
            parent.map(str::to_string),
            bases.iter().map(|b| b.to_string()).collect(),
            SourceSite::new(format!("src/{}.php", name), 1),
            diags,
        )
        .unwrap()
}

fn method(index: &mut DeclarationIndex, diags: &mut Diagnostics, id: ClassId, m: MethodScope) {
    index.scope_mut(id).add_method(m, diags);
}

/// A realistic small application hierarchy: interface + abstract base +
/// trait-like mixin + concrete classes, with one magic getter.
#[test]
fn application_hierarchy_resolves_clean() {
    let mut diags = Diagnostics::new();
    let mut index = DeclarationIndex::new();

    let arrayable = declare(&mut index, &mut diags, ClassKind::Interface, "Arrayable", None, &[]);
    method(&mut index, &mut diags, arrayable, MethodScope::new("toArray").with_abstract(true));

    let model = declare(
        &mut index,
        &mut diags,
        ClassKind::AbstractClass,
        "Model",
        None,
        &["Arrayable"],
    );
    method(&mut index, &mut diags, model, MethodScope::new("save"));
    method(&mut index, &mut diags, model, MethodScope::new("toArray"));
    method(&mut index, &mut diags, model, MethodScope::new("__get"));

    let soft_deletes = declare(&mut index, &mut diags, ClassKind::Trait, "SoftDeletes", None, &[]);
    method(&mut index, &mut diags, soft_deletes, MethodScope::new("restore"));
    assert!(index
        .scope_mut(soft_deletes)
        .add_class_requirement("Model", true));

    let user = declare(
        &mut index,
        &mut diags,
        ClassKind::ObjectClass,
        "User",
        Some("Model"),
        &["Model", "SoftDeletes"],
    );
    index.scope_mut(user).add_used_trait("SoftDeletes");
    method(&mut index, &mut diags, user, MethodScope::new("save"));
    method(
        &mut index,
        &mut diags,
        user,
        MethodScope::new("scopeActive").with_visibility(Visibility::Private),
    );

    let table = HierarchyResolver::new(&mut index, &mut diags).resolve(user);
    assert!(diags.is_empty());

    // flattened view: own + parent + mixin methods
    assert_eq!(table["save"].class, user);
    assert_eq!(table["toarray"].class, model);
    assert_eq!(table["restore"].class, soft_deletes);
    assert!(table.contains_key("scopeactive"));

    // override flags landed on both declarations of `save`
    assert!(index.scope(user).find_method("save").unwrap().is_virtual());
    let base_save = index.scope(model).find_method("save").unwrap();
    assert!(base_save.is_virtual() && base_save.has_override());

    // the magic getter is visible from every angle of the hierarchy
    assert!(index.scope(model).attr().contains(Attr::HAS_UNKNOWN_PROP_GETTER));
    assert!(index.scope(user).attr().contains(Attr::INHERITS_UNKNOWN_PROP_GETTER));
    assert!(index
        .scope(arrayable)
        .attr()
        .contains(Attr::MAY_HAVE_UNKNOWN_PROP_GETTER));

    // ancestry queries agree
    assert!(index.derives_from(user, "Arrayable", false, false));
    assert_eq!(index.get_interfaces(user, true), vec!["Arrayable", "SoftDeletes"]);
    let ctor = index.find_constructor(user, true);
    assert!(ctor.is_none());
}

/// Broken input: a cycle, an unknown parent, and a redeclared base in one
/// unit. Resolution degrades but never aborts, and later passes see a
/// stable graph.
#[test]
fn degraded_hierarchy_recovers() {
    let mut diags = Diagnostics::new();
    let mut index = DeclarationIndex::new();

    // A <-> B cycle
    let a = declare(&mut index, &mut diags, ClassKind::ObjectClass, "A", Some("B"), &["B"]);
    let b = declare(&mut index, &mut diags, ClassKind::ObjectClass, "B", Some("A"), &["A"]);

    // orphan with a missing parent
    let orphan = declare(
        &mut index,
        &mut diags,
        ClassKind::ObjectClass,
        "Orphan",
        Some("Ghost"),
        &["Ghost"],
    );

    // two declarations of Logger, one richer than the other
    let logger1 = declare(&mut index, &mut diags, ClassKind::ObjectClass, "Logger", None, &[]);
    method(&mut index, &mut diags, logger1, MethodScope::new("log"));
    let logger2 = declare(&mut index, &mut diags, ClassKind::ObjectClass, "Logger", None, &[]);
    method(&mut index, &mut diags, logger2, MethodScope::new("log"));
    method(&mut index, &mut diags, logger2, MethodScope::new("flush"));

    let service = declare(
        &mut index,
        &mut diags,
        ClassKind::ObjectClass,
        "Service",
        Some("Logger"),
        &["Logger"],
    );

    let mut resolver = HierarchyResolver::new(&mut index, &mut diags);
    let table_a = resolver.resolve(a);
    let table_orphan = resolver.resolve(orphan);
    let table_service = resolver.resolve(service);

    assert!(table_a.is_empty());
    assert!(table_orphan.is_empty());
    assert_eq!(table_service["log"].class, logger1);
    assert_eq!(table_service["flush"].class, logger2);

    assert_eq!(diags.count_of(DiagnosticKind::CircularDerivation), 1);
    assert_eq!(diags.count_of(DiagnosticKind::UnknownBaseClass), 1);

    // cycle pruned at exactly one edge
    let a_bases = index.scope(a).bases().len() + index.scope(b).bases().len();
    assert_eq!(a_bases, 1);

    // taints: unknown parent and ambiguous parent, but not the cycle
    assert_eq!(index.scope(orphan).derivation(), Derivation::Redeclaring);
    assert!(index.is_unknown("Ghost"));
    assert_eq!(index.scope(service).derivation(), Derivation::Redeclaring);

    // re-resolving the repaired graph adds no new diagnostics
    let before = diags.len();
    let table_again = HierarchyResolver::new(&mut index, &mut diags).resolve(service);
    assert_eq!(table_again, table_service);
    assert_eq!(diags.len(), before);
}

/// The documented asymmetry: an unknown non-parent base taints an
/// interface but leaves a plain class Normal. Pinned as compatibility
/// behavior.
#[test]
fn unknown_base_taint_asymmetry() {
    let mut diags = Diagnostics::new();
    let mut index = DeclarationIndex::new();
    let class = declare(
        &mut index,
        &mut diags,
        ClassKind::ObjectClass,
        "Plain",
        None,
        &["MissingIface"],
    );
    let iface = declare(
        &mut index,
        &mut diags,
        ClassKind::Interface,
        "Iface",
        None,
        &["MissingIface"],
    );

    let mut resolver = HierarchyResolver::new(&mut index, &mut diags);
    resolver.resolve(class);
    resolver.resolve(iface);

    assert_eq!(index.scope(class).derivation(), Derivation::Normal);
    assert_eq!(index.scope(iface).derivation(), Derivation::Redeclaring);
    assert!(index.scope(class).bases().is_empty());
    assert!(index.scope(iface).bases().is_empty());
}

/// Export is consistent with queries after a degraded resolution.
#[test]
fn export_after_redeclaration() {
    let mut diags = Diagnostics::new();
    let mut index = DeclarationIndex::new();
    declare(&mut index, &mut diags, ClassKind::ObjectClass, "Conn", None, &[]);
    let second = declare(&mut index, &mut diags, ClassKind::ObjectClass, "Conn", None, &[]);
    method(&mut index, &mut diags, second, MethodScope::new("open"));

    let pool = declare(
        &mut index,
        &mut diags,
        ClassKind::ObjectClass,
        "Pool",
        Some("Conn"),
        &["Conn"],
    );

    let export = HierarchyResolver::new(&mut index, &mut diags).export(pool);

    assert_eq!(export.name, "Pool");
    // a redeclared parent cannot be pinned, so the raw name is shown
    assert_eq!(export.parent.as_deref(), Some("Conn"));
    assert_eq!(index.scope(pool).derivation(), Derivation::Redeclaring);
}

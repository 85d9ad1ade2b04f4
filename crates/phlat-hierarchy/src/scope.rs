//! Class scopes
//!
//! One `ClassScope` per syntactic declaration of a class, interface, or
//! trait. The scope owns its methods, property/constant tables, trait
//! usage and requirement lists; hierarchy-wide state (attribute bits,
//! derivation taint) is mutated by the resolution passes in
//! [`crate::resolve`].

use crate::attr::{magic_method_attr, Attr};
use crate::method::MethodScope;
use crate::tables::{ConstantTable, PropertyTable};
use phlat_core::{DiagnosticKind, Diagnostics, SourceSite};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Separator between a redeclared class's name and its numeric id
pub const ID_SEPARATOR: &str = "$";

/// The user attribute exempting a class from final-override checking
pub const MOCK_CLASS_ATTRIBUTE: &str = "__MockClass";

/// Kind of class-like declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassKind {
    ObjectClass,
    Interface,
    Trait,
    AbstractClass,
    FinalClass,
    Enum,
    UtilClass,
}

/// Whether a scope's hierarchy contains an ambiguous or unknown link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Derivation {
    #[default]
    Normal,
    Redeclaring,
}

/// Contract violations when building a scope. These are hard API errors,
/// not diagnostics: a well-formed front end never produces them.
#[derive(Debug, thiserror::Error)]
pub enum DeclarationError {
    #[error("class name must not be empty")]
    EmptyName,
    #[error("parent `{parent}` of `{class}` must be the first entry in the base list")]
    ParentNotFirstBase { class: String, parent: String },
}

/// Per-declaration data model of the hierarchy resolver
#[derive(Debug, Clone)]
pub struct ClassScope {
    name: String,
    kind: ClassKind,
    parent: Option<String>,
    bases: Vec<String>,
    attr: Attr,
    derivation: Derivation,
    redeclaring: Option<u32>,
    /// Declaration-ordered methods
    methods: Vec<MethodScope>,
    /// Lowercase method name -> index into `methods`
    method_names: HashMap<String, usize>,
    properties: PropertyTable,
    constants: ConstantTable,
    used_traits: Vec<String>,
    /// Lowercase names the trait/interface requires a user to extend
    required_extends: HashSet<String>,
    /// Lowercase names the trait requires a user to implement
    required_implements: HashSet<String>,
    /// User attribute name -> raw argument text
    user_attributes: HashMap<String, String>,
    site: SourceSite,
}

impl ClassScope {
    /// Create a scope for a user declaration.
    ///
    /// The parent, when present, must be the first entry of `bases`; the
    /// remaining entries are interfaces and trait-implied bases in
    /// declaration order. Listing `ArrayAccess` among the bases marks the
    /// scope as carrying the array-dispatch hook.
    pub fn new(
        kind: ClassKind,
        name: impl Into<String>,
        parent: Option<String>,
        bases: Vec<String>,
        site: SourceSite,
    ) -> Result<Self, DeclarationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DeclarationError::EmptyName);
        }
        if let Some(parent_name) = &parent {
            let first_is_parent = bases
                .first()
                .is_some_and(|b| b.eq_ignore_ascii_case(parent_name));
            if !first_is_parent {
                return Err(DeclarationError::ParentNotFirstBase {
                    class: name,
                    parent: parent_name.clone(),
                });
            }
        }

        let mut attr = Attr::empty();
        if bases.iter().any(|b| b.eq_ignore_ascii_case("ArrayAccess")) {
            attr |= Attr::HAS_ARRAY_ACCESS;
        }

        Ok(Self {
            name,
            kind,
            parent,
            bases,
            attr,
            derivation: Derivation::Normal,
            redeclaring: None,
            methods: Vec::new(),
            method_names: HashMap::new(),
            properties: PropertyTable::new(),
            constants: ConstantTable::new(),
            used_traits: Vec::new(),
            required_extends: HashSet::new(),
            required_implements: HashSet::new(),
            user_attributes: HashMap::new(),
            site,
        })
    }

    /// Create a scope for a runtime-provided (extension) class.
    ///
    /// Magic bits are derived from the method names, and the scope is
    /// marked System + Extension.
    pub fn system(
        name: impl Into<String>,
        parent: Option<String>,
        bases: Vec<String>,
        methods: Vec<MethodScope>,
        diags: &mut Diagnostics,
    ) -> Result<Self, DeclarationError> {
        let mut scope = Self::new(
            ClassKind::ObjectClass,
            name,
            parent,
            bases,
            SourceSite::unknown(),
        )?;
        for method in methods {
            scope.add_method(method, diags);
        }
        scope.attr |= Attr::SYSTEM | Attr::EXTENSION;
        Ok(scope)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive name test
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Display name, disambiguated with the redeclaration id when present
    pub fn doc_name(&self) -> String {
        match self.redeclaring {
            None => self.name.clone(),
            Some(id) => format!("{}{}{}", self.name, ID_SEPARATOR, id),
        }
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn is_trait(&self) -> bool {
        self.kind == ClassKind::Trait
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Forget the parent name; used when the parent edge closes a cycle
    pub fn clear_parent(&mut self) {
        self.parent = None;
    }

    pub fn bases(&self) -> &[String] {
        &self.bases
    }

    pub fn base(&self, index: usize) -> &str {
        &self.bases[index]
    }

    /// Prune a base edge; used by cycle and unknown-base recovery
    pub fn remove_base(&mut self, index: usize) {
        self.bases.remove(index);
    }

    pub fn attr(&self) -> Attr {
        self.attr
    }

    /// OR attribute bits in; never clears anything
    pub fn set_attr(&mut self, attr: Attr) {
        self.attr |= attr;
    }

    pub fn derivation(&self) -> Derivation {
        self.derivation
    }

    /// Taint the scope; sticky, never reverts to Normal
    pub fn set_derives_from_redeclaring(&mut self) {
        self.derivation = Derivation::Redeclaring;
    }

    pub fn redeclaring_id(&self) -> Option<u32> {
        self.redeclaring
    }

    /// Whether several declarations share this scope's name
    pub fn is_redeclaring(&self) -> bool {
        self.redeclaring.is_some()
    }

    /// Assign the redeclaration id. Redeclaring a trait is reported, since
    /// trait flattening cannot disambiguate later.
    pub fn set_redeclaring(&mut self, id: u32, diags: &mut Diagnostics) {
        if self.is_trait() {
            diags.report(
                DiagnosticKind::RedeclaredTrait,
                self.site.clone(),
                format!("Redeclared trait {}", self.name),
            );
        }
        self.redeclaring = Some(id);
    }

    pub fn site(&self) -> &SourceSite {
        &self.site
    }

    /// Register a method. The first declaration of a name wins; a second
    /// one is reported and dropped. Magic method names set their attribute
    /// bit on this scope.
    pub fn add_method(&mut self, method: MethodScope, diags: &mut Diagnostics) -> bool {
        let key = method.name().to_ascii_lowercase();
        if self.method_names.contains_key(&key) {
            diags.report(
                DiagnosticKind::DeclaredMethodTwice,
                method.site().clone(),
                format!("Redeclared method {}::{}", self.name, method.name()),
            );
            return false;
        }
        self.attr |= magic_method_attr(method.name());
        self.method_names.insert(key, self.methods.len());
        self.methods.push(method);
        true
    }

    /// Declaration-ordered methods
    pub fn methods(&self) -> &[MethodScope] {
        &self.methods
    }

    pub fn method(&self, index: usize) -> &MethodScope {
        &self.methods[index]
    }

    pub fn method_mut(&mut self, index: usize) -> &mut MethodScope {
        &mut self.methods[index]
    }

    /// Case-insensitive own-table method index
    pub fn method_index(&self, name: &str) -> Option<usize> {
        self.method_names.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodScope> {
        self.method_index(name).map(|i| &self.methods[i])
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method_names.contains_key(&name.to_ascii_lowercase())
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyTable {
        &mut self.properties
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.has(name)
    }

    pub fn constants(&self) -> &ConstantTable {
        &self.constants
    }

    pub fn constants_mut(&mut self) -> &mut ConstantTable {
        &mut self.constants
    }

    pub fn has_const(&self, name: &str) -> bool {
        self.constants.has(name)
    }

    pub fn add_used_trait(&mut self, name: impl Into<String>) {
        self.used_traits.push(name.into());
    }

    pub fn used_traits(&self) -> &[String] {
        &self.used_traits
    }

    pub fn uses_trait(&self, name: &str) -> bool {
        self.used_traits.iter().any(|t| t.eq_ignore_ascii_case(name))
    }

    /// Register a "must be paired with a class satisfying X" constraint.
    ///
    /// A name already registered on the opposite requirement kind is
    /// rejected without mutation.
    pub fn add_class_requirement(&mut self, name: &str, is_extends: bool) -> bool {
        let key = name.to_ascii_lowercase();
        if is_extends {
            if self.required_implements.contains(&key) {
                return false;
            }
            self.required_extends.insert(key);
        } else {
            if self.required_extends.contains(&key) {
                return false;
            }
            self.required_implements.insert(key);
        }
        true
    }

    /// Required-extends names, sorted
    pub fn required_extends(&self) -> Vec<String> {
        let mut names: Vec<String> = self.required_extends.iter().cloned().collect();
        names.sort();
        names
    }

    /// Required-implements names, sorted
    pub fn required_implements(&self) -> Vec<String> {
        let mut names: Vec<String> = self.required_implements.iter().cloned().collect();
        names.sort();
        names
    }

    /// Register a user attribute; a duplicate name is reported and the
    /// first registration kept.
    pub fn add_user_attribute(
        &mut self,
        name: impl Into<String>,
        args: impl Into<String>,
        diags: &mut Diagnostics,
    ) {
        let name = name.into();
        if self.user_attributes.contains_key(&name) {
            diags.report(
                DiagnosticKind::RedeclaredAttribute,
                self.site.clone(),
                format!("Redeclared attribute {}", name),
            );
            return;
        }
        self.user_attributes.insert(name, args.into());
    }

    pub fn user_attributes(&self) -> &HashMap<String, String> {
        &self.user_attributes
    }

    pub fn has_user_attribute(&self, name: &str) -> bool {
        self.user_attributes.contains_key(name)
    }

    /// Case-insensitive membership in the base list
    pub fn derives_directly_from(&self, base: &str) -> bool {
        self.bases.iter().any(|b| b.eq_ignore_ascii_case(base))
    }
}

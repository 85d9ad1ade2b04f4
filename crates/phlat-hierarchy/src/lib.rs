//! phlat-hierarchy: class-hierarchy resolution for PHP static analysis
//!
//! Given the class, interface, and trait declarations of a compilation
//! unit, this crate computes:
//!
//! - the flattened set of inherited methods per class, with override and
//!   diamond tie-break resolution
//! - magic-dispatch capability flags (`__get`, `__call`, invoke, array
//!   access, ...) propagated up and down the hierarchy
//! - ancestry relations: derivation tests, common-ancestor search,
//!   method/constructor lookup, flattened interface lists
//!
//! The resolver is error-tolerant: cycles are pruned, unknown bases are
//! dropped or recorded, redeclared names fan out and taint, and every
//! problem lands in a diagnostics channel instead of aborting.
//!
//! # Example
//!
//! ```
//! use phlat_core::{Diagnostics, SourceSite};
//! use phlat_hierarchy::{ClassKind, DeclarationIndex, HierarchyResolver, MethodScope};
//!
//! let mut diags = Diagnostics::new();
//! let mut index = DeclarationIndex::new();
//!
//! let base = index
//!     .declare(ClassKind::ObjectClass, "Model", None, vec![], SourceSite::unknown(), &mut diags)
//!     .unwrap();
//! index.scope_mut(base).add_method(MethodScope::new("save"), &mut diags);
//!
//! let user = index
//!     .declare(
//!         ClassKind::ObjectClass,
//!         "User",
//!         Some("Model".to_string()),
//!         vec!["Model".to_string()],
//!         SourceSite::new("src/User.php", 3),
//!         &mut diags,
//!     )
//!     .unwrap();
//!
//! let methods = HierarchyResolver::new(&mut index, &mut diags).resolve(user);
//! assert!(methods.contains_key("save"));
//! assert!(diags.is_empty());
//! ```

pub mod attr;
pub mod export;
pub mod index;
pub mod logging;
pub mod method;
pub mod query;
pub mod resolve;
pub mod scope;
pub mod tables;

pub use attr::{Attr, Capability};
pub use export::{ClassExport, MethodExport};
pub use index::{ClassId, DeclarationIndex};
pub use method::{MethodScope, Visibility};
pub use resolve::{HierarchyResolver, MethodRef, MethodTable};
pub use scope::{ClassKind, ClassScope, DeclarationError, Derivation};
pub use tables::{ConstantInfo, ConstantTable, PropertyInfo, PropertyTable};

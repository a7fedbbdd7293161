//! Formula registry and bindings.
//!
//! Formulas let a numeric attribute's base be computed by an externally
//! supplied function. Content refers to a formula by its textual signature,
//! which survives persistence; the callable is looked up again after every
//! load.
//!
//! ```text
//! FormulaProvider ──scan──▶ FormulaRegistry ◀──resolve── FormulaBinding
//!   (declarations)          (canonical sig → handle)     (signature + handle)
//! ```
//!
//! Providers declare formulas explicitly; nothing is discovered by
//! reflection. A declaration is collected only if it is public and carries
//! [`FORMULA_TAG`], and only if its provider's module passes the
//! [`ModuleFilter`].

pub mod binding;
pub mod builtin;
pub mod registry;
pub mod signature;

pub use binding::{BindReport, Bindable, FormulaBinding};
pub use builtin::BuiltinFormulas;
pub use registry::{
    FORMULA_TAG, FormulaArg, FormulaDecl, FormulaEntry, FormulaFn, FormulaHandle,
    FormulaProvider, FormulaRegistry, ModuleFilter, Visibility,
};
pub use signature::{FormulaShape, FormulaSignature, SignatureError, ValueType};

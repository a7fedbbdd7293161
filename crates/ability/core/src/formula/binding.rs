//! Persisted formula references.

use core::fmt;

use tracing::{debug, warn};

use super::registry::{FormulaArg, FormulaHandle, FormulaRegistry};
use super::signature::{FormulaShape, FormulaSignature};

/// A persisted, human-readable reference to a registered formula.
///
/// Only the signature is ever stored. The callable handle is reconstructed
/// by [`resolve`](Self::resolve) after every load (see [`Bindable`]) and, as a
/// fallback, lazily on first use.
///
/// Two bindings are equal when their signature text is equal; the resolved
/// handle does not participate.
#[derive(Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub struct FormulaBinding {
    signature: String,
    resolved: Option<FormulaHandle>,
}

impl FormulaBinding {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            resolved: None,
        }
    }

    /// A binding with no formula; its owner always uses the base value.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn is_empty(&self) -> bool {
        self.signature.trim().is_empty()
    }

    pub fn is_bound(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn handle(&self) -> Option<&FormulaHandle> {
        self.resolved.as_ref()
    }

    /// Resolves the signature against `registry` unless already resolved.
    ///
    /// Returns whether the binding is bound afterwards. An unknown signature
    /// leaves the binding unbound.
    ///
    /// # Panics
    ///
    /// Panics if the signature text is non-empty but malformed. Content
    /// loaders validate signatures before they reach this point.
    pub fn resolve(&mut self, registry: &FormulaRegistry) -> bool {
        if self.resolved.is_some() {
            return true;
        }
        if self.is_empty() {
            return false;
        }
        if let Err(err) = FormulaSignature::parse(&self.signature) {
            panic!("{err}");
        }
        self.resolved = registry.lookup(&self.signature);
        self.resolved.is_some()
    }

    /// Like [`resolve`](Self::resolve), but only accepts a formula whose
    /// return and parameter types match `shape`.
    ///
    /// A registered formula of another shape leaves the binding unbound, so
    /// its owner falls back to the base value instead of calling it with
    /// arguments it cannot take.
    pub fn resolve_as(&mut self, registry: &FormulaRegistry, shape: &FormulaShape) -> bool {
        if !self.resolve(registry) {
            return false;
        }
        if self.has_shape(shape) {
            return true;
        }
        debug!(
            target: "ability::formula",
            signature = %self.signature,
            expected = ?shape,
            "formula shape mismatch"
        );
        self.resolved = None;
        false
    }

    /// True when the binding is resolved to a formula of `shape`.
    pub fn has_shape(&self, shape: &FormulaShape) -> bool {
        self.resolved
            .as_ref()
            .is_some_and(|handle| handle.entry().signature().shape() == *shape)
    }

    /// Resolves (shape-checked when `shape` is given) and records the result.
    ///
    /// Unresolved signatures are logged once per call at warn level.
    pub fn bind_as(
        &mut self,
        registry: &FormulaRegistry,
        shape: Option<&FormulaShape>,
        report: &mut BindReport,
    ) {
        if self.is_empty() {
            return;
        }
        let bound = match shape {
            Some(shape) => self.resolve_as(registry, shape),
            None => self.resolve(registry),
        };
        if bound {
            report.bound += 1;
        } else {
            warn!(
                target: "ability::formula",
                signature = %self.signature,
                "formula signature did not resolve to a usable formula, falling back to base value"
            );
            report.unresolved.push(self.signature.clone());
        }
    }

    /// Calls the bound formula.
    ///
    /// # Panics
    ///
    /// Panics when the binding is unbound; check [`is_bound`](Self::is_bound)
    /// first and fall back to the base value.
    pub fn invoke(&self, args: &[FormulaArg]) -> f64 {
        match &self.resolved {
            Some(handle) => handle.invoke(args),
            None => panic!("invoked unbound formula binding {:?}", self.signature),
        }
    }
}

impl PartialEq for FormulaBinding {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

impl Eq for FormulaBinding {}

impl fmt::Debug for FormulaBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaBinding")
            .field("signature", &self.signature)
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl From<String> for FormulaBinding {
    fn from(signature: String) -> Self {
        Self::new(signature)
    }
}

impl From<&str> for FormulaBinding {
    fn from(signature: &str) -> Self {
        Self::new(signature)
    }
}

impl From<FormulaBinding> for String {
    fn from(binding: FormulaBinding) -> Self {
        binding.signature
    }
}

/// Summary of a bind pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindReport {
    /// Bindings that resolved (or were already resolved).
    pub bound: usize,
    /// Signatures that did not resolve, in visit order.
    pub unresolved: Vec<String>,
}

impl BindReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Second phase of a two-phase load: walk an object graph after plain-data
/// deserialization and resolve every [`FormulaBinding`] in it.
pub trait Bindable {
    fn bind_all(&mut self, registry: &FormulaRegistry, report: &mut BindReport);

    /// Convenience wrapper returning a fresh report.
    fn bind(&mut self, registry: &FormulaRegistry) -> BindReport {
        let mut report = BindReport::default();
        self.bind_all(registry, &mut report);
        report
    }
}

impl Bindable for FormulaBinding {
    fn bind_all(&mut self, registry: &FormulaRegistry, report: &mut BindReport) {
        self.bind_as(registry, None, report);
    }
}

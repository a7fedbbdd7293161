//! Signature → callable lookup table.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::signature::{FormulaShape, FormulaSignature, ValueType};

/// Marker tag every registrable formula must carry.
pub const FORMULA_TAG: &str = "formula";

/// Plain function pointer implementing a formula.
pub type FormulaFn = fn(&[FormulaArg]) -> f64;

/// A single argument passed to a formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FormulaArg {
    Float(f64),
    Int(i64),
    Bool(bool),
}

impl FormulaArg {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Float(_) => ValueType::Float,
            Self::Int(_) => ValueType::Int,
            Self::Bool(_) => ValueType::Bool,
        }
    }

    /// Numeric view of the argument (`true` reads as `1.0`).
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Float(v) => v,
            Self::Int(v) => v as f64,
            Self::Bool(v) => f64::from(u8::from(v)),
        }
    }
}

/// Access level declared for a formula. Only public formulas are collected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// A formula as declared by its provider, before it enters a registry.
#[derive(Clone, Debug)]
pub struct FormulaDecl {
    pub signature: FormulaSignature,
    pub func: FormulaFn,
    pub visibility: Visibility,
    pub tags: Vec<&'static str>,
}

impl FormulaDecl {
    /// Declares a public formula carrying the [`FORMULA_TAG`] marker.
    pub fn new(signature: FormulaSignature, func: FormulaFn) -> Self {
        Self {
            signature,
            func,
            visibility: Visibility::Public,
            tags: vec![FORMULA_TAG],
        }
    }

    /// Adds a tag (e.g., a category used by editor enumeration).
    #[must_use]
    pub fn tagged(mut self, tag: &'static str) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Removes every tag, including the marker.
    #[must_use]
    pub fn untagged(mut self) -> Self {
        self.tags.clear();
        self
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }
}

/// A source of formula declarations, typically one per module.
pub trait FormulaProvider {
    /// Module path used by [`ModuleFilter`] (e.g., `"spells::fire"`).
    fn module_path(&self) -> &str;

    fn declarations(&self) -> Vec<FormulaDecl>;
}

/// Allow/deny list applied to provider module paths.
///
/// A prefix matches a module when it equals the module path or is followed by
/// `::` in it. Deny wins over allow; an empty allow list allows everything.
#[derive(Clone, Debug)]
pub struct ModuleFilter {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

impl ModuleFilter {
    /// Infrastructure modules that never contribute formulas.
    pub const DEFAULT_DENY: &'static [&'static str] =
        &["std", "core", "alloc", "serde", "tracing", "test"];

    pub fn allow_all() -> Self {
        Self {
            allow: Vec::new(),
            deny: Vec::new(),
        }
    }

    pub fn accepts(&self, module: &str) -> bool {
        let matches = |prefix: &String| {
            module == prefix
                || module
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.starts_with("::"))
        };
        if self.deny.iter().any(matches) {
            return false;
        }
        self.allow.is_empty() || self.allow.iter().any(matches)
    }
}

impl Default for ModuleFilter {
    fn default() -> Self {
        Self {
            allow: Vec::new(),
            deny: Self::DEFAULT_DENY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A registered formula.
pub struct FormulaEntry {
    signature: FormulaSignature,
    canonical: String,
    func: FormulaFn,
    tags: Vec<&'static str>,
}

impl FormulaEntry {
    pub fn signature(&self) -> &FormulaSignature {
        &self.signature
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }

    /// Calls the formula.
    ///
    /// # Panics
    ///
    /// Panics when `args` do not match the declared parameter types; callers
    /// build arguments from the same shape they resolved against.
    pub fn invoke(&self, args: &[FormulaArg]) -> f64 {
        assert!(
            args.len() == self.signature.params.len()
                && args
                    .iter()
                    .zip(&self.signature.params)
                    .all(|(arg, ty)| arg.value_type() == *ty),
            "arguments {args:?} do not match formula `{}`",
            self.canonical
        );
        (self.func)(args)
    }
}

impl fmt::Debug for FormulaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaEntry")
            .field("signature", &self.canonical)
            .field("tags", &self.tags)
            .finish()
    }
}

/// Cheap, shareable handle to a registered formula.
#[derive(Clone, Debug)]
pub struct FormulaHandle(Arc<FormulaEntry>);

impl FormulaHandle {
    pub fn invoke(&self, args: &[FormulaArg]) -> f64 {
        self.0.invoke(args)
    }

    pub fn entry(&self) -> &FormulaEntry {
        &self.0
    }

    /// True when both handles point at the same registry entry.
    pub fn same_entry(&self, other: &FormulaHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Lookup table from canonical signature text to formula handles.
///
/// Built once from a set of [`FormulaProvider`]s and read-only afterwards.
/// The registry is an ordinary value passed to whoever needs to resolve a
/// [`FormulaBinding`](super::FormulaBinding); there is no global instance.
///
/// # Collisions
///
/// Two formulas with the same canonical signature: the later registration
/// replaces the earlier one and a warning is logged.
#[derive(Debug, Default)]
pub struct FormulaRegistry {
    entries: HashMap<String, FormulaHandle>,
}

impl FormulaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from providers whose module passes `filter`.
    pub fn scan<'a>(
        providers: impl IntoIterator<Item = &'a dyn FormulaProvider>,
        filter: &ModuleFilter,
    ) -> Self {
        let mut registry = Self::new();
        for provider in providers {
            let module = provider.module_path();
            if !filter.accepts(module) {
                debug!(target: "ability::formula", module, "skipping filtered module");
                continue;
            }
            for decl in provider.declarations() {
                registry.register(decl);
            }
        }
        debug!(
            target: "ability::formula",
            formulas = registry.len(),
            "formula registry built"
        );
        registry
    }

    /// Registry containing the built-in formula library.
    pub fn with_builtins() -> Self {
        let builtins = super::builtin::BuiltinFormulas;
        Self::scan([&builtins as &dyn FormulaProvider], &ModuleFilter::default())
    }

    /// Registers a declaration if it is public and carries [`FORMULA_TAG`].
    ///
    /// Returns whether the declaration was accepted.
    pub fn register(&mut self, decl: FormulaDecl) -> bool {
        if decl.visibility != Visibility::Public || !decl.tags.contains(&FORMULA_TAG) {
            return false;
        }

        let canonical = decl.signature.canonical();
        let entry = FormulaEntry {
            signature: decl.signature,
            canonical: canonical.clone(),
            func: decl.func,
            tags: decl.tags,
        };
        if self
            .entries
            .insert(canonical.clone(), FormulaHandle(Arc::new(entry)))
            .is_some()
        {
            warn!(
                target: "ability::formula",
                signature = %canonical,
                "duplicate formula signature, later registration wins"
            );
        }
        true
    }

    /// Looks up a formula by signature text.
    ///
    /// The text is canonicalized first, so alias spellings resolve. Unknown or
    /// unparsable signatures return `None`.
    pub fn lookup(&self, signature: &str) -> Option<FormulaHandle> {
        if let Some(handle) = self.entries.get(signature) {
            return Some(handle.clone());
        }
        let canonical = FormulaSignature::parse(signature).ok()?.canonical();
        self.entries.get(&canonical).cloned()
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.lookup(signature).is_some()
    }

    /// Sorted display strings of every formula tagged `tag` with the given shape.
    pub fn enumerate(&self, tag: &str, shape: &FormulaShape) -> Vec<String> {
        let mut matches: Vec<String> = self
            .entries
            .values()
            .map(FormulaHandle::entry)
            .filter(|entry| entry.has_tag(tag) && entry.signature.shape() == *shape)
            .map(|entry| entry.canonical.clone())
            .collect();
        matches.sort();
        matches
    }

    /// All canonical signatures, sorted.
    pub fn signatures(&self) -> Vec<&str> {
        let mut all: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        all.sort_unstable();
        all
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double(args: &[FormulaArg]) -> f64 {
        args[0].as_f64() * 2.0
    }

    fn triple(args: &[FormulaArg]) -> f64 {
        args[0].as_f64() * 3.0
    }

    fn sig(method: &str) -> FormulaSignature {
        FormulaSignature::new(
            ValueType::Float,
            "Test",
            method,
            [ValueType::Float, ValueType::Int],
        )
    }

    struct Provider {
        module: &'static str,
        decls: Vec<FormulaDecl>,
    }

    impl FormulaProvider for Provider {
        fn module_path(&self) -> &str {
            self.module
        }

        fn declarations(&self) -> Vec<FormulaDecl> {
            self.decls.clone()
        }
    }

    #[test]
    fn only_public_tagged_formulas_register() {
        let mut registry = FormulaRegistry::new();
        assert!(registry.register(FormulaDecl::new(sig("public"), double)));
        assert!(!registry.register(FormulaDecl::new(sig("hidden"), double).private()));
        assert!(!registry.register(FormulaDecl::new(sig("bare"), double).untagged()));

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("float Test::public(float, int)"));
    }

    #[test]
    fn lookup_normalizes_alias_spelling() {
        let mut registry = FormulaRegistry::new();
        registry.register(FormulaDecl::new(sig("double"), double));

        let handle = registry.lookup("f64 Test::double(double, i32)").unwrap();
        assert_eq!(
            handle.invoke(&[FormulaArg::Float(4.0), FormulaArg::Int(1)]),
            8.0
        );
    }

    #[test]
    fn unknown_or_malformed_lookup_is_none() {
        let registry = FormulaRegistry::with_builtins();
        assert!(registry.lookup("float Nope::nothing(float, int)").is_none());
        assert!(registry.lookup("not a signature").is_none());
    }

    #[test]
    fn collisions_are_last_write_wins() {
        let mut registry = FormulaRegistry::new();
        registry.register(FormulaDecl::new(sig("scale"), double));
        registry.register(FormulaDecl::new(sig("scale"), triple));

        assert_eq!(registry.len(), 1);
        let handle = registry.lookup("float Test::scale(float, int)").unwrap();
        assert_eq!(
            handle.invoke(&[FormulaArg::Float(1.0), FormulaArg::Int(1)]),
            3.0
        );
    }

    #[test]
    fn scan_applies_module_filter() {
        let game = Provider {
            module: "spells::fire",
            decls: vec![FormulaDecl::new(sig("fire"), double)],
        };
        let infra = Provider {
            module: "test::fixtures",
            decls: vec![FormulaDecl::new(sig("fixture"), double)],
        };
        let lookalike = Provider {
            module: "testing_grounds",
            decls: vec![FormulaDecl::new(sig("lookalike"), double)],
        };

        let registry = FormulaRegistry::scan(
            [
                &game as &dyn FormulaProvider,
                &infra as &dyn FormulaProvider,
                &lookalike as &dyn FormulaProvider,
            ],
            &ModuleFilter::default(),
        );

        assert!(registry.contains("float Test::fire(float, int)"));
        assert!(!registry.contains("float Test::fixture(float, int)"));
        assert!(registry.contains("float Test::lookalike(float, int)"));
    }

    #[test]
    fn enumerate_filters_by_tag_and_shape_sorted() {
        let mut registry = FormulaRegistry::new();
        registry.register(FormulaDecl::new(sig("zeta"), double).tagged("cooldown"));
        registry.register(FormulaDecl::new(sig("alpha"), double).tagged("cooldown"));
        registry.register(FormulaDecl::new(sig("other"), double));
        registry.register(
            FormulaDecl::new(
                FormulaSignature::new(ValueType::Int, "Test", "wrong_shape", [ValueType::Int]),
                double,
            )
            .tagged("cooldown"),
        );

        let listed = registry.enumerate("cooldown", &FormulaShape::timing());
        assert_eq!(
            listed,
            vec![
                "float Test::alpha(float, int)".to_string(),
                "float Test::zeta(float, int)".to_string(),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "do not match formula")]
    fn invoking_with_wrong_arguments_panics() {
        let mut registry = FormulaRegistry::new();
        registry.register(FormulaDecl::new(sig("double"), double));
        let handle = registry.lookup("float Test::double(float, int)").unwrap();
        handle.invoke(&[FormulaArg::Int(1)]);
    }

    #[test]
    fn allow_all_keeps_infrastructure_modules() {
        let infra = Provider {
            module: "test::fixtures",
            decls: vec![FormulaDecl::new(sig("fixture"), double)],
        };
        let registry =
            FormulaRegistry::scan([&infra as &dyn FormulaProvider], &ModuleFilter::allow_all());

        assert!(registry.contains("float Test::fixture(float, int)"));
        assert!(ModuleFilter::allow_all().accepts("std::anything"));
    }
}

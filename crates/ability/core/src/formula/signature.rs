//! Canonical formula signatures.
//!
//! A signature is the persisted, human-readable name of a formula:
//!
//! ```text
//! <return> <declaring type>::<method>(<param>, <param>, ...)
//! float Fire::cast_time(float, int)
//! ```
//!
//! Type names are normalized so that every floating-point spelling (`f32`,
//! `f64`, `double`, `single`, ...) canonicalizes to `float` and every integer
//! spelling to `int`. Two signatures that differ only in alias spelling
//! therefore resolve to the same registry entry.

use core::fmt;

use crate::error::{EngineError, ErrorSeverity};

/// Value types that can appear in a formula signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum ValueType {
    Float,
    Int,
    Bool,
}

impl ValueType {
    /// Resolves a type name, accepting common aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "float" | "f32" | "f64" | "double" | "single" | "real" | "system.single"
            | "system.double" => Some(Self::Float),
            "int" | "i32" | "i64" | "u32" | "integer" | "long" | "system.int32"
            | "system.int64" => Some(Self::Int),
            "bool" | "boolean" | "system.boolean" => Some(Self::Bool),
            _ => None,
        }
    }
}

/// The part of a signature that determines call compatibility.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FormulaShape {
    pub return_type: ValueType,
    pub params: Vec<ValueType>,
}

impl FormulaShape {
    pub fn new(return_type: ValueType, params: impl Into<Vec<ValueType>>) -> Self {
        Self {
            return_type,
            params: params.into(),
        }
    }

    /// Shape used by ability timing values: `float (float base, int level)`.
    pub fn timing() -> Self {
        Self::new(ValueType::Float, [ValueType::Float, ValueType::Int])
    }
}

/// Structured form of a formula signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FormulaSignature {
    pub return_type: ValueType,
    pub declaring_type: String,
    pub method: String,
    pub params: Vec<ValueType>,
}

impl FormulaSignature {
    pub fn new(
        return_type: ValueType,
        declaring_type: impl Into<String>,
        method: impl Into<String>,
        params: impl Into<Vec<ValueType>>,
    ) -> Self {
        Self {
            return_type,
            declaring_type: declaring_type.into(),
            method: method.into(),
            params: params.into(),
        }
    }

    /// Parses signature text, normalizing type aliases.
    pub fn parse(text: &str) -> Result<Self, SignatureError> {
        let malformed = |reason: &'static str| SignatureError::Malformed {
            text: text.to_string(),
            reason,
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(malformed("empty signature"));
        }

        let (head, rest) = trimmed
            .split_once(char::is_whitespace)
            .ok_or_else(|| malformed("missing return type"))?;
        let return_type = parse_type(text, head)?;

        let rest = rest.trim();
        let open = rest.find('(').ok_or_else(|| malformed("missing parameter list"))?;
        if !rest.ends_with(')') {
            return Err(malformed("unterminated parameter list"));
        }

        let path = rest[..open].trim();
        let (declaring_type, method) = path
            .rsplit_once("::")
            .ok_or_else(|| malformed("expected <type>::<method>"))?;
        if declaring_type.trim().is_empty() || method.trim().is_empty() {
            return Err(malformed("expected <type>::<method>"));
        }
        if !method.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(malformed("method name must be an identifier"));
        }

        let inner = rest[open + 1..rest.len() - 1].trim();
        let params = if inner.is_empty() {
            Vec::new()
        } else {
            inner
                .split(',')
                .map(|name| parse_type(text, name))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self::new(
            return_type,
            declaring_type.trim(),
            method.trim(),
            params,
        ))
    }

    /// Canonical text used as the registry key.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    pub fn shape(&self) -> FormulaShape {
        FormulaShape::new(self.return_type, self.params.clone())
    }
}

impl fmt::Display for FormulaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}::{}(",
            self.return_type, self.declaring_type, self.method
        )?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

fn parse_type(text: &str, name: &str) -> Result<ValueType, SignatureError> {
    ValueType::from_name(name).ok_or_else(|| SignatureError::UnknownType {
        text: text.to_string(),
        type_name: name.trim().to_string(),
    })
}

/// Errors produced while parsing signature text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("malformed formula signature {text:?}: {reason}")]
    Malformed { text: String, reason: &'static str },

    #[error("unknown type {type_name:?} in formula signature {text:?}")]
    UnknownType { text: String, type_name: String },
}

impl EngineError for SignatureError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "FORMULA_SIGNATURE_MALFORMED",
            Self::UnknownType { .. } => "FORMULA_SIGNATURE_UNKNOWN_TYPE",
        }
    }
}

use thiserror::Error;

/// The kind of name an [`TranslateError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NameKind {
    Class,
    Method,
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: NameKind,
        name: String,
        reason: String,
    },
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: NameKind, name: String },
    #[error("source code has no classes")]
    NoClasses,
    #[error("class '{class}' has no methods")]
    NoMethods { class: String },
    #[error(
        "method ({arguments}) returning {return_type} matches more than one interface method: {}",
        .candidates.join(", ")
    )]
    AmbiguousInterfaceMethod {
        arguments: String,
        return_type: String,
        candidates: Vec<String>,
    },
    #[error("unsupported expression: {0}")]
    Unsupported(String),
}

impl TranslateError {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            TranslateError::InvalidName { .. } => "R001",
            TranslateError::DuplicateName { .. } => "R002",
            TranslateError::NoClasses => "R003",
            TranslateError::NoMethods { .. } => "R004",
            TranslateError::AmbiguousInterfaceMethod { .. } => "R005",
            TranslateError::Unsupported(_) => "R006",
        }
    }
}

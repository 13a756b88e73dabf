//! readex core
//!
//! The expression tree model rendered by `readex-translate`: nodes, type
//! references, member descriptors and factory helpers.

pub mod build;
pub mod expr;
pub mod members;
pub mod types;

pub use expr::{Expr, ExprKind, ExprRef};
pub use types::TypeRef;

use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid expression tree JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Deserializes an expression tree from JSON.
pub fn from_json(json: &str) -> Result<ExprRef, ModelError> {
    let expr: Expr = serde_json::from_str(json)?;
    Ok(Arc::new(expr))
}

/// Serializes an expression tree to pretty-printed JSON.
pub fn to_json(expr: &Expr) -> Result<String, ModelError> {
    Ok(serde_json::to_string_pretty(expr)?)
}

#[cfg(test)]
mod tests {
    use super::build::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_roundtrip_preserves_tree() {
        let x = parameter(TypeRef::int(), "x");
        let tree = lambda(vec![x.clone()], add(x.expr(), int(1)));
        let json = to_json(&tree).unwrap();
        assert!(json.contains("\"node\": \"lambda\""));
        let back = from_json(&json).unwrap();
        assert_eq!(*back, *tree);
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = from_json("{\"node\": \"nonsense\"}").unwrap_err();
        assert!(err.to_string().contains("invalid expression tree JSON"));
    }
}

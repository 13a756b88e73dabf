//! readex translation engine
//!
//! Renders expression trees from `readex-core` as readable C#-style source
//! text, either as a standalone expression or statement list, or as whole
//! classes and methods through [`SourceCodeBuilder`].
//!
//! ```ignore
//! use readex_core::build::*;
//! use readex_translate::{translate, TranslationSettings};
//!
//! let x = parameter(TypeRef::int(), "x");
//! let tree = lambda(vec![x.clone()], add(x.expr(), int(1)));
//! assert_eq!(translate(&tree, &TranslationSettings::default()), "x => x + 1");
//! ```

pub mod diagnostics;
pub mod error;
pub mod source;
pub mod translation;

pub use error::{NameKind, TranslateError};
pub use source::{
    to_class_source, to_method_source, to_source_code, ClassBuilder, MethodBuilder, SourceCode,
    SourceCodeBuilder,
};
pub use translation::context::TranslationContext;
pub use translation::formatter::{
    HtmlFormatter, PlainTextFormatter, TokenType, TranslationFormatter,
};
pub use translation::settings::{OutputFormat, SettingsConfig, TranslationSettings};
pub use translation::{translate, translate_raw, ExpressionTranslation};

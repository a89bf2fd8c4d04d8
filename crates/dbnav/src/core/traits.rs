//! Core traits shared by every driver.
//!
//! - [`Dialect`]: SQL identifier syntax for a database engine
//! - [`QualifiedName`]: objects that can render a fully qualified name
//!
//! # Design Patterns
//!
//! - **Strategy**: `Dialect` implementations provide interchangeable quoting rules
//! - **Template Method**: `quote_ident_if_needed` is built on the dialect's
//!   case folding, extra identifier characters and reserved words

use crate::error::Result;

use super::identifier::{is_plain_identifier, validate_identifier, IdentifierCase};

/// Which form of a name the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationContext {
    /// Display form: plain names joined by the structure separator.
    Ui,
    /// DDL-safe form: each part quoted by the dialect where required.
    Ddl,
}

/// SQL identifier syntax for a database engine.
///
/// This trait is used through the `DialectImpl` enum in the `drivers`
/// module for static dispatch.
pub trait Dialect: Send + Sync {
    /// Get the dialect identifier (e.g., "mysql", "oracle").
    fn name(&self) -> &str;

    /// How unquoted identifiers are folded by the server.
    fn identifier_case(&self) -> IdentifierCase;

    /// Quote an identifier unconditionally.
    ///
    /// - MySQL: `` `identifier` ``
    /// - Oracle/PostgreSQL: `"identifier"`
    fn quote_ident(&self, name: &str) -> Result<String>;

    /// Characters besides `[A-Za-z0-9_]` allowed in unquoted identifiers.
    fn extra_ident_chars(&self) -> &'static [char] {
        &[]
    }

    /// Words that must always be quoted when used as identifiers.
    fn reserved_words(&self) -> &'static [&'static str] {
        &[]
    }

    /// Separator between qualified name parts.
    fn structure_separator(&self) -> char {
        '.'
    }

    /// Quote an identifier only when leaving it bare would change its meaning.
    fn quote_ident_if_needed(&self, name: &str) -> Result<String> {
        validate_identifier(name)?;
        if is_plain_identifier(
            name,
            self.identifier_case(),
            self.extra_ident_chars(),
            self.reserved_words(),
        ) {
            Ok(name.to_string())
        } else {
            self.quote_ident(name)
        }
    }

    /// Join name parts into a qualified name for the given context.
    fn qualify(&self, parts: &[&str], ctx: EvaluationContext) -> Result<String> {
        let rendered = parts
            .iter()
            .map(|p| match ctx {
                EvaluationContext::Ui => {
                    validate_identifier(p)?;
                    Ok(p.to_string())
                }
                EvaluationContext::Ddl => self.quote_ident_if_needed(p),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(rendered.join(&self.structure_separator().to_string()))
    }
}

/// Objects that can render their fully qualified name.
pub trait QualifiedName {
    /// Build the qualified name in the requested form.
    fn qualified_name(&self, ctx: EvaluationContext) -> Result<String>;
}

//! Spineless Template Compiler
//!
//! Turns a declarative JSON node description into a live element subtree,
//! optionally recording named references onto an owner.
//!
//! The template format is this system's most compatibility-sensitive
//! surface: the reserved-key list and the "unreserved keys become
//! attributes" rule must be preserved exactly.

mod compiler;
mod node;

pub use compiler::{RefSink, compile};
pub use node::TemplateNode;

/// Template keys with special meaning; everything else is applied verbatim
/// as an element attribute. `id` and `form` are compiler directives and are
/// never rendered as attributes.
pub const RESERVED_KEYS: [&str; 6] = ["id", "tag", "children", "className", "text", "form"];

/// Parse a template node from JSON text.
///
/// Malformed input (non-object nodes included) is a programmer error and
/// fails fast here rather than being coerced.
pub fn parse(json: &str) -> Result<TemplateNode, TemplateError> {
    Ok(serde_json::from_str(json)?)
}

/// Template compilation errors
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("malformed template: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tree operation failed: {0}")]
    Dom(#[from] spineless_dom::DomError),
}

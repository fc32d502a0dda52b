//! Restores MyBatis-style dynamic SQL statement trees into plain SQL text.
//!
//! Directive conditions are never evaluated: every `<if>`, `<when>` and
//! `<otherwise>` body is emitted, so the restored text covers every table and
//! column any expansion of the statement could touch.

mod ast;
mod builder;
mod engine;
mod error;
mod interface;
mod parser;
mod restore;

// Public exports.
pub use ast::{
    ChooseNode, IfNode, Node, OtherwiseNode, PlaceholderKind, PlaceholderNode, RootNode, SetNode,
    TextNode, TrimNode, WhenNode, WhereNode,
};
pub use builder::TreeBuilder;
pub use engine::MapperEngine;
pub use error::{MapperlateError, MapperlateResult, ParseError, ParseErrorKind};
pub use interface::{DirectiveKind, NodeAttributes, SqlNode};
pub use parser::parse_text;

//! A small, lenient tree model for Web Forms markup.
//!
//! Only as much HTML as the converter needs is understood: elements,
//! attributes, text, comments and opaque raw chunks (server code blocks,
//! doctype declarations). Anything that is not rewritten prints back the way
//! it was read, apart from whitespace inside tags.

pub mod parse;
pub mod print;
pub mod tree;

pub use parse::parse;
pub use tree::{Attribute, Document, Element, Node, Quote};

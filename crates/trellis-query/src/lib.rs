//! Trellis selector queries
//!
//! A CSS-like selector engine over a `trellis_tree::WidgetTree`. A query
//! takes a scope node and a selector string (or a widget type) and returns
//! the ordered, deduplicated set of self-and-descendant matches, with
//! further refinement (filter, exclude, type narrowing), positional access
//! and strict error reporting.
//!
//! Selector syntax: `TypeName`, `#id`, `.class` (concatenable), `*`;
//! whitespace = descendant combinator, `>` = child combinator, `,` for
//! alternatives.

mod cache;
mod engine;
mod error;
mod matcher;
mod parser;
mod result;
mod selector;

pub use cache::SelectorCache;
pub use engine::{IntoSelector, QueryEngine};
pub use error::QueryError;
pub use parser::parse_selector;
pub use result::QueryResults;
pub use selector::{
    Combinator, CompoundSelector, SelectorChain, SelectorGroup, SelectorStep, SimpleSelector,
};

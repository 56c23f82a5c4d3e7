//! Selector data model and compound matching
//!
//! A parsed selector is a group of alternative chains; each chain is a run
//! of combinator-linked compound selectors; each compound is a conjunction
//! of simple node-level constraints.

use trellis_tree::{Node, WidgetTree};

/// A single node-level constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// Universal selector `*`
    Universal,
    /// Type selector, matched polymorphically through the type registry
    Type(Box<str>),
    /// Id selector `#id` (exact, case-sensitive)
    Id(Box<str>),
    /// Class selector `.class`
    Class(Box<str>),
}

impl SimpleSelector {
    pub(crate) fn matches(&self, node: &Node, tree: &WidgetTree) -> bool {
        match self {
            SimpleSelector::Universal => true,
            // An unregistered type name matches nothing.
            SimpleSelector::Type(name) => tree
                .registry()
                .lookup(name)
                .is_some_and(|ty| tree.registry().is_subtype(node.widget_type(), ty)),
            SimpleSelector::Id(id) => node.id() == Some(id.as_ref()),
            SimpleSelector::Class(class) => node.has_class(class),
        }
    }
}

/// Conjunction of simple selectors tested against one node
///
/// The parser guarantees at most one type and one id constraint per
/// compound; class constraints may repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub(crate) selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    pub(crate) fn matches(&self, node: &Node, tree: &WidgetTree) -> bool {
        self.selectors.iter().all(|s| s.matches(node, tree))
    }
}

/// Tree relationship required between adjacent chain steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Any level below the left match
    Descendant,
    /// Immediate child of the left match
    Child,
}

/// One step of a chain: how it relates to the previous step, and what the
/// node itself must satisfy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorStep {
    pub(crate) combinator: Combinator,
    pub(crate) compound: CompoundSelector,
}

/// Ordered steps read left to right, narrowing candidates progressively
///
/// The first step's combinator is always `Descendant`: it anchors the chain
/// to the query scope, self-inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorChain {
    pub(crate) steps: Vec<SelectorStep>,
}

/// Comma-separated alternatives; a node matches the group if it matches any
/// chain (union semantics)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorGroup {
    pub(crate) chains: Vec<SelectorChain>,
}

impl SelectorGroup {
    /// Group equivalent to a bare type token: one chain, one type step
    pub(crate) fn from_type_name(name: &str) -> Self {
        SelectorGroup {
            chains: vec![SelectorChain {
                steps: vec![SelectorStep {
                    combinator: Combinator::Descendant,
                    compound: CompoundSelector {
                        selectors: vec![SimpleSelector::Type(name.into())],
                    },
                }],
            }],
        }
    }
}

//! Query result set

use std::ops::{Index, Range};

use trellis_tree::{NodeId, WidgetTree, WidgetType};

use crate::engine::{IntoSelector, QueryEngine};
use crate::error::QueryError;
use crate::matcher;

/// Ordered, deduplicated query matches in document order
///
/// Every refinement returns a fresh set; nothing is edited in place. The
/// borrow of the tree guarantees no mutation can happen while a result set
/// is alive.
#[derive(Debug)]
pub struct QueryResults<'a> {
    engine: &'a QueryEngine,
    tree: &'a WidgetTree,
    nodes: Vec<NodeId>,
}

impl<'a> QueryResults<'a> {
    pub(crate) fn new(engine: &'a QueryEngine, tree: &'a WidgetTree, nodes: Vec<NodeId>) -> Self {
        Self { engine, tree, nodes }
    }

    fn derive(&self, nodes: Vec<NodeId>) -> QueryResults<'a> {
        QueryResults {
            engine: self.engine,
            tree: self.tree,
            nodes,
        }
    }

    /// Matched nodes in document order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of matches
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A result set is "truthy" iff it is non-empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keep only nodes matching `selector`, order preserved
    ///
    /// Nodes are tested in full-tree context: combinator prefixes resolve
    /// through the live ancestor chain, not the original query scope.
    pub fn filter(&self, selector: impl IntoSelector) -> Result<QueryResults<'a>, QueryError> {
        let group = selector.into_group(self.engine, self.tree)?;
        Ok(self.derive(
            self.iter()
                .filter(|&node| matcher::matches_node(self.tree, node, &group))
                .collect(),
        ))
    }

    /// Drop nodes matching `selector`, order preserved
    ///
    /// Complementary to `filter`: the same contextual matching rule, negated.
    pub fn exclude(&self, selector: impl IntoSelector) -> Result<QueryResults<'a>, QueryError> {
        let group = selector.into_group(self.engine, self.tree)?;
        Ok(self.derive(
            self.iter()
                .filter(|&node| !matcher::matches_node(self.tree, node, &group))
                .collect(),
        ))
    }

    /// Keep only nodes that are instances of `ty` (or a subtype)
    ///
    /// Non-matching nodes are silently dropped, never an error.
    pub fn results(&self, ty: WidgetType) -> QueryResults<'a> {
        let registry = self.tree.registry();
        self.derive(
            self.iter()
                .filter(|&node| registry.is_subtype(self.tree.node(node).widget_type(), ty))
                .collect(),
        )
    }

    /// Positional access without the bounds panic of indexing
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Subsequence for `range`, clamped to the set's bounds
    pub fn slice(&self, range: Range<usize>) -> QueryResults<'a> {
        let start = range.start.min(self.nodes.len());
        let end = range.end.min(self.nodes.len()).max(start);
        self.derive(self.nodes[start..end].to_vec())
    }

    /// Iterate matches in document order; `rev()` gives the exact reverse
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, NodeId>> {
        self.nodes.iter().copied()
    }

    /// First match in document order
    pub fn first(&self) -> Result<NodeId, QueryError> {
        self.nodes.first().copied().ok_or(QueryError::NoMatches)
    }

    /// First match, required to be an instance of `ty`
    pub fn first_of(&self, ty: WidgetType) -> Result<NodeId, QueryError> {
        let node = self.first()?;
        self.expect_type(node, ty)
    }

    /// Last match in document order
    pub fn last(&self) -> Result<NodeId, QueryError> {
        self.nodes.last().copied().ok_or(QueryError::NoMatches)
    }

    /// Last match, required to be an instance of `ty`
    pub fn last_of(&self, ty: WidgetType) -> Result<NodeId, QueryError> {
        let node = self.last()?;
        self.expect_type(node, ty)
    }

    fn expect_type(&self, node: NodeId, ty: WidgetType) -> Result<NodeId, QueryError> {
        let registry = self.tree.registry();
        let actual = self.tree.node(node).widget_type();
        if registry.is_subtype(actual, ty) {
            Ok(node)
        } else {
            Err(QueryError::WrongType {
                expected: registry.name(ty).to_string(),
                actual: registry.name(actual).to_string(),
            })
        }
    }
}

impl Index<usize> for QueryResults<'_> {
    type Output = NodeId;

    fn index(&self, index: usize) -> &NodeId {
        &self.nodes[index]
    }
}

impl<'a> IntoIterator for &'a QueryResults<'_> {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

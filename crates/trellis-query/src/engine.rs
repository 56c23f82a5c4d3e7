//! Query entry point

use std::sync::Arc;

use tracing::debug;
use trellis_tree::{NodeId, WidgetTree, WidgetType};

use crate::cache::SelectorCache;
use crate::error::QueryError;
use crate::matcher;
use crate::result::QueryResults;
use crate::selector::SelectorGroup;

/// Selector query engine
///
/// Owns the parse cache, so hosts (and tests) construct, share and reset it
/// explicitly instead of going through process-global state.
#[derive(Debug, Default)]
pub struct QueryEngine {
    cache: SelectorCache,
}

impl QueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine around an existing cache
    pub fn with_cache(cache: SelectorCache) -> Self {
        Self { cache }
    }

    /// The engine's selector parse cache
    pub fn cache(&self) -> &SelectorCache {
        &self.cache
    }

    /// Query `scope` and its subtree for nodes matching `selector`
    ///
    /// Accepts a selector string or a `WidgetType`. Only a malformed
    /// selector string fails; a query matching nothing returns an empty
    /// result set. Results are computed fresh from the tree's current state
    /// on every call; only the parsed selector is cached.
    pub fn query<'a>(
        &'a self,
        tree: &'a WidgetTree,
        scope: NodeId,
        selector: impl IntoSelector,
    ) -> Result<QueryResults<'a>, QueryError> {
        let group = selector.into_group(self, tree)?;
        let nodes = matcher::evaluate(tree, scope, &group);
        debug!(matches = nodes.len(), "query evaluated");
        Ok(QueryResults::new(self, tree, nodes))
    }
}

/// A query argument: a selector string or a widget type
pub trait IntoSelector {
    fn into_group(
        self,
        engine: &QueryEngine,
        tree: &WidgetTree,
    ) -> Result<Arc<SelectorGroup>, QueryError>;
}

impl IntoSelector for &str {
    fn into_group(
        self,
        engine: &QueryEngine,
        _tree: &WidgetTree,
    ) -> Result<Arc<SelectorGroup>, QueryError> {
        engine.cache().get_or_parse(self)
    }
}

/// Equivalent to a selector holding only this type constraint
impl IntoSelector for WidgetType {
    fn into_group(
        self,
        _engine: &QueryEngine,
        tree: &WidgetTree,
    ) -> Result<Arc<SelectorGroup>, QueryError> {
        Ok(Arc::new(SelectorGroup::from_type_name(
            tree.registry().name(self),
        )))
    }
}

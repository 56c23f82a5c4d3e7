//! Widget tree (arena-based allocation)

use tracing::trace;

use crate::{Node, NodeId, TypeRegistry, WidgetType};

/// Arena-based widget tree
///
/// Nodes are stored in a `Vec` and addressed by `NodeId`. Children are owned
/// by their parent (the arena); the parent link is a non-owning back-reference
/// used for ancestor walks. The tree owns the type registry so queries can
/// resolve type names against the live hierarchy.
#[derive(Debug)]
pub struct WidgetTree {
    registry: TypeRegistry,
    nodes: Vec<Node>,
}

impl WidgetTree {
    /// Create a tree with a root node of the given type
    pub fn new(registry: TypeRegistry, root_type: WidgetType) -> Self {
        Self {
            registry,
            nodes: vec![Node::new(root_type, None)],
        }
    }

    /// The type registry backing this tree
    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Mutable access to the type registry
    #[inline]
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    /// Root node ID
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Append a new child node under `parent`
    pub fn spawn(&mut self, widget_type: WidgetType, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(widget_type, Some(parent)));
        self.nodes[parent.index()].children.push(id);
        trace!(node = id.0, parent = parent.0, "spawned widget");
        id
    }

    /// Get a node by ID
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a node by ID, panicking if the ID is not from this tree
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always contains at least the root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Set a node's id attribute
    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.nodes[node.index()].id = Some(id.into());
    }

    /// Add a class to a node (no-op if already present)
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let node = &mut self.nodes[node.index()];
        if !node.has_class(class) {
            node.classes.push(class.into());
        }
    }

    /// Add several classes at once
    pub fn add_classes(&mut self, node: NodeId, classes: &[&str]) {
        for class in classes {
            self.add_class(node, class);
        }
    }

    /// Remove a class from a node (no-op if absent)
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.index()]
            .classes
            .retain(|c| c.as_ref() != class);
    }

    /// Toggle a class, returning whether it is now present
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.nodes[node.index()].has_class(class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    /// Check a node for a class
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.index()].has_class(class)
    }

    /// Parent of a node (None for the root)
    #[inline]
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    /// Ordered children of a node
    #[inline]
    pub fn children_of(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }

    /// Pre-order, self-inclusive walk of `scope` and its subtree
    ///
    /// This is the tree's document order: every query result is a
    /// subsequence of it.
    pub fn descendants(&self, scope: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![scope],
        }
    }

    /// Proper ancestors of a node, nearest first
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.parent_of(node),
        }
    }

    /// Check whether `ancestor` is a proper ancestor of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }
}

/// Pre-order, self-inclusive subtree iterator
pub struct Descendants<'a> {
    tree: &'a WidgetTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Children pushed in reverse so the first child is visited next.
        for &child in self.tree.children_of(id).iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

/// Parent-chain iterator, nearest ancestor first
pub struct Ancestors<'a> {
    tree: &'a WidgetTree,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.parent_of(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (WidgetTree, Vec<NodeId>) {
        // root -> (a -> (c, d), b)
        let registry = TypeRegistry::new("Widget");
        let mut tree = WidgetTree::new(registry, WidgetType::ROOT);
        let a = tree.spawn(WidgetType::ROOT, tree.root());
        let b = tree.spawn(WidgetType::ROOT, tree.root());
        let c = tree.spawn(WidgetType::ROOT, a);
        let d = tree.spawn(WidgetType::ROOT, a);
        (tree, vec![a, b, c, d])
    }

    #[test]
    fn test_spawn_links() {
        let (tree, ids) = sample_tree();
        let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);
        assert_eq!(tree.children_of(tree.root()), &[a, b]);
        assert_eq!(tree.children_of(a), &[c, d]);
        assert_eq!(tree.parent_of(c), Some(a));
        assert_eq!(tree.parent_of(tree.root()), None);
    }

    #[test]
    fn test_descendants_pre_order() {
        let (tree, ids) = sample_tree();
        let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);
        let order: Vec<NodeId> = tree.descendants(tree.root()).collect();
        assert_eq!(order, vec![tree.root(), a, c, d, b]);

        // Scoped walk is self-inclusive
        let scoped: Vec<NodeId> = tree.descendants(a).collect();
        assert_eq!(scoped, vec![a, c, d]);
    }

    #[test]
    fn test_descendants_of_leaf() {
        let (tree, ids) = sample_tree();
        let leaf: Vec<NodeId> = tree.descendants(ids[2]).collect();
        assert_eq!(leaf, vec![ids[2]]);
    }

    #[test]
    fn test_ancestors() {
        let (tree, ids) = sample_tree();
        let (a, c) = (ids[0], ids[2]);
        let chain: Vec<NodeId> = tree.ancestors(c).collect();
        assert_eq!(chain, vec![a, tree.root()]);
        assert!(tree.is_ancestor(tree.root(), c));
        assert!(tree.is_ancestor(a, c));
        assert!(!tree.is_ancestor(c, a));
        assert!(!tree.is_ancestor(c, c));
    }

    #[test]
    fn test_classes() {
        let (mut tree, ids) = sample_tree();
        let a = ids[0];
        tree.add_classes(a, &["float", "transient"]);
        tree.add_class(a, "float"); // duplicate ignored
        assert!(tree.has_class(a, "float"));
        assert!(tree.has_class(a, "transient"));
        assert_eq!(tree.node(a).classes().count(), 2);

        tree.remove_class(a, "float");
        assert!(!tree.has_class(a, "float"));

        assert!(tree.toggle_class(a, "float"));
        assert!(!tree.toggle_class(a, "float"));
        assert!(!tree.has_class(a, "float"));
    }

    #[test]
    fn test_ids() {
        let (mut tree, ids) = sample_tree();
        tree.set_id(ids[0], "main");
        assert_eq!(tree.node(ids[0]).id(), Some("main"));
        assert_eq!(tree.node(ids[1]).id(), None);
    }
}

//! Widget node data

use crate::{NodeId, WidgetType};

/// A node in the widget tree
///
/// Identity is the arena `NodeId`. The id attribute is optional and not
/// required to be unique; classes are a presence set (order irrelevant);
/// children order is meaningful and stable.
#[derive(Debug)]
pub struct Node {
    /// Runtime widget type tag
    pub(crate) widget_type: WidgetType,
    /// Optional id attribute
    pub(crate) id: Option<Box<str>>,
    /// Class names carried by this node
    pub(crate) classes: Vec<Box<str>>,
    /// Parent node (None for the root)
    pub(crate) parent: Option<NodeId>,
    /// Ordered children
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(widget_type: WidgetType, parent: Option<NodeId>) -> Self {
        Self {
            widget_type,
            id: None,
            classes: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }

    /// Runtime type tag
    #[inline]
    pub fn widget_type(&self) -> WidgetType {
        self.widget_type
    }

    /// Id attribute, if set
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Parent node, if any
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered child list
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Check for a class by exact name
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c.as_ref() == class)
    }

    /// Class names in insertion order
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|c| c.as_ref())
    }
}

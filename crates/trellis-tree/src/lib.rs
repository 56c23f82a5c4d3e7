//! Trellis widget tree
//!
//! Arena-based widget tree with a runtime type registry. The query engine
//! consumes this crate through node identity, parent/child links, type tags,
//! ids and class sets.

mod node;
mod registry;
mod tree;

pub use node::Node;
pub use registry::{RegistryError, TypeRegistry, WidgetType};
pub use tree::{Ancestors, Descendants, WidgetTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index of this node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

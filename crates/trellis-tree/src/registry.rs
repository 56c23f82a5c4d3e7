//! Widget type registry
//!
//! Widget types form a single-rooted hierarchy resolved at runtime: every
//! registered type names a parent, and "is-instance-of" walks the parent
//! chain. No reflection; a check costs O(depth of hierarchy).

use std::collections::HashMap;

/// Widget type tag - just 4 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct WidgetType(pub(crate) u32);

impl WidgetType {
    /// The root of the type hierarchy
    pub const ROOT: WidgetType = WidgetType(0);
}

/// Registration error
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("type {name:?} is already registered with a different parent")]
    ConflictingParent { name: String },
}

/// Runtime registry mapping type tags to names and parent tags
///
/// Tags index into parallel vectors; the name map gives exact
/// (case-sensitive) name lookup for selector type tokens.
#[derive(Debug)]
pub struct TypeRegistry {
    names: Vec<Box<str>>,
    parents: Vec<Option<WidgetType>>,
    by_name: HashMap<Box<str>, WidgetType>,
}

impl TypeRegistry {
    /// Create a registry with the given root type name (tag 0)
    pub fn new(root_name: &str) -> Self {
        let mut registry = Self {
            names: Vec::with_capacity(16),
            parents: Vec::with_capacity(16),
            by_name: HashMap::with_capacity(16),
        };
        registry.names.push(root_name.into());
        registry.parents.push(None);
        registry.by_name.insert(root_name.into(), WidgetType::ROOT);
        registry
    }

    /// Register a type under a parent, returning its tag
    ///
    /// Re-registering the same name with the same parent returns the
    /// existing tag.
    pub fn register(&mut self, name: &str, parent: WidgetType) -> Result<WidgetType, RegistryError> {
        if let Some(&existing) = self.by_name.get(name) {
            if self.parents[existing.0 as usize] == Some(parent) {
                return Ok(existing);
            }
            return Err(RegistryError::ConflictingParent { name: name.to_string() });
        }
        let tag = WidgetType(self.names.len() as u32);
        self.names.push(name.into());
        self.parents.push(Some(parent));
        self.by_name.insert(name.into(), tag);
        Ok(tag)
    }

    /// Look up a type by exact name
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<WidgetType> {
        self.by_name.get(name).copied()
    }

    /// Name of a type tag
    #[inline]
    pub fn name(&self, ty: WidgetType) -> &str {
        &self.names[ty.0 as usize]
    }

    /// Parent of a type tag (None for the root)
    #[inline]
    pub fn parent(&self, ty: WidgetType) -> Option<WidgetType> {
        self.parents[ty.0 as usize]
    }

    /// Check whether `ty` is `ancestor` or a transitive subtype of it
    pub fn is_subtype(&self, ty: WidgetType, ancestor: WidgetType) -> bool {
        let mut current = Some(ty);
        while let Some(t) = current {
            if t == ancestor {
                return true;
            }
            current = self.parents[t.0 as usize];
        }
        false
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if only the root is registered
    pub fn is_empty(&self) -> bool {
        self.names.len() <= 1
    }
}

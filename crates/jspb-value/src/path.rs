use core::fmt::Display;

use thisisplural::Plural;

/// Position of a node relative to the root of the tree being decoded.
///
/// Displayed as `$` for the root and `$[0][2]` for nested positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Plural)]
#[plural(len, is_empty, iter)]
pub struct NodePath(pub Vec<usize>);

impl NodePath {
    /// Create an empty path representing the root node
    pub fn root() -> Self {
        NodePath(Vec::new())
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of the element at `index` below this path.
    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        NodePath(segments)
    }

    pub fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }

    /// Append `other` below this path.
    pub fn join(&self, other: &NodePath) -> Self {
        let mut segments = self.0.clone();
        segments.extend_from_slice(&other.0);
        NodePath(segments)
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "$")?;
        for index in &self.0 {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}

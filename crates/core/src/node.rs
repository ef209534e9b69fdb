//! Tree rows
//!
//! A `Node` binds one entity (by index path) to a table row. Nodes live in
//! an arena owned by the `Table`; parents are referenced by `NodeId`, never
//! owned, so the tree carries no ownership cycle.

use crate::cache::CellCache;
use crate::entity::EntityPath;

/// Handle to a row in one table.
///
/// Ids carry the table generation they were issued in; a structural resync
/// bumps the generation, so ids from before it are rejected instead of
/// silently pointing at a different row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) fn slot(self) -> usize {
        self.index as usize
    }
}

#[derive(Debug)]
pub struct Node<P> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) path: EntityPath,
    /// `None` until first asked for; only ever filled for containers
    pub(crate) children: Option<Vec<NodeId>>,
    pub(crate) cache: CellCache<P>,
}

impl<P> Node<P> {
    pub(crate) fn new(parent: Option<NodeId>, path: EntityPath, columns: usize) -> Self {
        Self {
            parent,
            path,
            children: None,
            cache: CellCache::new(columns),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Index path of the bound entity within the provider's rows
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Nesting depth, 0 for top-level rows
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Whether child rows have been built yet
    pub fn children_materialized(&self) -> bool {
        self.children.is_some()
    }

    pub fn cache(&self) -> &CellCache<P> {
        &self.cache
    }
}

//! `charsheet-core` - generic table/tree binding.
//!
//! Entities of any kind are shown as rows through a `TableProvider`; the
//! `Table` wraps them in lazily built `Node`s, maps view columns to semantic
//! columns, memoizes rendered cells and supports find-and-reveal.

pub mod cache;
pub mod cell;
pub mod column;
pub mod entity;
pub mod error;
pub mod node;
pub mod provider;
pub mod search;
pub mod table;

#[cfg(test)]
pub mod harness;

pub use cache::{CellCache, CellRenderer};
pub use cell::{Alignment, CellData, CellKind};
pub use column::{ColumnHeader, ColumnMapper, ColumnSet, HeaderIcon, ViewContext};
pub use entity::{Entity, EntityId, EntityPath};
pub use error::TableError;
pub use node::{Node, NodeId};
pub use provider::{ItemVariant, TableProvider};
pub use search::Finder;
pub use table::Table;

//! The capability interface every row-backing domain object implements

use uuid::Uuid;

use crate::cell::CellData;
use crate::column::ColumnSet;

/// Stable identity of an entity, persisted with the document
pub type EntityId = Uuid;

/// A domain object shown as one table row, optionally containing like objects.
///
/// Entities are owned by their document collection. Tables reach them by
/// index path and never hold them directly.
pub trait Entity: Sized {
    /// The semantic columns this kind can produce
    type Column: ColumnSet;

    fn id(&self) -> EntityId;

    fn is_container(&self) -> bool;

    /// Child entities; empty for non-containers
    fn children(&self) -> &[Self];

    /// Mutable access to the child list. Callers check `is_container` first.
    fn children_mut(&mut self) -> &mut Vec<Self>;

    /// Persisted disclosure flag
    fn is_open(&self) -> bool;

    fn set_open(&mut self, open: bool);

    /// Cell content for a semantic column
    fn cell_data(&self, column: Self::Column) -> CellData;
}

/// Index path from a top-level collection down to one entity
pub type EntityPath = Vec<usize>;

/// Follow `path` through `rows`
pub fn entity_at<'a, E: Entity>(rows: &'a [E], path: &[usize]) -> Option<&'a E> {
    let (first, rest) = path.split_first()?;
    let mut entity = rows.get(*first)?;
    for &index in rest {
        entity = entity.children().get(index)?;
    }
    Some(entity)
}

/// Follow `path` through `rows`, mutably
pub fn entity_at_mut<'a, E: Entity>(rows: &'a mut [E], path: &[usize]) -> Option<&'a mut E> {
    let (first, rest) = path.split_first()?;
    let mut entity = rows.get_mut(*first)?;
    for &index in rest {
        entity = entity.children_mut().get_mut(index)?;
    }
    Some(entity)
}

/// Depth-first, pre-order visit of every entity in `rows`
pub fn walk<E: Entity>(rows: &[E], visit: &mut impl FnMut(&E, usize)) {
    fn walk_at<E: Entity>(rows: &[E], depth: usize, visit: &mut impl FnMut(&E, usize)) {
        for entity in rows {
            visit(entity, depth);
            if entity.is_container() {
                walk_at(entity.children(), depth + 1, visit);
            }
        }
    }
    walk_at(rows, 0, visit);
}

//! Per-row memoization of rendered cell panels
//!
//! Rebuilding toolkit panels on every paint pass is expensive, so each row
//! keeps the last panel it produced per column. A panel is reused only while
//! both the column width and the cell data are unchanged.

use std::rc::Rc;

use ordered_float::OrderedFloat;

use crate::cell::CellData;

/// Toolkit seam: turns cell data into whatever the widget lays out and paints
pub trait CellRenderer {
    type Panel;

    fn render(&mut self, data: &CellData, width: f32) -> Self::Panel;
}

#[derive(Debug)]
struct CacheEntry<P> {
    width: OrderedFloat<f32>,
    data: CellData,
    panel: Rc<P>,
}

/// Last rendered panel per column for one row
#[derive(Debug)]
pub struct CellCache<P> {
    entries: Vec<Option<CacheEntry<P>>>,
}

impl<P> CellCache<P> {
    pub fn new(columns: usize) -> Self {
        let mut entries = Vec::with_capacity(columns);
        entries.resize_with(columns, || None);
        Self { entries }
    }

    /// Return the cached panel for `column` if width and data still match,
    /// otherwise build a new one with `build` and remember it.
    pub fn panel(
        &mut self,
        column: usize,
        width: f32,
        data: CellData,
        build: impl FnOnce(&CellData, f32) -> P,
    ) -> Rc<P> {
        if column >= self.entries.len() {
            self.entries.resize_with(column + 1, || None);
        }
        let width = OrderedFloat(width);
        let slot = &mut self.entries[column];
        if let Some(entry) = slot {
            if entry.width == width && entry.data == data {
                return Rc::clone(&entry.panel);
            }
        }
        let panel = Rc::new(build(&data, width.0));
        *slot = Some(CacheEntry {
            width,
            data,
            panel: Rc::clone(&panel),
        });
        panel
    }

    /// Cached panel for `column` without checking freshness
    pub fn peek(&self, column: usize) -> Option<&Rc<P>> {
        self.entries.get(column)?.as_ref().map(|e| &e.panel)
    }

    /// Drop every cached panel (row content changed)
    pub fn invalidate(&mut self) {
        for entry in &mut self.entries {
            *entry = None;
        }
    }

    /// Number of columns currently holding a panel
    pub fn cached_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}

//! Table binding: the node arena, visible rows, selection and commands
//!
//! `Table` owns a provider (and through it the entity collection) plus the
//! arena of `Node`s wrapping those entities. Child rows are built lazily the
//! first time they are needed. Structural edits rebuild the arena through
//! `sync_to_model`; disclosure changes only rebuild the visible row list.

use std::collections::HashSet;
use std::rc::Rc;

use crate::cache::CellRenderer;
use crate::cell::CellData;
use crate::column::{ColumnHeader, ViewContext};
use crate::entity::{entity_at, entity_at_mut, Entity, EntityId, EntityPath};
use crate::error::TableError;
use crate::node::{Node, NodeId};
use crate::provider::{ItemVariant, TableProvider};
use crate::search::entity_matches;

/// A provider bound to its rows. `P` is the toolkit panel type cached per cell.
pub struct Table<Pr: TableProvider, P = ()> {
    provider: Pr,
    nodes: Vec<Node<P>>,
    roots: Vec<NodeId>,
    visible: Vec<NodeId>,
    selection: Vec<NodeId>,
    scroll_request: Option<NodeId>,
    generation: u32,
}

impl<Pr: TableProvider, P> Table<Pr, P> {
    pub fn new(provider: Pr) -> Self {
        let mut table = Self {
            provider,
            nodes: Vec::new(),
            roots: Vec::new(),
            visible: Vec::new(),
            selection: Vec::new(),
            scroll_request: None,
            generation: 0,
        };
        table.build_roots();
        table.sync_visible();
        table
    }

    // -------------------------------------------------------------------------
    // Provider passthrough
    // -------------------------------------------------------------------------

    pub fn provider(&self) -> &Pr {
        &self.provider
    }

    pub fn into_provider(self) -> Pr {
        self.provider
    }

    pub fn context(&self) -> ViewContext {
        self.provider.context()
    }

    pub fn headers(&self) -> Vec<ColumnHeader> {
        self.provider.headers()
    }

    pub fn column_count(&self) -> usize {
        self.provider.column_count()
    }

    pub fn hierarchy_column_index(&self) -> Option<usize> {
        self.provider.hierarchy_column_index()
    }

    // -------------------------------------------------------------------------
    // Arena
    // -------------------------------------------------------------------------

    fn build_roots(&mut self) {
        self.nodes.clear();
        let count = self.provider.rows().len();
        let mut roots = Vec::with_capacity(count);
        for index in 0..count {
            roots.push(self.push_node(None, vec![index]));
        }
        self.roots = roots;
    }

    fn push_node(&mut self, parent: Option<NodeId>, path: EntityPath) -> NodeId {
        let id = NodeId {
            index: self.nodes.len() as u32,
            generation: self.generation,
        };
        let columns = self.provider.column_count();
        self.nodes.push(Node::new(parent, path, columns));
        id
    }

    /// Row for `id`, or `None` if the id is stale
    pub fn node(&self, id: NodeId) -> Option<&Node<P>> {
        if id.generation != self.generation {
            return None;
        }
        self.nodes.get(id.slot())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<P>> {
        if id.generation != self.generation {
            return None;
        }
        self.nodes.get_mut(id.slot())
    }

    /// Number of rows built so far (top-level plus materialized children)
    pub fn materialized_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn entity(&self, id: NodeId) -> Option<&Pr::Entity> {
        let node = self.node(id)?;
        entity_at(self.provider.rows(), &node.path)
    }

    fn entity_mut(&mut self, id: NodeId) -> Option<&mut Pr::Entity> {
        if id.generation != self.generation {
            return None;
        }
        let node = self.nodes.get(id.slot())?;
        entity_at_mut(self.provider.rows_mut(), &node.path)
    }

    // -------------------------------------------------------------------------
    // Row contract
    // -------------------------------------------------------------------------

    /// Top-level rows
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_container(&self, id: NodeId) -> bool {
        self.entity(id).is_some_and(|e| e.is_container())
    }

    /// Child rows of `id`, built on first call for a container
    pub fn child_rows(&mut self, id: NodeId) -> &[NodeId] {
        self.materialize(id);
        self.node(id)
            .and_then(|n| n.children.as_deref())
            .unwrap_or(&[])
    }

    fn materialize(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else { return };
        if node.children.is_some() {
            return;
        }
        let path = node.path.clone();
        let count = match entity_at(self.provider.rows(), &path) {
            Some(entity) if entity.is_container() => entity.children().len(),
            _ => return,
        };
        let mut children = Vec::with_capacity(count);
        for index in 0..count {
            let mut child_path = path.clone();
            child_path.push(index);
            children.push(self.push_node(Some(id), child_path));
        }
        if let Some(node) = self.node_mut(id) {
            node.children = Some(children);
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Parent chain, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }
        chain
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.node(id).map(|n| n.depth()).unwrap_or(0)
    }

    /// Cell content for a view column; unmapped columns give an empty cell
    pub fn cell_data_for_column(&self, id: NodeId, column: usize) -> CellData {
        let Some(entity) = self.entity(id) else {
            return CellData::default();
        };
        match self.provider.mapper().get(column, self.provider.context()) {
            Some(semantic) => entity.cell_data(semantic),
            None => CellData::default(),
        }
    }

    /// Rendered panel for a cell, reused while width and data are unchanged
    pub fn cell_panel<R>(
        &mut self,
        id: NodeId,
        column: usize,
        width: f32,
        renderer: &mut R,
    ) -> Option<Rc<P>>
    where
        R: CellRenderer<Panel = P>,
    {
        let data = self.cell_data_for_column(id, column);
        let node = self.node_mut(id)?;
        Some(node.cache.panel(column, width, data, |d, w| renderer.render(d, w)))
    }

    /// True only for open containers
    pub fn is_open(&self, id: NodeId) -> bool {
        self.entity(id).is_some_and(|e| e.is_container() && e.is_open())
    }

    /// Set disclosure. No-op for non-containers; returns whether it changed.
    pub fn set_open(&mut self, id: NodeId, open: bool) -> bool {
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        if !entity.is_container() || entity.is_open() == open {
            return false;
        }
        entity.set_open(open);
        self.sync_visible();
        true
    }

    pub fn toggle_open(&mut self, id: NodeId) -> bool {
        let open = self.is_open(id);
        self.set_open(id, !open)
    }

    /// Open or close every container in the collection
    pub fn set_all_open(&mut self, open: bool) {
        fn apply<E: Entity>(rows: &mut [E], open: bool) {
            for entity in rows {
                if entity.is_container() {
                    entity.set_open(open);
                    apply(entity.children_mut(), open);
                }
            }
        }
        apply(self.provider.rows_mut(), open);
        self.sync_visible();
    }

    /// Whether any semantic column of the row contains `query_lower`
    pub fn matches(&self, id: NodeId, query_lower: &str) -> bool {
        self.entity(id).is_some_and(|e| entity_matches(e, query_lower))
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    /// Pre-order walk over every row, building children on the way.
    /// Disclosure state is ignored.
    pub fn collect_matching(&mut self, mut pred: impl FnMut(&Pr::Entity) -> bool) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.entity(id).is_some_and(|e| pred(e)) {
                found.push(id);
            }
            if self.is_container(id) {
                stack.extend(self.child_rows(id).iter().rev().copied());
            }
        }
        found
    }

    /// Row bound to the entity with this identity
    pub fn find_entity(&mut self, entity_id: EntityId) -> Option<NodeId> {
        self.collect_matching(|e| e.id() == entity_id).into_iter().next()
    }

    // -------------------------------------------------------------------------
    // Visible rows
    // -------------------------------------------------------------------------

    /// Rows currently shown, in display order
    pub fn visible_rows(&self) -> &[NodeId] {
        &self.visible
    }

    pub fn visible_index(&self, id: NodeId) -> Option<usize> {
        self.visible.iter().position(|&v| v == id)
    }

    /// Rebuild the visible row list from disclosure state
    pub fn sync_visible(&mut self) {
        let mut visible = Vec::new();
        let roots = self.roots.clone();
        for id in roots {
            self.collect_visible(id, &mut visible);
        }
        self.visible = visible;
    }

    fn collect_visible(&mut self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        if self.is_open(id) {
            let children = self.child_rows(id).to_vec();
            for child in children {
                self.collect_visible(child, out);
            }
        }
    }

    /// Rebuild every row from the provider after a structural change.
    ///
    /// All node ids are invalidated. Selection is carried over by entity
    /// identity for rows that are still visible.
    pub fn sync_to_model(&mut self) {
        let selected: HashSet<EntityId> = self
            .selection
            .iter()
            .filter_map(|&id| self.entity(id).map(|e| e.id()))
            .collect();

        self.generation = self.generation.wrapping_add(1);
        self.build_roots();
        self.selection.clear();
        self.scroll_request = None;
        self.sync_visible();

        if !selected.is_empty() {
            let visible = self.visible.clone();
            self.selection = visible
                .into_iter()
                .filter(|&id| self.entity(id).is_some_and(|e| selected.contains(&e.id())))
                .collect();
        }
        log::debug!(
            "table resynced: {} top-level rows, {} visible",
            self.roots.len(),
            self.visible.len()
        );
    }

    /// Swap in a freshly loaded collection
    pub fn replace_rows(&mut self, rows: Vec<Pr::Entity>) {
        *self.provider.rows_mut() = rows;
        self.sync_to_model();
    }

    // -------------------------------------------------------------------------
    // Selection and scrolling
    // -------------------------------------------------------------------------

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selection.contains(&id)
    }

    /// Select a row, replacing the selection unless `extend` is set
    pub fn select(&mut self, id: NodeId, extend: bool) -> Result<(), TableError> {
        if self.node(id).is_none() {
            return Err(TableError::StaleRow);
        }
        if !extend {
            self.selection.clear();
        }
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected_entities(&self) -> Vec<&Pr::Entity> {
        self.selection
            .iter()
            .filter_map(|&id| self.entity(id))
            .collect()
    }

    /// Ask the view to scroll `id` into view
    pub fn scroll_to(&mut self, id: NodeId) {
        self.scroll_request = Some(id);
    }

    /// Pending scroll target as a visible row index, consumed on read
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        let id = self.scroll_request.take()?;
        self.visible_index(id)
    }

    /// Open every ancestor of `id`, then make it the sole selection and
    /// scroll to it.
    pub fn reveal(&mut self, id: NodeId) -> Result<(), TableError> {
        if self.node(id).is_none() {
            return Err(TableError::StaleRow);
        }
        let mut disclosed = false;
        for ancestor in self.ancestors(id) {
            if let Some(entity) = self.entity_mut(ancestor) {
                if entity.is_container() && !entity.is_open() {
                    entity.set_open(true);
                    disclosed = true;
                }
            }
        }
        if disclosed {
            self.sync_visible();
        }
        self.selection.clear();
        self.selection.push(id);
        self.scroll_to(id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Variants the provider lets this table create
    pub fn item_variants(&self) -> &'static [ItemVariant] {
        self.provider.item_variants()
    }

    /// Create a new row at the end of `parent` (or top level) and select it
    pub fn create(&mut self, variant: ItemVariant, parent: Option<NodeId>) -> Result<NodeId, TableError> {
        let item = self.provider.create_item(variant)?;
        let entity_id = item.id();
        match parent {
            None => self.provider.rows_mut().push(item),
            Some(parent) => {
                let target = self.entity_mut(parent).ok_or(TableError::StaleRow)?;
                if !target.is_container() {
                    return Err(TableError::NotAContainer);
                }
                target.children_mut().push(item);
                target.set_open(true);
            }
        }
        self.sync_to_model();
        let id = self.find_entity(entity_id).ok_or(TableError::StaleRow)?;
        self.reveal(id)?;
        Ok(id)
    }

    /// Edit one entity in place. A change to its container flag or child
    /// count resyncs the whole table; otherwise only the row cache is dropped.
    pub fn edit<R>(&mut self, id: NodeId, f: impl FnOnce(&mut Pr::Entity) -> R) -> Result<R, TableError> {
        let entity = self.entity_mut(id).ok_or(TableError::StaleRow)?;
        let before = (entity.is_container(), entity.children().len());
        let result = f(entity);
        let after = (entity.is_container(), entity.children().len());
        if before != after {
            self.sync_to_model();
        } else if let Some(node) = self.node_mut(id) {
            node.cache.invalidate();
        }
        Ok(result)
    }

    /// Remove every selected row (and its children). Returns how many
    /// selected rows were removed.
    pub fn delete_selection(&mut self) -> usize {
        let mut paths: Vec<EntityPath> = self
            .selection
            .iter()
            .filter_map(|&id| self.node(id).map(|n| n.path.clone()))
            .collect();
        // A row under another selected row goes with its ancestor
        let all = paths.clone();
        paths.retain(|p| !all.iter().any(|q| q.len() < p.len() && p.starts_with(q)));
        // Later siblings first so earlier indices stay valid
        paths.sort_by(|a, b| b.cmp(a));

        let mut removed = 0;
        for path in &paths {
            let Some((&last, parent_path)) = path.split_last() else {
                continue;
            };
            let siblings = if parent_path.is_empty() {
                Some(self.provider.rows_mut())
            } else {
                entity_at_mut(self.provider.rows_mut(), parent_path).map(|e| e.children_mut())
            };
            if let Some(siblings) = siblings {
                if last < siblings.len() {
                    siblings.remove(last);
                    removed += 1;
                }
            }
        }
        if removed > 0 {
            self.sync_to_model();
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CellRenderer;
    use crate::column::ViewContext;
    use crate::harness::{scenario_rows, Item, ItemProvider};

    fn table(rows: Vec<Item>) -> Table<ItemProvider> {
        Table::new(ItemProvider::new(rows))
    }

    fn names(table: &Table<ItemProvider>, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .filter_map(|&id| table.entity(id).map(|e| e.name.clone()))
            .collect()
    }

    struct Counting {
        built: usize,
    }

    impl CellRenderer for Counting {
        type Panel = String;

        fn render(&mut self, data: &CellData, width: f32) -> String {
            self.built += 1;
            format!("{}|{width}", data.primary)
        }
    }

    #[test]
    fn test_children_are_lazy() {
        let mut t = table(scenario_rows());
        assert_eq!(t.materialized_count(), 1);
        let root = t.roots()[0];
        assert!(!t.node(root).unwrap().children_materialized());

        let children = t.child_rows(root).to_vec();
        assert_eq!(names(&t, &children), ["Sword", "B"]);
        assert_eq!(t.materialized_count(), 3);
        for &child in &children {
            assert_eq!(t.parent(child), Some(root));
        }

        // Second call reuses the same rows
        let again = t.child_rows(root).to_vec();
        assert_eq!(children, again);
        assert_eq!(t.materialized_count(), 3);
    }

    #[test]
    fn test_leaf_has_no_child_rows() {
        let mut t = table(vec![Item::leaf("Sword")]);
        let sword = t.roots()[0];
        assert!(t.child_rows(sword).is_empty());
        assert!(!t.node(sword).unwrap().children_materialized());
    }

    #[test]
    fn test_cell_data_goes_through_column_map() {
        let mut rows = vec![Item::leaf("Sword").with_detail("Broad")];
        rows[0].carried = true;
        rows[0].count = 3;
        let mut provider = ItemProvider::new(rows);

        let list: Table<ItemProvider> = Table::new(ItemProvider::new(provider.rows.clone()));
        let id = list.roots()[0];
        assert_eq!(list.cell_data_for_column(id, 0).primary, "Sword");
        assert_eq!(list.cell_data_for_column(id, 1).primary, "Broad");

        provider.context = ViewContext::Sheet;
        let sheet: Table<ItemProvider> = Table::new(provider);
        let id = sheet.roots()[0];
        assert!(sheet.cell_data_for_column(id, 0).checked);
        assert_eq!(sheet.cell_data_for_column(id, 1).primary, "3");
        assert_eq!(sheet.cell_data_for_column(id, 2).primary, "Sword");
    }

    #[test]
    fn test_unmapped_column_is_empty_cell() {
        let t = table(vec![Item::leaf("Sword")]);
        let id = t.roots()[0];
        assert!(t.cell_data_for_column(id, 9).is_empty());
    }

    #[test]
    fn test_set_open_updates_visible_rows() {
        let mut t = table(scenario_rows());
        let root = t.roots()[0];
        assert_eq!(t.visible_rows().len(), 1);

        assert!(t.set_open(root, true));
        assert_eq!(names(&t, t.visible_rows()), ["Root", "Sword", "B"]);

        // Already open: nothing to do
        assert!(!t.set_open(root, true));

        assert!(t.set_open(root, false));
        assert_eq!(t.visible_rows().len(), 1);
        // Persisted on the entity
        assert!(!t.provider().rows[0].open);
    }

    #[test]
    fn test_set_open_on_leaf_is_noop() {
        let mut t = table(vec![Item::leaf("Sword")]);
        let sword = t.roots()[0];
        assert!(!t.set_open(sword, true));
        assert!(!t.is_open(sword));
        assert!(!t.provider().rows[0].open);
    }

    #[test]
    fn test_initially_open_rows_are_visible() {
        let rows = vec![Item::container("Pack", vec![Item::leaf("Rope")]).opened()];
        let t = table(rows);
        assert_eq!(names(&t, t.visible_rows()), ["Pack", "Rope"]);
    }

    #[test]
    fn test_cell_panel_is_cached() {
        let mut t: Table<ItemProvider, String> = Table::new(ItemProvider::new(vec![Item::leaf("Sword")]));
        let id = t.roots()[0];
        let mut renderer = Counting { built: 0 };

        let first = t.cell_panel(id, 0, 100.0, &mut renderer).unwrap();
        let second = t.cell_panel(id, 0, 100.0, &mut renderer).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(renderer.built, 1);

        let wider = t.cell_panel(id, 0, 140.0, &mut renderer).unwrap();
        assert!(!Rc::ptr_eq(&first, &wider));
        assert_eq!(renderer.built, 2);

        t.edit(id, |e| e.name = "Saber".to_string()).unwrap();
        let renamed = t.cell_panel(id, 0, 140.0, &mut renderer).unwrap();
        assert_eq!(renamed.as_str(), "Saber|140");
        assert_eq!(renderer.built, 3);
    }

    #[test]
    fn test_stale_ids_rejected_after_resync() {
        let mut t = table(vec![Item::leaf("Sword")]);
        let old = t.roots()[0];
        t.sync_to_model();
        assert!(t.entity(old).is_none());
        assert_eq!(t.select(old, false), Err(TableError::StaleRow));
        assert!(t.cell_data_for_column(old, 0).is_empty());
    }

    #[test]
    fn test_resync_keeps_selection_by_identity() {
        let mut t = table(vec![Item::leaf("Sword"), Item::leaf("Shield")]);
        let shield = t.roots()[1];
        t.select(shield, false).unwrap();
        t.sync_to_model();
        assert_eq!(names(&t, t.selection()), ["Shield"]);
    }

    #[test]
    fn test_reveal_discloses_ancestors() {
        let mut t = table(scenario_rows());
        let shield = t.collect_matching(|e| e.name == "Shield")[0];
        assert_eq!(t.visible_index(shield), None);

        t.reveal(shield).unwrap();
        let ancestors = t.ancestors(shield);
        assert_eq!(names(&t, &ancestors), ["B", "Root"]);
        assert!(ancestors.iter().all(|&a| t.is_open(a)));
        assert_eq!(t.selection(), &[shield]);
        assert_eq!(t.take_scroll_request(), Some(3));
        assert_eq!(t.take_scroll_request(), None);
    }

    #[test]
    fn test_collect_matching_ignores_disclosure() {
        let mut t = table(scenario_rows());
        let all = t.collect_matching(|_| true);
        assert_eq!(names(&t, &all), ["Root", "Sword", "B", "Shield"]);
        // Nothing was opened along the way
        assert_eq!(t.visible_rows().len(), 1);
    }

    #[test]
    fn test_create_top_level_and_nested() {
        let mut t = table(scenario_rows());
        let top = t.create(ItemVariant::Item, None).unwrap();
        assert_eq!(t.entity(top).unwrap().name, "New Item");
        assert_eq!(t.roots().len(), 2);
        assert_eq!(t.selection(), &[top]);

        let b = t.collect_matching(|e| e.name == "B")[0];
        let nested = t.create(ItemVariant::Container, Some(b)).unwrap();
        assert!(t.is_container(nested));
        assert_eq!(names(&t, &t.ancestors(nested)), ["B", "Root"]);
        assert!(t.visible_index(nested).is_some());
    }

    #[test]
    fn test_create_rejects_bad_targets() {
        let mut t = table(scenario_rows());
        let sword = t.collect_matching(|e| e.name == "Sword")[0];
        assert_eq!(t.create(ItemVariant::Item, Some(sword)), Err(TableError::NotAContainer));
        assert_eq!(
            t.create(ItemVariant::Alternate, None),
            Err(TableError::UnsupportedVariant(ItemVariant::Alternate))
        );
    }

    #[test]
    fn test_edit_structural_change_resyncs() {
        let mut t = table(vec![Item::container("Pack", Vec::new())]);
        let pack = t.roots()[0];
        t.edit(pack, |e| e.children.push(Item::leaf("Rope"))).unwrap();
        // Old id no longer valid; new rows reflect the child
        assert!(t.entity(pack).is_none());
        let pack = t.roots()[0];
        assert_eq!(t.child_rows(pack).len(), 1);
    }

    #[test]
    fn test_delete_selection_removes_subtrees() {
        let mut t = table(scenario_rows());
        let b = t.collect_matching(|e| e.name == "B")[0];
        let shield = t.collect_matching(|e| e.name == "Shield")[0];
        t.select(b, false).unwrap();
        t.select(shield, true).unwrap();

        assert_eq!(t.delete_selection(), 1);
        let all = t.collect_matching(|_| true);
        assert_eq!(names(&t, &all), ["Root", "Sword"]);
        assert!(t.selection().is_empty());
    }

    #[test]
    fn test_delete_siblings_in_any_order() {
        let mut t = table(vec![Item::leaf("a"), Item::leaf("b"), Item::leaf("c")]);
        let ids = t.roots().to_vec();
        t.select(ids[0], false).unwrap();
        t.select(ids[2], true).unwrap();
        assert_eq!(t.delete_selection(), 2);
        assert_eq!(names(&t, t.roots()), ["b"]);
    }

    #[test]
    fn test_replace_rows() {
        let mut t = table(scenario_rows());
        t.replace_rows(vec![Item::leaf("Axe")]);
        assert_eq!(names(&t, t.visible_rows()), ["Axe"]);
    }

    #[test]
    fn test_set_all_open() {
        let mut t = table(scenario_rows());
        t.set_all_open(true);
        assert_eq!(names(&t, t.visible_rows()), ["Root", "Sword", "B", "Shield"]);
        t.set_all_open(false);
        assert_eq!(t.visible_rows().len(), 1);
    }
}

//! Minimal entity kind and provider for exercising the table machinery

use uuid::Uuid;

use crate::cell::{Alignment, CellData};
use crate::column::{ColumnHeader, ColumnMapper, ColumnSet, HeaderIcon, ViewContext};
use crate::entity::{Entity, EntityId};
use crate::provider::{ItemVariant, TableProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemColumn {
    Name,
    Detail,
    Count,
    Carried,
    Reference,
}

impl ColumnSet for ItemColumn {
    const ALL: &'static [Self] = &[
        ItemColumn::Name,
        ItemColumn::Detail,
        ItemColumn::Count,
        ItemColumn::Carried,
        ItemColumn::Reference,
    ];
    const DESCRIPTION: Self = ItemColumn::Name;

    fn header(self, _ctx: ViewContext) -> ColumnHeader {
        match self {
            ItemColumn::Name => ColumnHeader::new("Name", "Item name"),
            ItemColumn::Detail => ColumnHeader::new("Detail", "Item detail"),
            ItemColumn::Count => ColumnHeader::new("#", "Count").aligned(Alignment::End),
            ItemColumn::Carried => ColumnHeader::icon(HeaderIcon::Equipped, "Carried"),
            ItemColumn::Reference => ColumnHeader::icon(HeaderIcon::PageRef, "Page reference"),
        }
    }
}

pub static ITEM_COLUMNS: ColumnMapper<ItemColumn> = ColumnMapper::new(
    &[ItemColumn::Name, ItemColumn::Detail, ItemColumn::Reference],
    &[ItemColumn::Carried, ItemColumn::Count, ItemColumn::Name],
);

#[derive(Debug, Clone)]
pub struct Item {
    pub id: EntityId,
    pub name: String,
    pub detail: String,
    pub count: u32,
    pub carried: bool,
    pub reference: String,
    pub container: bool,
    pub open: bool,
    pub children: Vec<Item>,
}

impl Item {
    pub fn leaf(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            detail: String::new(),
            count: 1,
            carried: false,
            reference: String::new(),
            container: false,
            open: false,
            children: Vec::new(),
        }
    }

    pub fn container(name: &str, children: Vec<Item>) -> Self {
        Self {
            container: true,
            children,
            ..Self::leaf(name)
        }
    }

    pub fn with_detail(mut self, detail: &str) -> Self {
        self.detail = detail.to_string();
        self
    }

    pub fn opened(mut self) -> Self {
        self.open = true;
        self
    }
}

impl Entity for Item {
    type Column = ItemColumn;

    fn id(&self) -> EntityId {
        self.id
    }

    fn is_container(&self) -> bool {
        self.container
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    fn cell_data(&self, column: ItemColumn) -> CellData {
        match column {
            ItemColumn::Name => CellData::text(&self.name),
            ItemColumn::Detail => CellData::text(&self.detail),
            ItemColumn::Count => CellData::number(self.count.to_string()),
            ItemColumn::Carried => CellData::toggle(self.carried),
            ItemColumn::Reference => CellData::page_ref(&self.reference),
        }
    }
}

pub struct ItemProvider {
    pub rows: Vec<Item>,
    pub context: ViewContext,
}

impl ItemProvider {
    pub fn new(rows: Vec<Item>) -> Self {
        Self {
            rows,
            context: ViewContext::List,
        }
    }
}

impl TableProvider for ItemProvider {
    type Entity = Item;

    fn mapper(&self) -> &'static ColumnMapper<ItemColumn> {
        &ITEM_COLUMNS
    }

    fn context(&self) -> ViewContext {
        self.context
    }

    fn rows(&self) -> &[Item] {
        &self.rows
    }

    fn rows_mut(&mut self) -> &mut Vec<Item> {
        &mut self.rows
    }

    fn item_variants(&self) -> &'static [ItemVariant] {
        &[ItemVariant::Item, ItemVariant::Container]
    }

    fn new_item(&self, variant: ItemVariant) -> Option<Item> {
        match variant {
            ItemVariant::Item => Some(Item::leaf("New Item")),
            ItemVariant::Container => Some(Item::container("New Container", Vec::new())),
            ItemVariant::Alternate => None,
        }
    }
}

/// Scenario tree: Root → [A "Sword", B → [C "Shield"]]
pub fn scenario_rows() -> Vec<Item> {
    vec![Item::container(
        "Root",
        vec![Item::leaf("Sword"), Item::container("B", vec![Item::leaf("Shield")])],
    )]
}

//! Traits (advantages, disadvantages, perks, quirks)

use charsheet_core::{
    Alignment, CellData, ColumnHeader, ColumnMapper, ColumnSet, Entity, EntityId, HeaderIcon, ItemVariant,
    ViewContext,
};
use serde::{Deserialize, Serialize};

use crate::common::{format_tags, is_false, is_zero, new_id};
use crate::modifier::TraitModifier;
use crate::provider::{Kind, ListProvider};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    #[serde(default = "new_id")]
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub points: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<TraitModifier>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub container: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub open: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Trait>,
}

impl Trait {
    pub fn new(name: &str, points: i32) -> Self {
        Self {
            id: new_id(),
            name: name.to_string(),
            notes: String::new(),
            points,
            tags: Vec::new(),
            reference: String::new(),
            modifiers: Vec::new(),
            container: false,
            open: false,
            children: Vec::new(),
        }
    }

    pub fn container(name: &str, children: Vec<Trait>) -> Self {
        Self {
            container: true,
            children,
            ..Self::new(name, 0)
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_reference(mut self, reference: &str) -> Self {
        self.reference = reference.to_string();
        self
    }

    /// Own points for a leaf; the sum of the children for a container
    pub fn total_points(&self) -> i32 {
        if self.container {
            self.children.iter().map(Trait::total_points).sum()
        } else {
            self.points
        }
    }

    /// Notes followed by the enabled modifiers, `; ` separated
    pub fn secondary_text(&self) -> String {
        let mut parts = Vec::new();
        if !self.notes.is_empty() {
            parts.push(self.notes.clone());
        }
        let mut active = Vec::new();
        collect_enabled(&self.modifiers, &mut active);
        parts.extend(active);
        parts.join("; ")
    }
}

fn collect_enabled(modifiers: &[TraitModifier], out: &mut Vec<String>) {
    for m in modifiers.iter().filter(|m| m.enabled()) {
        if m.container {
            collect_enabled(&m.children, out);
        } else {
            out.push(m.summary());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitColumn {
    Name,
    Points,
    Tags,
    Reference,
}

impl ColumnSet for TraitColumn {
    const ALL: &'static [Self] = &[TraitColumn::Name, TraitColumn::Points, TraitColumn::Tags, TraitColumn::Reference];
    const DESCRIPTION: Self = TraitColumn::Name;

    fn header(self, ctx: ViewContext) -> ColumnHeader {
        match self {
            TraitColumn::Name => match ctx {
                ViewContext::List => ColumnHeader::new("Trait", "The name, level and notes of the trait"),
                ViewContext::Sheet => ColumnHeader::new("Traits", "The name, level and notes of the trait"),
            },
            TraitColumn::Points => ColumnHeader::new("Pts", "The point cost of the trait").aligned(Alignment::End),
            TraitColumn::Tags => ColumnHeader::new("Tags", "The set of tags this trait has"),
            TraitColumn::Reference => ColumnHeader::icon(HeaderIcon::PageRef, "A reference to the book and page"),
        }
    }
}

pub static TRAIT_COLUMNS: ColumnMapper<TraitColumn> = ColumnMapper::new(
    &[TraitColumn::Name, TraitColumn::Points, TraitColumn::Tags, TraitColumn::Reference],
    &[TraitColumn::Name, TraitColumn::Points, TraitColumn::Reference],
);

impl Entity for Trait {
    type Column = TraitColumn;

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

    fn cell_data(&self, column: TraitColumn) -> CellData {
        match column {
            TraitColumn::Name => CellData::text(&self.name).with_secondary(self.secondary_text()),
            TraitColumn::Points => CellData::number(self.total_points().to_string()),
            TraitColumn::Tags => CellData::text(format_tags(&self.tags)),
            TraitColumn::Reference => CellData::page_ref(&self.reference),
        }
    }
}

impl Kind for Trait {
    fn mapper() -> &'static ColumnMapper<TraitColumn> {
        &TRAIT_COLUMNS
    }

    fn variant_label(variant: ItemVariant) -> &'static str {
        match variant {
            ItemVariant::Container => "New Trait Container",
            _ => "New Trait",
        }
    }

    fn new_item(variant: ItemVariant) -> Option<Self> {
        match variant {
            ItemVariant::Item => Some(Trait::new("Trait", 0)),
            ItemVariant::Container => Some(Trait::container("Trait Container", Vec::new())),
            ItemVariant::Alternate => None,
        }
    }
}

pub type TraitProvider = ListProvider<Trait>;

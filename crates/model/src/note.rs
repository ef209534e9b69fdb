//! Free-form notes

use charsheet_core::{CellData, ColumnHeader, ColumnMapper, ColumnSet, Entity, EntityId, HeaderIcon, ItemVariant, ViewContext};
use serde::{Deserialize, Serialize};

use crate::common::{is_false, new_id};
use crate::provider::{Kind, ListProvider};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default = "new_id")]
    pub id: EntityId,
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub container: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub open: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Note>,
}

impl Note {
    pub fn new(text: &str) -> Self {
        Self {
            id: new_id(),
            text: text.to_string(),
            reference: String::new(),
            container: false,
            open: false,
            children: Vec::new(),
        }
    }

    pub fn container(text: &str, children: Vec<Note>) -> Self {
        Self {
            container: true,
            children,
            ..Self::new(text)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteColumn {
    Text,
    Reference,
}

impl ColumnSet for NoteColumn {
    const ALL: &'static [Self] = &[NoteColumn::Text, NoteColumn::Reference];
    const DESCRIPTION: Self = NoteColumn::Text;

    fn header(self, _ctx: ViewContext) -> ColumnHeader {
        match self {
            NoteColumn::Text => ColumnHeader::new("Notes", "The text of the note"),
            NoteColumn::Reference => ColumnHeader::icon(HeaderIcon::PageRef, "A reference to the book and page"),
        }
    }
}

const NOTE_VIEW: &[NoteColumn] = &[NoteColumn::Text, NoteColumn::Reference];

pub static NOTE_COLUMNS: ColumnMapper<NoteColumn> = ColumnMapper::new(NOTE_VIEW, NOTE_VIEW);

impl Entity for Note {
    type Column = NoteColumn;

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

    fn cell_data(&self, column: NoteColumn) -> CellData {
        match column {
            NoteColumn::Text => CellData::text(&self.text),
            NoteColumn::Reference => CellData::page_ref(&self.reference),
        }
    }
}

impl Kind for Note {
    fn mapper() -> &'static ColumnMapper<NoteColumn> {
        &NOTE_COLUMNS
    }

    fn variant_label(variant: ItemVariant) -> &'static str {
        match variant {
            ItemVariant::Container => "New Note Container",
            _ => "New Note",
        }
    }

    fn new_item(variant: ItemVariant) -> Option<Self> {
        match variant {
            ItemVariant::Item => Some(Note::new("")),
            ItemVariant::Container => Some(Note::container("Note Container", Vec::new())),
            ItemVariant::Alternate => None,
        }
    }
}

pub type NoteProvider = ListProvider<Note>;

//! Skills and techniques

use std::fmt;

use charsheet_core::{
    Alignment, CellData, ColumnHeader, ColumnMapper, ColumnSet, Entity, EntityId, HeaderIcon, ItemVariant,
    ViewContext,
};
use serde::{Deserialize, Serialize};

use crate::common::{format_signed, format_tags, is_false, is_zero, new_id};
use crate::provider::{Kind, ListProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DifficultyLevel {
    #[serde(rename = "e")]
    Easy,
    #[default]
    #[serde(rename = "a")]
    Average,
    #[serde(rename = "h")]
    Hard,
    #[serde(rename = "vh")]
    VeryHard,
    #[serde(rename = "w")]
    Wildcard,
}

impl DifficultyLevel {
    pub fn abbreviation(self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "E",
            DifficultyLevel::Average => "A",
            DifficultyLevel::Hard => "H",
            DifficultyLevel::VeryHard => "VH",
            DifficultyLevel::Wildcard => "W",
        }
    }
}

/// Controlling attribute and difficulty: `DX/A`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub attribute: String,
    pub level: DifficultyLevel,
}

impl Difficulty {
    pub fn new(attribute: &str, level: DifficultyLevel) -> Self {
        Self {
            attribute: attribute.to_string(),
            level,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new("DX", DifficultyLevel::Average)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attribute.is_empty() {
            f.write_str(self.level.abbreviation())
        } else {
            write!(f, "{}/{}", self.attribute, self.level.abbreviation())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    #[default]
    Skill,
    /// Defaults from a parent skill; `default_skill` names it
    Technique,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default = "new_id")]
    pub id: EntityId,
    #[serde(default)]
    pub kind: SkillKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub specialization: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tech_level: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_skill: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub points: i32,
    /// Effective level, computed by the rules layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    /// Level relative to the controlling attribute (or parent skill)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_level: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub container: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub open: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Skill>,
}

impl Skill {
    pub fn new(name: &str, difficulty: Difficulty) -> Self {
        Self {
            id: new_id(),
            kind: SkillKind::Skill,
            name: name.to_string(),
            specialization: String::new(),
            tech_level: String::new(),
            notes: String::new(),
            difficulty,
            default_skill: String::new(),
            points: 0,
            level: None,
            relative_level: None,
            tags: Vec::new(),
            reference: String::new(),
            container: false,
            open: false,
            children: Vec::new(),
        }
    }

    pub fn technique(name: &str, default_skill: &str, level: DifficultyLevel) -> Self {
        Self {
            kind: SkillKind::Technique,
            default_skill: default_skill.to_string(),
            ..Self::new(name, Difficulty::new("", level))
        }
    }

    pub fn container(name: &str, children: Vec<Skill>) -> Self {
        Self {
            container: true,
            children,
            ..Self::new(name, Difficulty::default())
        }
    }

    pub fn is_technique(&self) -> bool {
        self.kind == SkillKind::Technique
    }

    /// `Guns (Pistol)/TL8`
    pub fn full_name(&self) -> String {
        let mut name = self.name.clone();
        if !self.specialization.is_empty() {
            name.push_str(&format!(" ({})", self.specialization));
        }
        if !self.tech_level.is_empty() {
            name.push_str(&format!("/TL{}", self.tech_level));
        }
        name
    }

    pub fn total_points(&self) -> i32 {
        if self.container {
            self.children.iter().map(Skill::total_points).sum()
        } else {
            self.points
        }
    }

    /// `DX+1` for skills, `Karate-2` style for techniques, `-` when unknown
    pub fn relative_level_text(&self) -> String {
        match (self.container, self.relative_level) {
            (true, _) | (_, None) => String::new(),
            (false, Some(rsl)) => {
                if self.is_technique() {
                    format!("{}{}", self.default_skill, format_signed(rsl))
                } else {
                    format!("{}{}", self.difficulty.attribute, format_signed(rsl))
                }
            }
        }
    }

    fn level_text(&self) -> String {
        match (self.container, self.level) {
            (true, _) => String::new(),
            (false, Some(level)) => level.to_string(),
            (false, None) => "-".to_string(),
        }
    }

    fn difficulty_text(&self) -> String {
        if self.container {
            String::new()
        } else if self.is_technique() {
            self.difficulty.level.abbreviation().to_string()
        } else {
            self.difficulty.to_string()
        }
    }

    fn secondary_text(&self) -> String {
        match (self.is_technique(), self.notes.is_empty()) {
            (true, true) => format!("Technique of {}", self.default_skill),
            (true, false) => format!("Technique of {}; {}", self.default_skill, self.notes),
            (false, _) => self.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillColumn {
    Name,
    Difficulty,
    Level,
    RelativeLevel,
    Points,
    Tags,
    Reference,
}

impl ColumnSet for SkillColumn {
    const ALL: &'static [Self] = &[
        SkillColumn::Name,
        SkillColumn::Difficulty,
        SkillColumn::Level,
        SkillColumn::RelativeLevel,
        SkillColumn::Points,
        SkillColumn::Tags,
        SkillColumn::Reference,
    ];
    const DESCRIPTION: Self = SkillColumn::Name;

    fn header(self, ctx: ViewContext) -> ColumnHeader {
        match self {
            SkillColumn::Name => match ctx {
                ViewContext::List => ColumnHeader::new("Skill / Technique", "The name, specialty, tech level and notes of the skill or technique"),
                ViewContext::Sheet => ColumnHeader::new("Skills", "The name, specialty, tech level and notes of the skill or technique"),
            },
            SkillColumn::Difficulty => ColumnHeader::new("Diff", "The difficulty of learning the skill or technique"),
            SkillColumn::Level => ColumnHeader::new("SL", "The skill level").aligned(Alignment::End),
            SkillColumn::RelativeLevel => ColumnHeader::new("RSL", "The relative skill level"),
            SkillColumn::Points => ColumnHeader::new("Pts", "The points spent in the skill or technique").aligned(Alignment::End),
            SkillColumn::Tags => ColumnHeader::new("Tags", "The set of tags this skill has"),
            SkillColumn::Reference => ColumnHeader::icon(HeaderIcon::PageRef, "A reference to the book and page"),
        }
    }
}

pub static SKILL_COLUMNS: ColumnMapper<SkillColumn> = ColumnMapper::new(
    &[SkillColumn::Name, SkillColumn::Difficulty, SkillColumn::Tags, SkillColumn::Reference],
    &[
        SkillColumn::Name,
        SkillColumn::Level,
        SkillColumn::RelativeLevel,
        SkillColumn::Points,
        SkillColumn::Reference,
    ],
);

impl Entity for Skill {
    type Column = SkillColumn;

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

    fn cell_data(&self, column: SkillColumn) -> CellData {
        match column {
            SkillColumn::Name => CellData::text(self.full_name()).with_secondary(self.secondary_text()),
            SkillColumn::Difficulty => CellData::text(self.difficulty_text()),
            SkillColumn::Level => CellData::number(self.level_text()),
            SkillColumn::RelativeLevel => CellData::text(self.relative_level_text()),
            SkillColumn::Points => CellData::number(self.total_points().to_string()),
            SkillColumn::Tags => CellData::text(format_tags(&self.tags)),
            SkillColumn::Reference => CellData::page_ref(&self.reference),
        }
    }
}

impl Kind for Skill {
    fn mapper() -> &'static ColumnMapper<SkillColumn> {
        &SKILL_COLUMNS
    }

    fn variants() -> &'static [ItemVariant] {
        &[ItemVariant::Item, ItemVariant::Container, ItemVariant::Alternate]
    }

    fn variant_label(variant: ItemVariant) -> &'static str {
        match variant {
            ItemVariant::Item => "New Skill",
            ItemVariant::Container => "New Skill Container",
            ItemVariant::Alternate => "New Technique",
        }
    }

    fn new_item(variant: ItemVariant) -> Option<Self> {
        Some(match variant {
            ItemVariant::Item => Skill::new("Skill", Difficulty::default()),
            ItemVariant::Container => Skill::container("Skill Container", Vec::new()),
            ItemVariant::Alternate => Skill::technique("Technique", "Skill", DifficultyLevel::Average),
        })
    }
}

pub type SkillProvider = ListProvider<Skill>;

#[cfg(test)]
mod tests {
    use super::*;
    use charsheet_core::TableProvider;

    #[test]
    fn test_full_name() {
        let mut skill = Skill::new("Guns", Difficulty::new("DX", DifficultyLevel::Easy));
        skill.specialization = "Pistol".to_string();
        skill.tech_level = "8".to_string();
        assert_eq!(skill.full_name(), "Guns (Pistol)/TL8");
    }

    #[test]
    fn test_sheet_columns() {
        let mut skill = Skill::new("Broadsword", Difficulty::new("DX", DifficultyLevel::Average));
        skill.points = 4;
        skill.level = Some(13);
        skill.relative_level = Some(1);

        let cells: Vec<_> = SKILL_COLUMNS
            .columns(ViewContext::Sheet)
            .iter()
            .map(|&c| skill.cell_data(c).primary)
            .collect();
        assert_eq!(cells, ["Broadsword", "13", "DX+1", "4", ""]);
    }

    #[test]
    fn test_unknown_level_shows_dash() {
        let skill = Skill::new("Stealth", Difficulty::default());
        assert_eq!(skill.cell_data(SkillColumn::Level).primary, "-");
        assert_eq!(skill.cell_data(SkillColumn::RelativeLevel).primary, "");
    }

    #[test]
    fn test_technique_is_alternate_variant() {
        let provider = SkillProvider::list(Vec::new());
        assert_eq!(provider.variant_label(ItemVariant::Alternate), "New Technique");
        let technique = provider.create_item(ItemVariant::Alternate).unwrap();
        assert!(technique.is_technique());
        assert_eq!(technique.cell_data(SkillColumn::Difficulty).primary, "A");
        assert_eq!(technique.cell_data(SkillColumn::Name).secondary, "Technique of Skill");
    }

    #[test]
    fn test_technique_relative_to_parent_skill() {
        let mut t = Skill::technique("Arm Lock", "Judo", DifficultyLevel::Average);
        t.relative_level = Some(0);
        assert_eq!(t.relative_level_text(), "Judo+0");
    }

    #[test]
    fn test_difficulty_serde() {
        let d = Difficulty::new("IQ", DifficultyLevel::VeryHard);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"{"attribute":"IQ","level":"vh"}"#);
        assert_eq!(d.to_string(), "IQ/VH");
    }
}

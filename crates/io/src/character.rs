// Character files: every list of one character in a single document

use std::path::Path;

use serde::{Deserialize, Serialize};

use charsheet_model::{Equipment, ListKind, Note, Skill, Spell, Trait};

use crate::error::DocumentError;
use crate::list::{check_header, parse_err, read_text};
use crate::FORMAT_VERSION;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traits: Vec<Trait>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<Skill>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spells: Vec<Spell>,
    /// Carried equipment
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment: Vec<Equipment>,
    /// Stored elsewhere; not counted toward carried weight
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_equipment: Vec<Equipment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
}

impl Character {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// `(value, weight)` of carried equipment
    pub fn carried_totals(&self) -> (f64, f64) {
        charsheet_model::equipment::totals(&self.equipment)
    }
}

#[derive(Serialize)]
struct CharacterFileOut<'a> {
    version: u32,
    #[serde(rename = "type")]
    kind: ListKind,
    #[serde(flatten)]
    character: &'a Character,
}

pub fn load_character(path: &Path) -> Result<Character, DocumentError> {
    let text = read_text(path)?;
    let found = check_header(path, &text)?;
    if found != ListKind::Character {
        return Err(DocumentError::WrongKind {
            path: path.to_path_buf(),
            expected: ListKind::Character,
            found,
        });
    }
    // Header fields are ignored by `Character`
    let character: Character = serde_json::from_str(&text).map_err(|e| parse_err(path, e))?;
    log::debug!("loaded character {:?} from {}", character.name, path.display());
    Ok(character)
}

pub fn save_character(path: &Path, character: &Character) -> Result<(), DocumentError> {
    let file = CharacterFileOut {
        version: FORMAT_VERSION,
        kind: ListKind::Character,
        character,
    };
    crate::write_atomic(path, &file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::save_list;
    use tempfile::tempdir;

    fn sample() -> Character {
        let mut character = Character::new("Sir Reginald");
        character.traits.push(Trait::new("Combat Reflexes", 15));
        character.equipment.push(Equipment::new("Broadsword", 500.0, 3.0));
        character
            .equipment
            .push(Equipment::new("Rations", 2.0, 0.5).with_quantity(4));
        character.other_equipment.push(Equipment::new("Tent", 100.0, 20.0));
        character.notes.push(Note::new("Owes the guild 40 gold"));
        character
    }

    #[test]
    fn test_character_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reginald.gcs");
        let character = sample();

        save_character(&path, &character).unwrap();
        assert_eq!(load_character(&path).unwrap(), character);
    }

    #[test]
    fn test_empty_lists_left_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.gcs");
        save_character(&path, &Character::new("Blank")).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(value["type"], "character");
        assert_eq!(value["name"], "Blank");
    }

    #[test]
    fn test_list_file_is_not_a_character() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.not");
        save_list(&path, &[Note::new("x")]).unwrap();
        assert!(matches!(
            load_character(&path),
            Err(DocumentError::WrongKind {
                found: ListKind::Notes,
                ..
            })
        ));
    }

    #[test]
    fn test_carried_totals_skip_other_equipment() {
        let (value, weight) = sample().carried_totals();
        assert_eq!(value, 508.0);
        assert_eq!(weight, 5.0);
    }
}

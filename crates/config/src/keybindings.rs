//! Key bindings
//!
//! `keys.json` maps an action id to a key chord, or `null` when the user
//! removed the binding:
//! ```json
//! {
//!   "file.save_as": "Ctrl+Alt+S",
//!   "find.next": null
//! }
//! ```
//! Only bindings that differ from the built-in defaults are written.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;
use crate::overridable::{KeyPolicy, OverridableSet};

pub const FILE_NAME: &str = "keys.json";

/// Modifier bits, in display order
const CTRL: u8 = 1;
const ALT: u8 = 1 << 1;
const SHIFT: u8 = 1 << 2;
const CMD: u8 = 1 << 3;

/// A key plus modifiers, e.g. `Ctrl+Shift+S`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyChord {
    modifiers: u8,
    key: String,
}

impl KeyChord {
    pub fn ctrl(&self) -> bool {
        self.modifiers & CTRL != 0
    }

    pub fn alt(&self) -> bool {
        self.modifiers & ALT != 0
    }

    pub fn shift(&self) -> bool {
        self.modifiers & SHIFT != 0
    }

    pub fn cmd(&self) -> bool {
        self.modifiers & CMD != 0
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

fn modifier_bit(name: &str) -> Option<u8> {
    match name {
        "ctrl" | "control" => Some(CTRL),
        "alt" | "option" | "opt" => Some(ALT),
        "shift" => Some(SHIFT),
        "cmd" | "command" | "super" | "meta" => Some(CMD),
        _ => None,
    }
}

/// Single characters are upper-cased, named keys title-cased (`f2` -> `F2`,
/// `delete` -> `Delete`). A first character whose upper case is more than
/// one character (`ß`) is kept as is so the name parses back unchanged.
fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut upper = first.to_uppercase();
    let mut out = String::with_capacity(key.len());
    match (upper.next(), upper.next()) {
        (Some(single), None) => out.push(single),
        _ => out.push(first),
    }
    out.extend(chars.flat_map(char::to_lowercase));
    out
}

impl FromStr for KeyChord {
    type Err = ConfigError;

    /// Accepts `+` or `-` between parts (`ctrl+shift+d`, `cmd-;`). A
    /// separator right after another one is the key itself (`Ctrl++`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: s.to_string(),
            message: message.to_string(),
        };

        let mut parts: Vec<String> = Vec::new();
        let mut token = String::new();
        for c in s.trim().chars() {
            if c == '+' || c == '-' {
                if token.is_empty() {
                    parts.push(c.to_string());
                } else {
                    parts.push(std::mem::take(&mut token));
                }
            } else {
                token.push(c);
            }
        }
        if !token.is_empty() {
            parts.push(token);
        }

        let key = parts.pop().ok_or_else(|| invalid("empty key chord"))?;
        let key = key.trim();
        if key.is_empty() || modifier_bit(&key.to_lowercase()).is_some() {
            return Err(invalid("missing key"));
        }

        let mut modifiers = 0;
        for part in &parts {
            let bit = modifier_bit(&part.trim().to_lowercase()).ok_or_else(|| invalid("unknown modifier"))?;
            modifiers |= bit;
        }

        Ok(KeyChord {
            modifiers,
            key: normalize_key(key),
        })
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (bit, name) in [(CTRL, "Ctrl"), (ALT, "Alt"), (SHIFT, "Shift"), (CMD, "Cmd")] {
            if self.modifiers & bit != 0 {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key)
    }
}

impl Serialize for KeyChord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyChord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A bindable command
#[derive(Debug, Clone, Copy)]
pub struct Action {
    pub id: &'static str,
    pub title: &'static str,
    pub default: Option<&'static str>,
}

const fn action(id: &'static str, title: &'static str, default: Option<&'static str>) -> Action {
    Action { id, title, default }
}

pub const ACTIONS: &[Action] = &[
    action("file.new_character", "New Character Sheet", Some("Ctrl+N")),
    action("file.open", "Open…", Some("Ctrl+O")),
    action("file.save", "Save", Some("Ctrl+S")),
    action("file.save_as", "Save As…", Some("Ctrl+Shift+S")),
    action("file.close", "Close", Some("Ctrl+W")),
    action("file.print", "Print…", Some("Ctrl+P")),
    action("edit.copy", "Copy", Some("Ctrl+C")),
    action("edit.duplicate", "Duplicate", Some("Ctrl+U")),
    action("edit.delete", "Delete", Some("Delete")),
    action("edit.select_all", "Select All", Some("Ctrl+A")),
    action("edit.open_detail", "Open Detail Editor", Some("Ctrl+I")),
    action("item.new", "New Item", Some("Ctrl+Alt+N")),
    action("item.new_container", "New Container", Some("Ctrl+Alt+Shift+N")),
    action("item.new_alternate", "New Alternate Item", None),
    action("view.open_all", "Open All Rows", Some("Ctrl+]")),
    action("view.close_all", "Close All Rows", Some("Ctrl+[")),
    action("find.focus", "Find", Some("Ctrl+F")),
    action("find.next", "Find Next", Some("Ctrl+G")),
    action("find.previous", "Find Previous", Some("Ctrl+Shift+G")),
    action("library.open", "Open Library", Some("Ctrl+L")),
    action("settings.open", "Settings…", Some("Ctrl+,")),
    action("app.quit", "Quit", Some("Ctrl+Q")),
];

pub fn find_action(id: &str) -> Option<&'static Action> {
    ACTIONS.iter().find(|a| a.id == id)
}

static FACTORY: Lazy<Arc<BTreeMap<String, Option<KeyChord>>>> = Lazy::new(|| {
    let map = ACTIONS
        .iter()
        .map(|a| {
            // Built-in chords are literals checked by test_factory_chords_parse
            let chord = a.default.and_then(|s| s.parse().ok());
            (a.id.to_string(), chord)
        })
        .collect();
    Arc::new(map)
});

/// Action id -> chord (`None` = unbound)
pub type KeyBindings = OverridableSet<Option<KeyChord>>;

/// Built-in bindings, shared by every set
pub fn factory() -> Arc<BTreeMap<String, Option<KeyChord>>> {
    Arc::clone(&FACTORY)
}

pub fn default_bindings() -> KeyBindings {
    OverridableSet::shared(factory(), KeyPolicy::Closed)
}

/// Chords bound to more than one action, with the actions sharing each
pub fn conflicts(bindings: &KeyBindings) -> Vec<(KeyChord, Vec<String>)> {
    let mut by_chord: BTreeMap<&KeyChord, Vec<String>> = BTreeMap::new();
    for (id, chord) in bindings.iter() {
        if let Some(chord) = chord {
            by_chord.entry(chord).or_default().push(id.clone());
        }
    }
    by_chord
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(chord, ids)| (chord.clone(), ids))
        .collect()
}

/// Action bound to `chord`, if any
pub fn action_for<'a>(bindings: &'a KeyBindings, chord: &KeyChord) -> Option<&'a str> {
    bindings
        .iter()
        .find(|(_, bound)| bound.as_ref() == Some(chord))
        .map(|(id, _)| id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(s: &str) -> KeyChord {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_canonical_order() {
        let c = chord("shift+ctrl+s");
        assert!(c.ctrl() && c.shift());
        assert!(!c.alt() && !c.cmd());
        assert_eq!(c.to_string(), "Ctrl+Shift+S");
    }

    #[test]
    fn test_parse_dash_separator_and_aliases() {
        assert_eq!(chord("cmd-;").to_string(), "Cmd+;");
        assert_eq!(chord("Control-Option-f2").to_string(), "Ctrl+Alt+F2");
        assert_eq!(chord("delete").to_string(), "Delete");
    }

    #[test]
    fn test_separator_as_key() {
        assert_eq!(chord("Ctrl++").key(), "+");
        assert_eq!(chord("Ctrl+-").key(), "-");
        assert_eq!(chord("-").key(), "-");
    }

    #[test]
    fn test_non_ascii_keys_survive_display() {
        for key in ["ß", "ctrl+ß", "é", "alt+Ω"] {
            let first = chord(key);
            let again = chord(&first.to_string());
            assert_eq!(first, again, "{key}");
        }
        assert_eq!(chord("ctrl+ß").to_string(), "Ctrl+ß");
        assert_eq!(chord("é").key(), "É");
    }

    #[test]
    fn test_parse_rejects_bad_chords() {
        assert!("".parse::<KeyChord>().is_err());
        assert!("Ctrl+".parse::<KeyChord>().is_err());
        assert!("Hyper+K".parse::<KeyChord>().is_err());
        assert!("Ctrl+Shift".parse::<KeyChord>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&chord("ctrl+g")).unwrap();
        assert_eq!(json, "\"Ctrl+G\"");
        let back: KeyChord = serde_json::from_str("\"ctrl-g\"").unwrap();
        assert_eq!(back, chord("Ctrl+G"));
        assert!(serde_json::from_str::<KeyChord>("\"Bogus+G\"").is_err());
    }

    #[test]
    fn test_factory_chords_parse() {
        for action in ACTIONS {
            if let Some(default) = action.default {
                assert!(default.parse::<KeyChord>().is_ok(), "{}", action.id);
            }
        }
        let f = factory();
        assert_eq!(f.len(), ACTIONS.len());
        assert_eq!(f["file.save"], Some(chord("Ctrl+S")));
        assert_eq!(f["item.new_alternate"], None);
    }

    #[test]
    fn test_factory_has_no_conflicts() {
        assert!(conflicts(&default_bindings()).is_empty());
    }

    #[test]
    fn test_conflicts_reported() {
        let mut keys = default_bindings();
        keys.set("file.print", Some(chord("Ctrl+S"))).unwrap();
        let found = conflicts(&keys);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, chord("Ctrl+S"));
        assert_eq!(found[0].1, ["file.print", "file.save"]);
    }

    #[test]
    fn test_unbinding_persists_as_null() {
        let mut keys = default_bindings();
        keys.set("find.next", None).unwrap();
        let json = keys.to_json().unwrap();
        assert!(json.contains("\"find.next\": null"));
        assert_eq!(action_for(&keys, &chord("Ctrl+G")), None);
        assert_eq!(action_for(&keys, &chord("Ctrl+O")), Some("file.open"));
    }

    #[test]
    fn test_find_action() {
        assert_eq!(find_action("app.quit").map(|a| a.title), Some("Quit"));
        assert!(find_action("app.explode").is_none());
    }
}

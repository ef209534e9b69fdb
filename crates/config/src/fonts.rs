//! Fonts
//!
//! `fonts.json` holds a full descriptor per changed font id:
//! ```json
//! { "page_field_primary": { "family": "Roboto", "size": 8.0, "weight": "bold", "spacing": "standard", "slant": "none" } }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::overridable::{KeyPolicy, OverridableSet};

pub const FILE_NAME: &str = "fonts.json";

pub const DEFAULT_FAMILY: &str = "Roboto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Thin,
    Light,
    #[default]
    Regular,
    Medium,
    Bold,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSpacing {
    Condensed,
    #[default]
    Standard,
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    #[default]
    None,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub family: String,
    pub size: f32,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub spacing: FontSpacing,
    #[serde(default)]
    pub slant: FontSlant,
}

impl FontDescriptor {
    pub fn new(size: f32) -> Self {
        Self {
            family: DEFAULT_FAMILY.to_string(),
            size,
            weight: FontWeight::default(),
            spacing: FontSpacing::default(),
            slant: FontSlant::default(),
        }
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn slant(mut self, slant: FontSlant) -> Self {
        self.slant = slant;
        self
    }
}

/// `Roboto 8 bold`
impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.size)?;
        if self.weight != FontWeight::Regular {
            write!(f, " {:?}", self.weight)?;
        }
        if self.spacing != FontSpacing::Standard {
            write!(f, " {:?}", self.spacing)?;
        }
        if self.slant == FontSlant::Italic {
            f.write_str(" Italic")?;
        }
        Ok(())
    }
}

/// Built-in fonts: (id, title, descriptor)
fn builtin() -> Vec<(&'static str, &'static str, FontDescriptor)> {
    use FontWeight::*;
    vec![
        ("label", "Label", FontDescriptor::new(10.0)),
        ("field", "Field", FontDescriptor::new(10.0)),
        ("field_secondary", "Field Secondary", FontDescriptor::new(8.0)),
        ("header", "Header", FontDescriptor::new(10.0).weight(Bold)),
        ("page_label_primary", "Page Primary Labels", FontDescriptor::new(7.0)),
        ("page_label_secondary", "Page Secondary Labels", FontDescriptor::new(6.0)),
        ("page_field_primary", "Page Primary Fields", FontDescriptor::new(7.0).weight(Medium)),
        ("page_field_secondary", "Page Secondary Fields", FontDescriptor::new(6.0)),
        ("page_footer_primary", "Page Primary Footer", FontDescriptor::new(6.0).weight(Medium)),
        ("page_footer_secondary", "Page Secondary Footer", FontDescriptor::new(5.0)),
        ("monospaced", "Monospaced", FontDescriptor { family: "Roboto Mono".to_string(), ..FontDescriptor::new(10.0) }),
        ("notes", "Notes", FontDescriptor::new(9.0).slant(FontSlant::Italic)),
    ]
}

static FACTORY: Lazy<Arc<BTreeMap<String, FontDescriptor>>> = Lazy::new(|| {
    Arc::new(
        builtin()
            .into_iter()
            .map(|(id, _, font)| (id.to_string(), font))
            .collect(),
    )
});

pub type Fonts = OverridableSet<FontDescriptor>;

pub fn factory() -> Arc<BTreeMap<String, FontDescriptor>> {
    Arc::clone(&FACTORY)
}

pub fn default_fonts() -> Fonts {
    OverridableSet::shared(factory(), KeyPolicy::Closed)
}

pub fn font_title(id: &str) -> Option<&'static str> {
    builtin().into_iter().find(|f| f.0 == id).map(|f| f.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_serialize_lowercase() {
        let font = FontDescriptor::new(8.0).weight(FontWeight::Bold);
        let json = serde_json::to_value(&font).unwrap();
        assert_eq!(json["weight"], "bold");
        assert_eq!(json["spacing"], "standard");
        assert_eq!(json["slant"], "none");
        assert_eq!(json["family"], "Roboto");
    }

    #[test]
    fn test_missing_style_fields_default() {
        let font: FontDescriptor = serde_json::from_str(r#"{"family": "Arial", "size": 12}"#).unwrap();
        assert_eq!(font.weight, FontWeight::Regular);
        assert_eq!(font.slant, FontSlant::None);
        assert_eq!(font.size, 12.0);
    }

    #[test]
    fn test_only_changed_fonts_saved() {
        let mut fonts = default_fonts();
        let mut bigger = fonts.get("field").cloned().unwrap();
        bigger.size = 12.0;
        fonts.set("field", bigger).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fonts.to_json().unwrap()).unwrap();
        let saved = json.as_object().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved["field"]["size"], 12.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(FontDescriptor::new(8.0).to_string(), "Roboto 8");
        let font = FontDescriptor::new(7.5).weight(FontWeight::Bold).slant(FontSlant::Italic);
        assert_eq!(font.to_string(), "Roboto 7.5 Bold Italic");
    }

    #[test]
    fn test_factory_ids_have_titles() {
        for id in factory().keys() {
            assert!(font_title(id).is_some(), "{id}");
        }
    }
}

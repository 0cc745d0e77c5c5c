//! Section identifiers, enabled state and placement by layout area.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::template::Section;

/// Where on the page a section is placed.
///
/// Variant order is the render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutArea {
    Header,
    SidebarLeft,
    #[default]
    Main,
    SidebarRight,
    Footer,
    Floating,
}

impl LayoutArea {
    /// All areas in the order a page renders them.
    pub const RENDER_ORDER: [LayoutArea; 6] = [
        LayoutArea::Header,
        LayoutArea::SidebarLeft,
        LayoutArea::Main,
        LayoutArea::SidebarRight,
        LayoutArea::Footer,
        LayoutArea::Floating,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "header" => Some(Self::Header),
            "sidebar-left" => Some(Self::SidebarLeft),
            "main" => Some(Self::Main),
            "sidebar-right" => Some(Self::SidebarRight),
            "footer" => Some(Self::Footer),
            "floating" => Some(Self::Floating),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::SidebarLeft => "sidebar-left",
            Self::Main => "main",
            Self::SidebarRight => "sidebar-right",
            Self::Footer => "footer",
            Self::Floating => "floating",
        }
    }
}

/// Alias table for section ids used by older saved configurations.
const ALIASES: &[(&str, &str)] = &[
    ("footer", "contact"),
    ("hero", "header"),
    ("about-me", "about"),
    ("profile", "about"),
    ("sobre-mi", "about"),
];

/// Canonical form of a section id.
pub fn normalize_id(id: &str) -> String {
    let id = id.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == id)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(id)
}

/// Read a loosely typed enabled flag.
///
/// `false`, `0`, `null` and the strings "false", "0", "no", "off" and
/// "disabled" (any case) disable a section. Anything else, including a
/// missing value, leaves it enabled.
pub fn is_enabled(raw: Option<&Value>) -> bool {
    match raw {
        None => true,
        Some(Value::Null) => false,
        Some(Value::Bool(enabled)) => *enabled,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "false" | "0" | "no" | "off" | "disabled"
        ),
        Some(_) => true,
    }
}

pub(crate) fn deserialize_enabled<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let raw = Value::deserialize(d)?;
    Ok(is_enabled(Some(&raw)))
}

pub(crate) fn deserialize_area<'de, D: Deserializer<'de>>(d: D) -> Result<LayoutArea, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(match raw.as_deref() {
        None => LayoutArea::Main,
        Some(area) => LayoutArea::parse(area).unwrap_or_else(|| {
            tracing::debug!("Unknown layout area '{}', placing in main", area);
            LayoutArea::Main
        }),
    })
}

pub(crate) fn deserialize_order<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let raw = Value::deserialize(d)?;
    Ok(match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Enabled sections bucketed by layout area, each bucket in render order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionGroups {
    areas: BTreeMap<LayoutArea, Vec<Section>>,
    /// Sections dropped because an equivalent id already had a lower order.
    pub duplicates_dropped: usize,
}

impl SectionGroups {
    /// Sections placed in `area`, in render order.
    pub fn area(&self, area: LayoutArea) -> &[Section] {
        self.areas.get(&area).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every placed section, areas in [`LayoutArea::RENDER_ORDER`].
    pub fn iter(&self) -> impl Iterator<Item = (LayoutArea, &Section)> {
        self.areas
            .iter()
            .flat_map(|(area, sections)| sections.iter().map(move |s| (*area, s)))
    }

    /// Canonical ids in render order.
    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|(_, s)| s.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.areas.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Filter, normalize, deduplicate and bucket sections by area.
///
/// Sections are ordered by `order`, ties broken by their position in
/// `sections`. When two entries normalize to the same id, the one that comes
/// first in that ordering is kept.
pub fn group_by_area(sections: &[Section]) -> SectionGroups {
    let mut candidates: Vec<(usize, Section)> = sections
        .iter()
        .enumerate()
        .filter(|(_, s)| s.enabled)
        .map(|(position, s)| {
            let mut section = s.clone();
            section.id = normalize_id(&s.id);
            (position, section)
        })
        .collect();

    candidates.sort_by_key(|(position, s)| (s.order, *position));

    let mut seen = HashSet::new();
    let mut groups = SectionGroups::default();

    for (_, section) in candidates {
        if !seen.insert(section.id.clone()) {
            tracing::debug!(
                "Dropping duplicate section '{}' (order {})",
                section.id,
                section.order
            );
            groups.duplicates_dropped += 1;
            continue;
        }
        groups.areas.entry(section.area).or_default().push(section);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn section(id: &str, order: i64, area: LayoutArea) -> Section {
        Section::new(id, id, order, area)
    }

    #[test]
    fn normalizes_aliases() {
        assert_eq!(normalize_id("footer"), "contact");
        assert_eq!(normalize_id("contact"), "contact");
        assert_eq!(normalize_id("Hero"), "header");
        assert_eq!(normalize_id(" about-me "), "about");
        assert_eq!(normalize_id("profile"), "about");
        assert_eq!(normalize_id("sobre-mi"), "about");
        assert_eq!(normalize_id("  Testimonials "), "testimonials");
    }

    #[test]
    fn enabled_by_default() {
        assert!(is_enabled(None));
        assert!(is_enabled(Some(&json!(true))));
        assert!(is_enabled(Some(&json!("yes"))));
        assert!(is_enabled(Some(&json!(1))));
        assert!(is_enabled(Some(&json!({}))));

        assert!(!is_enabled(Some(&json!(false))));
        assert!(!is_enabled(Some(&json!(0))));
        assert!(!is_enabled(Some(&Value::Null)));
        for raw in ["false", "0", "no", "off", "disabled", "OFF", " Disabled "] {
            assert!(!is_enabled(Some(&json!(raw))), "{raw} should disable");
        }
    }

    #[test]
    fn deserializes_loose_section_fields() {
        let missing: Section = serde_json::from_value(json!({"id": "about"})).unwrap();
        let off: Section =
            serde_json::from_value(json!({"id": "about", "enabled": "off"})).unwrap();
        let odd: Section = serde_json::from_value(
            json!({"id": "about", "enabled": null, "order": "3", "area": "Sidebar-Left"}),
        )
        .unwrap();

        assert!(missing.enabled);
        assert!(!off.enabled);
        assert!(!odd.enabled);
        assert_eq!(odd.order, 3);
        assert_eq!(odd.area, LayoutArea::SidebarLeft);
    }

    #[test]
    fn groups_by_area_and_order() {
        let sections = vec![
            section("contact", 9, LayoutArea::Footer),
            section("projects", 2, LayoutArea::Main),
            section("hero", 0, LayoutArea::Header),
            section("about", 1, LayoutArea::Main),
            section("skills", 3, LayoutArea::Main).disabled(),
        ];

        let groups = group_by_area(&sections);

        assert_eq!(groups.area(LayoutArea::Header)[0].id, "header");
        assert_eq!(
            groups.area(LayoutArea::Main).iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            vec!["about", "projects"]
        );
        assert_eq!(groups.ids(), vec!["header", "about", "projects", "contact"]);
        assert_eq!(groups.duplicates_dropped, 0);
    }

    #[test]
    fn ties_keep_original_order() {
        let sections = vec![
            section("skills", 1, LayoutArea::Main),
            section("about", 1, LayoutArea::Main),
            section("projects", 1, LayoutArea::Main),
        ];

        let groups = group_by_area(&sections);

        assert_eq!(groups.ids(), vec!["skills", "about", "projects"]);
    }

    #[test]
    fn collapses_equivalent_ids_keeping_lowest_order() {
        let sections = vec![
            section("contact", 7, LayoutArea::Main),
            section("footer", 5, LayoutArea::Footer),
            section("about", 1, LayoutArea::Main),
            section("profile", 2, LayoutArea::Main),
        ];

        let groups = group_by_area(&sections);

        assert_eq!(groups.ids(), vec!["about", "contact"]);
        assert_eq!(groups.area(LayoutArea::Footer)[0].order, 5);
        assert!(groups.area(LayoutArea::Main).iter().all(|s| s.id != "contact"));
        assert_eq!(groups.duplicates_dropped, 2);
    }
}

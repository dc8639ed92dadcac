//! Colour themes for the TUI.
//!
//! Widgets ask for a semantic role (`"item_selected"`, `"chip_active"`) rather
//! than a concrete colour. `ThemeVariant` picks the palette and `StyleMap`
//! resolves role names to `Style` values at render time.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Listing --
    pub item_title: Style,
    pub item_selected: Style,
    pub item_meta: Style,
    pub item_preview: Style,
    pub item_category: Style,
    pub item_engagement: Style,

    // -- Filter bar --
    pub chip: Style,
    pub chip_active: Style,
    pub search_prompt: Style,

    // -- Composer --
    pub composer_border: Style,
    pub composer_label: Style,
    pub composer_field_active: Style,
    pub composer_hint: Style,
    pub composer_error: Style,

    // -- Reader --
    pub reader_heading: Style,
    pub reader_body: Style,
    pub reader_metadata: Style,
    pub reader_code_block: Style,
    pub reader_inline_code: Style,
    pub reader_emphasis: Style,
    pub reader_strong: Style,
    pub reader_image: Style,
    pub reader_comment: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub error_text: Style,
    pub loading: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            item_title: Style::default().add_modifier(Modifier::BOLD),
            item_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            item_meta: Style::default().fg(Color::DarkGray),
            item_preview: Style::default().fg(Color::Gray),
            item_category: Style::default().fg(Color::Cyan),
            item_engagement: Style::default().fg(Color::Yellow),

            chip: Style::default().fg(Color::Gray),
            chip_active: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            search_prompt: Style::default().fg(Color::Yellow),

            composer_border: Style::default().fg(Color::Cyan),
            composer_label: Style::default().fg(Color::Gray),
            composer_field_active: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            composer_hint: Style::default().fg(Color::DarkGray),
            composer_error: Style::default().fg(Color::Red),

            reader_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default(),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_code_block: Style::default().fg(Color::Yellow).bg(Color::Black),
            reader_inline_code: Style::default().fg(Color::Yellow),
            reader_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            reader_strong: Style::default().add_modifier(Modifier::BOLD),
            reader_image: Style::default().fg(Color::Blue),
            reader_comment: Style::default().fg(Color::Gray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            error_text: Style::default().fg(Color::Red),
            loading: Style::default().fg(Color::Yellow),
        }
    }

    /// Adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            item_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            item_selected: Style::default().bg(Color::Blue).fg(Color::White),
            item_meta: Style::default().fg(Color::DarkGray),
            item_preview: Style::default().fg(Color::Black),
            item_category: Style::default().fg(Color::Blue),
            item_engagement: Style::default().fg(Color::Magenta),

            chip: Style::default().fg(Color::DarkGray),
            chip_active: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            search_prompt: Style::default().fg(Color::Magenta),

            composer_border: Style::default().fg(Color::Blue),
            composer_label: Style::default().fg(Color::DarkGray),
            composer_field_active: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            composer_hint: Style::default().fg(Color::DarkGray),
            composer_error: Style::default().fg(Color::Red),

            reader_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Black),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_code_block: Style::default().fg(Color::DarkGray).bg(Color::White),
            reader_inline_code: Style::default().fg(Color::DarkGray),
            reader_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            reader_strong: Style::default().add_modifier(Modifier::BOLD),
            reader_image: Style::default().fg(Color::Blue),
            reader_comment: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            error_text: Style::default().fg(Color::Red),
            loading: Style::default().fg(Color::Magenta),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

const ROLE_COUNT: usize = 28;

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; ROLE_COUNT] = [
    "item_title",
    "item_selected",
    "item_meta",
    "item_preview",
    "item_category",
    "item_engagement",
    "chip",
    "chip_active",
    "search_prompt",
    "composer_border",
    "composer_label",
    "composer_field_active",
    "composer_hint",
    "composer_error",
    "reader_heading",
    "reader_body",
    "reader_metadata",
    "reader_code_block",
    "reader_inline_code",
    "reader_emphasis",
    "reader_strong",
    "reader_image",
    "reader_comment",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "error_text",
    "loading",
];

/// Role name → `Style` lookup built from a palette.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; ROLE_COUNT] = [
            p.item_title,
            p.item_selected,
            p.item_meta,
            p.item_preview,
            p.item_category,
            p.item_engagement,
            p.chip,
            p.chip_active,
            p.search_prompt,
            p.composer_border,
            p.composer_label,
            p.composer_field_active,
            p.composer_hint,
            p.composer_error,
            p.reader_heading,
            p.reader_body,
            p.reader_metadata,
            p.reader_code_block,
            p.reader_inline_code,
            p.reader_emphasis,
            p.reader_strong,
            p.reader_image,
            p.reader_comment,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.error_text,
            p.loading,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Unknown roles get `Style::default()`.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

impl Default for StyleMap {
    fn default() -> Self {
        Self::from_palette(&ThemeVariant::default().palette())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_palette_selection_is_dark_gray() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.item_selected,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.item_selected, light.item_selected);
        assert_ne!(dark.chip_active, light.chip_active);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("Light"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn variant_cycles() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next().next(), ThemeVariant::Light);
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Light.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.resolve("chip_active"), palette.chip_active);
        assert_eq!(sm.resolve("composer_error"), palette.composer_error);
        assert_eq!(sm.resolve("loading"), palette.loading);
    }

    #[test]
    fn style_map_returns_default_for_unknown() {
        assert_eq!(StyleMap::default().resolve("feed_unread"), Style::default());
    }

    #[test]
    fn style_map_has_every_role() {
        let sm = StyleMap::default();
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
        for name in ROLE_NAMES {
            assert!(sm.map.contains_key(name), "Role '{name}' missing");
        }
    }
}

//! The explicit preview surface: plain mutable state the synchronizer
//! writes into.
//!
//! Modeling the rendered output as a value (instead of ambient host state)
//! keeps refresh passes testable without a UI host: after any completed
//! pass the surface is a pure function of the current fields and asset
//! references, and two passes over unchanged input compare equal.

use serde::{Deserialize, Serialize};

use crate::assets::AssetReference;

/// Accent applied to the bookmark stat when the post is marked bookmarked.
pub const BOOKMARK_ACCENT: Color = Color {
    r: 0x1d,
    g: 0x9b,
    b: 0xf0,
};

/// An sRGB color used for slot tinting and theme palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Closed set of background themes for the preview container. Selecting a
/// theme replaces the previous one; themes never accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dim,
    Dark,
}

/// Closed set of verification badge tiers. `None` hides the badge slot
/// entirely; each other tier maps to one fixed graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    #[default]
    None,
    Blue,
    Grey,
    Gold,
}

/// Fixed badge graphics, resolved by the rendering layer. A closed tagged
/// variant instead of injected markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeGraphic {
    Blue,
    Grey,
    Gold,
}

/// Bookmark icon variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookmarkIcon {
    #[default]
    Outline,
    Filled,
}

/// Named text locations in the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSlot {
    Name,
    Handle,
    Message,
    Replies,
    Reposts,
    Likes,
    Views,
    Bookmarks,
    Date,
    Time,
}

/// The badge slot: visibility plus the currently injected graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BadgeSlot {
    pub visible: bool,
    pub graphic: Option<BadgeGraphic>,
}

/// The composite bookmark slot. The icon variant and the three tint
/// targets (icon, numeric slot, stat container) always change together
/// under one structural rule; `None` tints mean the unstyled default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookmarkSlot {
    pub icon: BookmarkIcon,
    pub icon_tint: Option<Color>,
    pub count_tint: Option<Color>,
    pub container_tint: Option<Color>,
}

/// The materialized preview state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreviewSurface {
    pub name: String,
    pub handle: String,
    pub message: String,
    pub replies: String,
    pub reposts: String,
    pub likes: String,
    pub views: String,
    pub bookmarks: String,
    pub date: String,
    pub time: String,
    pub bookmark: BookmarkSlot,
    pub theme: Theme,
    pub badge: BadgeSlot,
    pub profile_image: Option<AssetReference>,
    pub post_image: Option<AssetReference>,
}

impl PreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one text slot.
    pub fn set_text(&mut self, slot: TextSlot, value: String) {
        match slot {
            TextSlot::Name => self.name = value,
            TextSlot::Handle => self.handle = value,
            TextSlot::Message => self.message = value,
            TextSlot::Replies => self.replies = value,
            TextSlot::Reposts => self.reposts = value,
            TextSlot::Likes => self.likes = value,
            TextSlot::Views => self.views = value,
            TextSlot::Bookmarks => self.bookmarks = value,
            TextSlot::Date => self.date = value,
            TextSlot::Time => self.time = value,
        }
    }

    /// Render the surface as a compact, human-readable snapshot.
    pub fn text_snapshot(&self) -> SurfaceSnapshot {
        let badge = match (self.badge.visible, self.badge.graphic) {
            (true, Some(BadgeGraphic::Blue)) => " [badge: blue]",
            (true, Some(BadgeGraphic::Grey)) => " [badge: grey]",
            (true, Some(BadgeGraphic::Gold)) => " [badge: gold]",
            _ => "",
        };
        let header = format!("{} (@{}){}", self.name, self.handle, badge);

        let mut body = self.message.clone();
        if let Some(image) = &self.post_image {
            body.push_str(&format!("\n[image: {}]", image.source_file_name));
        }

        let theme = match self.theme {
            Theme::Light => "light",
            Theme::Dim => "dim",
            Theme::Dark => "dark",
        };
        let meta = format!("{} · {} · theme: {}", self.time, self.date, theme);

        let bookmarked = match self.bookmark.icon {
            BookmarkIcon::Filled => " (bookmarked)",
            BookmarkIcon::Outline => "",
        };
        let stats = format!(
            "{} replies · {} reposts · {} likes · {} views · {} bookmarks{}",
            self.replies, self.reposts, self.likes, self.views, self.bookmarks, bookmarked
        );

        SurfaceSnapshot {
            header,
            body,
            meta,
            stats,
        }
    }
}

/// A textual snapshot of the rendered surface, suitable for quick
/// inspection and textual tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    /// Display name, handle, badge marker
    pub header: String,
    /// Message plus an attachment marker when a post image is set
    pub body: String,
    /// Time, date, and theme line
    pub meta: String,
    /// Stat row
    pub stats: String,
}

impl std::fmt::Display for SurfaceSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "{}", self.body)?;
        writeln!(f, "{}", self.meta)?;
        write!(f, "{}", self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_text_targets_the_named_slot() {
        let mut surface = PreviewSurface::new();
        surface.set_text(TextSlot::Name, "Ada".to_string());
        surface.set_text(TextSlot::Likes, "1.5K".to_string());

        assert_eq!(surface.name, "Ada");
        assert_eq!(surface.likes, "1.5K");
        assert_eq!(surface.handle, "");
    }

    #[test]
    fn snapshot_hides_badge_marker_when_not_visible() {
        let mut surface = PreviewSurface::new();
        surface.name = "Ada".to_string();
        surface.handle = "ada".to_string();

        let snapshot = surface.text_snapshot();
        assert_eq!(snapshot.header, "Ada (@ada)");

        surface.badge = BadgeSlot {
            visible: true,
            graphic: Some(BadgeGraphic::Grey),
        };
        let snapshot = surface.text_snapshot();
        assert_eq!(snapshot.header, "Ada (@ada) [badge: grey]");
    }

    #[test]
    fn default_bookmark_slot_is_unstyled() {
        let slot = BookmarkSlot::default();
        assert_eq!(slot.icon, BookmarkIcon::Outline);
        assert!(slot.icon_tint.is_none());
        assert!(slot.count_tint.is_none());
        assert!(slot.container_tint.is_none());
    }
}

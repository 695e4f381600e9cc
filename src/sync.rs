//! The preview synchronizer: one full-state refresh pass.
//!
//! `refresh` walks the binding table and brings every preview slot in line
//! with the current form state and asset references. The pass is total and
//! idempotent; a sub-update that fails is logged and counted, and the rest
//! of the pass still runs.

use log::warn;

use crate::assets::{AssetSlot, AssetStore};
use crate::bindings::{self, BindingEntry, FormatterId, SlotId, StructuralRule};
use crate::format;
use crate::surface::{
    BadgeGraphic, BadgeSlot, BadgeTier, BookmarkIcon, BookmarkSlot, PreviewSurface,
    BOOKMARK_ACCENT,
};
use crate::{Error, FieldValue, PostFields, Result};

/// Outcome of one refresh pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshReport {
    /// Sub-updates applied
    pub completed: usize,
    /// Sub-updates that failed and were skipped
    pub failed: usize,
}

/// Run a full refresh pass over every binding table entry.
///
/// Mutates only the surface. Running twice with unchanged inputs produces
/// an identical surface.
pub fn refresh(
    fields: &PostFields,
    assets: &AssetStore,
    surface: &mut PreviewSurface,
) -> RefreshReport {
    let mut report = RefreshReport::default();

    for entry in bindings::table() {
        match apply_entry(entry, fields, assets, surface) {
            Ok(()) => report.completed += 1,
            Err(e) => {
                warn!("Sub-update for {:?} failed: {}", entry.field, e);
                report.failed += 1;
            }
        }
    }

    report
}

/// Apply one binding entry to the surface.
fn apply_entry(
    entry: &BindingEntry,
    fields: &PostFields,
    assets: &AssetStore,
    surface: &mut PreviewSurface,
) -> Result<()> {
    if let Some(rule) = entry.rule {
        return apply_rule(rule, entry, fields, assets, surface);
    }

    let slot = match entry.slot {
        SlotId::Text(slot) => slot,
        other => {
            return Err(Error::RenderError(format!(
                "Entry for {:?} has no rule but targets non-text slot {:?}",
                entry.field, other
            )))
        }
    };

    let raw = match fields.value(entry.field) {
        Some(FieldValue::Text(raw)) => raw,
        other => {
            return Err(Error::RenderError(format!(
                "Expected a text value for {:?}, got {:?}",
                entry.field, other
            )))
        }
    };

    match entry.formatter {
        None => surface.set_text(slot, raw.to_string()),
        Some(FormatterId::CompactCount) => surface.set_text(slot, format::compact_count(raw)),
        Some(FormatterId::TwelveHourClock) => {
            surface.set_text(slot, format::twelve_hour_clock(raw))
        }
        Some(FormatterId::FriendlyDate) => {
            // Empty input leaves the slot at its prior content.
            if let Some(formatted) = format::friendly_date(raw)? {
                surface.set_text(slot, formatted);
            }
        }
    }

    Ok(())
}

/// Apply one structural rule.
fn apply_rule(
    rule: StructuralRule,
    entry: &BindingEntry,
    fields: &PostFields,
    assets: &AssetStore,
    surface: &mut PreviewSurface,
) -> Result<()> {
    match rule {
        StructuralRule::BookmarkAccent => {
            let bookmarked = match fields.value(entry.field) {
                Some(FieldValue::Flag(flag)) => flag,
                other => {
                    return Err(Error::RenderError(format!(
                        "Expected a flag for {:?}, got {:?}",
                        entry.field, other
                    )))
                }
            };

            // The icon swap and the three tint targets always move together.
            surface.bookmark = if bookmarked {
                BookmarkSlot {
                    icon: BookmarkIcon::Filled,
                    icon_tint: Some(BOOKMARK_ACCENT),
                    count_tint: Some(BOOKMARK_ACCENT),
                    container_tint: Some(BOOKMARK_ACCENT),
                }
            } else {
                // Restores the unstyled state, not a second default color.
                BookmarkSlot::default()
            };
        }
        StructuralRule::BackgroundTheme => {
            let theme = match fields.value(entry.field) {
                Some(FieldValue::ThemeChoice(theme)) => theme,
                other => {
                    return Err(Error::RenderError(format!(
                        "Expected a theme choice for {:?}, got {:?}",
                        entry.field, other
                    )))
                }
            };
            surface.theme = theme;
        }
        StructuralRule::VerificationBadge => {
            let tier = match fields.value(entry.field) {
                Some(FieldValue::BadgeChoice(tier)) => tier,
                other => {
                    return Err(Error::RenderError(format!(
                        "Expected a badge choice for {:?}, got {:?}",
                        entry.field, other
                    )))
                }
            };
            surface.badge = match tier {
                BadgeTier::None => BadgeSlot {
                    visible: false,
                    graphic: None,
                },
                BadgeTier::Blue => BadgeSlot {
                    visible: true,
                    graphic: Some(BadgeGraphic::Blue),
                },
                BadgeTier::Grey => BadgeSlot {
                    visible: true,
                    graphic: Some(BadgeGraphic::Grey),
                },
                BadgeTier::Gold => BadgeSlot {
                    visible: true,
                    graphic: Some(BadgeGraphic::Gold),
                },
            };
        }
        StructuralRule::AssetImage => match entry.slot {
            SlotId::ProfileImage => {
                surface.profile_image = assets.get(AssetSlot::Profile).cloned();
            }
            SlotId::PostImage => {
                surface.post_image = assets.get(AssetSlot::Post).cloned();
            }
            other => {
                return Err(Error::RenderError(format!(
                    "AssetImage rule targets non-asset slot {:?}",
                    other
                )))
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetReference;

    fn refreshed(fields: &PostFields, assets: &AssetStore) -> PreviewSurface {
        let mut surface = PreviewSurface::new();
        refresh(fields, assets, &mut surface);
        surface
    }

    #[test]
    fn refresh_is_idempotent() {
        let fields = PostFields {
            name: "Ada Lovelace".to_string(),
            likes: "1500".to_string(),
            date: "2026-08-06".to_string(),
            time: "14:30".to_string(),
            bookmarked: true,
            badge: BadgeTier::Blue,
            ..Default::default()
        };
        let assets = AssetStore::new();

        let mut surface = PreviewSurface::new();
        refresh(&fields, &assets, &mut surface);
        let first = surface.clone();
        refresh(&fields, &assets, &mut surface);

        assert_eq!(first, surface);
    }

    #[test]
    fn refresh_copies_and_formats_text_slots() {
        let fields = PostFields {
            name: "Ada".to_string(),
            message: "hello".to_string(),
            likes: "1500".to_string(),
            views: "2300000".to_string(),
            time: "23:59".to_string(),
            date: "2026-08-06".to_string(),
            ..Default::default()
        };
        let surface = refreshed(&fields, &AssetStore::new());

        assert_eq!(surface.name, "Ada");
        assert_eq!(surface.message, "hello");
        assert_eq!(surface.likes, "1.5K");
        assert_eq!(surface.views, "2.3M");
        assert_eq!(surface.time, "11:59 PM");
        assert_eq!(surface.date, "Aug 6, 2026");
    }

    #[test]
    fn bookmark_toggle_restores_unstyled_state() {
        let mut fields = PostFields::default();
        let assets = AssetStore::new();
        let mut surface = PreviewSurface::new();

        refresh(&fields, &assets, &mut surface);
        let original = surface.bookmark;

        fields.bookmarked = true;
        refresh(&fields, &assets, &mut surface);
        assert_eq!(surface.bookmark.icon, BookmarkIcon::Filled);
        assert_eq!(surface.bookmark.icon_tint, Some(BOOKMARK_ACCENT));
        assert_eq!(surface.bookmark.count_tint, Some(BOOKMARK_ACCENT));
        assert_eq!(surface.bookmark.container_tint, Some(BOOKMARK_ACCENT));

        fields.bookmarked = false;
        refresh(&fields, &assets, &mut surface);
        assert_eq!(surface.bookmark, original);
        assert!(surface.bookmark.icon_tint.is_none());
    }

    #[test]
    fn badge_none_hides_the_slot_entirely() {
        let mut fields = PostFields {
            badge: BadgeTier::Gold,
            ..Default::default()
        };
        let assets = AssetStore::new();
        let mut surface = PreviewSurface::new();

        refresh(&fields, &assets, &mut surface);
        assert!(surface.badge.visible);
        assert_eq!(surface.badge.graphic, Some(BadgeGraphic::Gold));

        fields.badge = BadgeTier::None;
        refresh(&fields, &assets, &mut surface);
        assert!(!surface.badge.visible);
        assert_eq!(surface.badge.graphic, None);
    }

    #[test]
    fn badge_tier_replaces_prior_graphic() {
        let mut fields = PostFields {
            badge: BadgeTier::Blue,
            ..Default::default()
        };
        let assets = AssetStore::new();
        let mut surface = PreviewSurface::new();

        refresh(&fields, &assets, &mut surface);
        assert_eq!(surface.badge.graphic, Some(BadgeGraphic::Blue));

        fields.badge = BadgeTier::Grey;
        refresh(&fields, &assets, &mut surface);
        assert_eq!(surface.badge.graphic, Some(BadgeGraphic::Grey));
    }

    #[test]
    fn malformed_date_is_isolated_and_leaves_slot_unchanged() {
        let mut fields = PostFields {
            date: "2026-08-06".to_string(),
            likes: "1000".to_string(),
            ..Default::default()
        };
        let assets = AssetStore::new();
        let mut surface = PreviewSurface::new();

        let report = refresh(&fields, &assets, &mut surface);
        assert_eq!(report.failed, 0);
        assert_eq!(surface.date, "Aug 6, 2026");

        fields.date = "not-a-date".to_string();
        fields.likes = "2000".to_string();
        let report = refresh(&fields, &assets, &mut surface);

        // The date sub-update failed in isolation; the rest of the pass ran.
        assert_eq!(report.failed, 1);
        assert_eq!(surface.date, "Aug 6, 2026");
        assert_eq!(surface.likes, "2K");
    }

    #[test]
    fn empty_date_leaves_slot_at_prior_content() {
        let mut fields = PostFields {
            date: "2026-08-06".to_string(),
            ..Default::default()
        };
        let assets = AssetStore::new();
        let mut surface = PreviewSurface::new();

        refresh(&fields, &assets, &mut surface);
        fields.date = String::new();
        let report = refresh(&fields, &assets, &mut surface);

        assert_eq!(report.failed, 0);
        assert_eq!(surface.date, "Aug 6, 2026");
    }

    #[test]
    fn asset_slots_copy_current_references() {
        let fields = PostFields::default();
        let mut assets = AssetStore::new();
        let reference = AssetReference {
            data_uri: "data:image/png;base64,AA==".to_string(),
            source_file_name: "avatar.png".to_string(),
            byte_size: 1,
        };
        assets.replace(AssetSlot::Profile, reference.clone());

        let surface = refreshed(&fields, &assets);
        assert_eq!(surface.profile_image, Some(reference));
        assert_eq!(surface.post_image, None);
    }
}

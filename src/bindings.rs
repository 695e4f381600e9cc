//! The static field-to-slot binding table.
//!
//! One entry per input field, built once and immutable: the synchronizer
//! walks this table on every refresh pass instead of hard-coding the slot
//! wiring. Plain entries copy a value (optionally through a formatter);
//! structural entries carry a rule for updates that are not value copies.
//! Composite targets (the bookmark icon, count, and container) sit behind a
//! single rule so their joint update stays atomic.

use crate::surface::TextSlot;

/// Identifies one input field of the form state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
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
    Bookmarked,
    BackgroundTheme,
    BadgeTier,
    ProfileImage,
    PostImage,
}

/// Identifies the preview location an entry writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotId {
    Text(TextSlot),
    Bookmark,
    Background,
    Badge,
    ProfileImage,
    PostImage,
}

/// Pure formatter applied between the raw field value and its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatterId {
    CompactCount,
    TwelveHourClock,
    FriendlyDate,
}

/// Structural updates: preview changes that are not plain value copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralRule {
    /// Swap the bookmark icon variant and tint icon, count, and container
    /// together
    BookmarkAccent,
    /// Replace the container's theme with the selected one
    BackgroundTheme,
    /// Show/hide the badge slot and inject the tier's fixed graphic
    VerificationBadge,
    /// Copy the slot's current asset reference into the preview, keeping
    /// the placeholder when none exists
    AssetImage,
}

/// One row of the binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingEntry {
    pub field: FieldId,
    pub slot: SlotId,
    pub formatter: Option<FormatterId>,
    pub rule: Option<StructuralRule>,
}

const fn copy(field: FieldId, slot: TextSlot) -> BindingEntry {
    BindingEntry {
        field,
        slot: SlotId::Text(slot),
        formatter: None,
        rule: None,
    }
}

const fn formatted(field: FieldId, slot: TextSlot, formatter: FormatterId) -> BindingEntry {
    BindingEntry {
        field,
        slot: SlotId::Text(slot),
        formatter: Some(formatter),
        rule: None,
    }
}

const fn structural(field: FieldId, slot: SlotId, rule: StructuralRule) -> BindingEntry {
    BindingEntry {
        field,
        slot,
        formatter: None,
        rule: Some(rule),
    }
}

/// The full binding table. Every bound input field appears exactly once.
pub fn table() -> &'static [BindingEntry] {
    const TABLE: &[BindingEntry] = &[
        copy(FieldId::Name, TextSlot::Name),
        copy(FieldId::Handle, TextSlot::Handle),
        copy(FieldId::Message, TextSlot::Message),
        formatted(FieldId::Replies, TextSlot::Replies, FormatterId::CompactCount),
        formatted(FieldId::Reposts, TextSlot::Reposts, FormatterId::CompactCount),
        formatted(FieldId::Likes, TextSlot::Likes, FormatterId::CompactCount),
        formatted(FieldId::Views, TextSlot::Views, FormatterId::CompactCount),
        formatted(
            FieldId::Bookmarks,
            TextSlot::Bookmarks,
            FormatterId::CompactCount,
        ),
        formatted(FieldId::Date, TextSlot::Date, FormatterId::FriendlyDate),
        formatted(FieldId::Time, TextSlot::Time, FormatterId::TwelveHourClock),
        structural(
            FieldId::Bookmarked,
            SlotId::Bookmark,
            StructuralRule::BookmarkAccent,
        ),
        structural(
            FieldId::BackgroundTheme,
            SlotId::Background,
            StructuralRule::BackgroundTheme,
        ),
        structural(
            FieldId::BadgeTier,
            SlotId::Badge,
            StructuralRule::VerificationBadge,
        ),
        structural(
            FieldId::ProfileImage,
            SlotId::ProfileImage,
            StructuralRule::AssetImage,
        ),
        structural(
            FieldId::PostImage,
            SlotId::PostImage,
            StructuralRule::AssetImage,
        ),
    ];
    TABLE
}

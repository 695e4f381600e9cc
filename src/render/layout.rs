//! Layout primitives for the preview card.
//!
//! Text is measured on a fixed 8px character cell, which keeps layout
//! deterministic without a font stack; the rasterizer greeks glyphs on the
//! same grid.

use crate::surface::{BadgeGraphic, BookmarkIcon, Color, PreviewSurface};
use crate::SurfaceSize;

/// Character cell width in logical pixels at scale 1
pub const CHAR_WIDTH: u32 = 8;
/// Line height in logical pixels at scale 1
pub const LINE_HEIGHT: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxModel {
    pub margin: u32,
    pub border: u32,
    pub padding: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub rect: Rect,
    pub box_model: BoxModel,
}

impl LayoutBox {
    pub fn content_width(&self) -> u32 {
        let total = self.box_model.margin + self.box_model.border + self.box_model.padding;
        self.rect.width.saturating_sub(total)
    }
}

/// What a laid-out box displays. Graphics stay tagged variants here; the
/// paint layer resolves them to concrete fills.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    /// The circular avatar; falls back to a placeholder without an upload
    Avatar { data_uri: Option<String> },
    /// A run of text, optionally tinted; `muted` uses the palette's
    /// secondary color
    Text {
        text: String,
        scale: usize,
        tint: Option<Color>,
        muted: bool,
    },
    /// The verification badge graphic
    Badge { graphic: BadgeGraphic },
    /// The large media attachment
    Attachment { data_uri: String },
    /// The bookmark icon in the stat row
    BookmarkMark {
        icon: BookmarkIcon,
        tint: Option<Color>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub lb: LayoutBox,
    pub content: NodeContent,
}

fn plain_box(x: i32, y: i32, width: u32, height: u32) -> LayoutBox {
    LayoutBox {
        rect: Rect {
            x,
            y,
            width,
            height,
        },
        box_model: BoxModel {
            margin: 0,
            border: 0,
            padding: 0,
        },
    }
}

fn text_node(x: i32, y: i32, text: &str, scale: usize, tint: Option<Color>, muted: bool) -> LayoutNode {
    let width = text.chars().count() as u32 * CHAR_WIDTH * scale as u32;
    LayoutNode {
        lb: plain_box(x, y, width, LINE_HEIGHT * scale as u32),
        content: NodeContent::Text {
            text: text.to_string(),
            scale,
            tint,
            muted,
        },
    }
}

/// Wrap text into lines of at most `chars_per_line` characters, breaking on
/// whitespace.
fn wrap(text: &str, chars_per_line: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        if cur.len() + word.len() + 1 > chars_per_line && !cur.is_empty() {
            lines.push(cur);
            cur = word.to_string();
        } else {
            if !cur.is_empty() {
                cur.push(' ');
            }
            cur.push_str(word);
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/// Compute the card layout for the current surface state.
///
/// Stacks the header (avatar, name, badge, handle), the word-wrapped
/// message, the optional attachment, the timestamp line, and the stat row;
/// stops emitting message lines when the card runs out of vertical space.
pub fn layout_surface(surface: &PreviewSurface, size: SurfaceSize) -> Vec<LayoutNode> {
    let mut nodes = Vec::new();
    let edge = 16i32;
    let content_width = size.width.saturating_sub(2 * edge as u32);

    // Header: avatar, display name, badge, handle
    nodes.push(LayoutNode {
        lb: plain_box(edge, edge, 48, 48),
        content: NodeContent::Avatar {
            data_uri: surface.profile_image.as_ref().map(|a| a.data_uri.clone()),
        },
    });

    let name_x = edge + 60;
    nodes.push(text_node(name_x, edge + 4, &surface.name, 2, None, false));

    if surface.badge.visible {
        if let Some(graphic) = surface.badge.graphic {
            let badge_x = name_x
                + (surface.name.chars().count() as u32 * CHAR_WIDTH * 2) as i32
                + 8;
            nodes.push(LayoutNode {
                lb: plain_box(badge_x, edge + 4, 21, 21),
                content: NodeContent::Badge { graphic },
            });
        }
    }

    let handle = format!("@{}", surface.handle);
    nodes.push(text_node(name_x, edge + 28, &handle, 1, None, true));

    let mut y = edge + 64;

    // Message, word-wrapped on the character grid
    let message_box = LayoutBox {
        rect: Rect {
            x: edge,
            y,
            width: content_width,
            height: LINE_HEIGHT,
        },
        box_model: BoxModel {
            margin: 0,
            border: 0,
            padding: 4,
        },
    };
    let chars_per_line = (message_box.content_width() / CHAR_WIDTH).max(1) as usize;
    for line in wrap(&surface.message, chars_per_line) {
        if y as u32 + LINE_HEIGHT > size.height {
            break;
        }
        nodes.push(text_node(edge, y, &line, 1, None, false));
        y += (LINE_HEIGHT + 4) as i32;
    }
    y += 8;

    // Attachment
    if let Some(image) = &surface.post_image {
        let height = 160u32.min(size.height.saturating_sub(y as u32 + 60));
        if height > 0 {
            nodes.push(LayoutNode {
                lb: LayoutBox {
                    rect: Rect {
                        x: edge,
                        y,
                        width: content_width,
                        height,
                    },
                    box_model: BoxModel {
                        margin: 8,
                        border: 1,
                        padding: 0,
                    },
                },
                content: NodeContent::Attachment {
                    data_uri: image.data_uri.clone(),
                },
            });
            y += height as i32 + 12;
        }
    }

    // Timestamp line
    let timestamp = format!("{} · {}", surface.time, surface.date);
    nodes.push(text_node(edge, y, &timestamp, 1, None, true));
    y += (LINE_HEIGHT + 12) as i32;

    // Stat row: five stats at even columns; the bookmark stat carries the
    // mark and whatever tint the bookmark rule applied
    let column = (content_width / 5).max(1) as i32;
    let stats = [
        (&surface.replies, "Replies"),
        (&surface.reposts, "Reposts"),
        (&surface.likes, "Likes"),
        (&surface.views, "Views"),
    ];
    for (i, (value, label)) in stats.iter().enumerate() {
        let x = edge + i as i32 * column;
        let stat = format!("{} {}", value, label);
        nodes.push(text_node(x, y, &stat, 1, None, true));
    }

    let bookmark_x = edge + 4 * column;
    nodes.push(LayoutNode {
        lb: plain_box(bookmark_x, y - 2, 10, 12),
        content: NodeContent::BookmarkMark {
            icon: surface.bookmark.icon,
            tint: surface.bookmark.icon_tint,
        },
    });
    let count = format!("{} Bookmarks", surface.bookmarks);
    nodes.push(text_node(
        bookmark_x + 14,
        y,
        &count,
        1,
        surface.bookmark.count_tint,
        true,
    ));

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{BadgeSlot, BookmarkSlot, BOOKMARK_ACCENT};

    fn sample_surface() -> PreviewSurface {
        PreviewSurface {
            name: "Ada".to_string(),
            handle: "ada".to_string(),
            message: "hello world".to_string(),
            replies: "1".to_string(),
            reposts: "2".to_string(),
            likes: "3".to_string(),
            views: "4".to_string(),
            bookmarks: "5".to_string(),
            date: "Aug 6, 2026".to_string(),
            time: "2:30 PM".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn layout_places_avatar_first() {
        let nodes = layout_surface(&sample_surface(), SurfaceSize::default());
        assert!(matches!(nodes[0].content, NodeContent::Avatar { .. }));
        assert!(nodes.len() > 5);
    }

    #[test]
    fn badge_node_present_only_when_visible() {
        let mut surface = sample_surface();
        let has_badge = |nodes: &[LayoutNode]| {
            nodes
                .iter()
                .any(|n| matches!(n.content, NodeContent::Badge { .. }))
        };

        let nodes = layout_surface(&surface, SurfaceSize::default());
        assert!(!has_badge(&nodes));

        surface.badge = BadgeSlot {
            visible: true,
            graphic: Some(BadgeGraphic::Blue),
        };
        let nodes = layout_surface(&surface, SurfaceSize::default());
        assert!(has_badge(&nodes));
    }

    #[test]
    fn long_message_wraps_into_multiple_lines() {
        let mut surface = sample_surface();
        surface.message = "one two three four five six seven eight nine ten".repeat(4);

        let nodes = layout_surface(&surface, SurfaceSize::default());
        let text_lines = nodes
            .iter()
            .filter(|n| matches!(&n.content, NodeContent::Text { scale: 1, muted: false, .. }))
            .count();
        assert!(text_lines > 1);
    }

    #[test]
    fn bookmark_mark_carries_the_icon_tint() {
        let mut surface = sample_surface();
        surface.bookmark = BookmarkSlot {
            icon: crate::surface::BookmarkIcon::Filled,
            icon_tint: Some(BOOKMARK_ACCENT),
            count_tint: Some(BOOKMARK_ACCENT),
            container_tint: Some(BOOKMARK_ACCENT),
        };

        let nodes = layout_surface(&surface, SurfaceSize::default());
        let mark = nodes
            .iter()
            .find_map(|n| match &n.content {
                NodeContent::BookmarkMark { icon, tint } => Some((*icon, *tint)),
                _ => None,
            })
            .unwrap();
        assert_eq!(mark.0, crate::surface::BookmarkIcon::Filled);
        assert_eq!(mark.1, Some(BOOKMARK_ACCENT));
    }

    #[test]
    fn wrap_respects_line_budget() {
        let lines = wrap("aaa bbb ccc ddd", 7);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn content_width_subtracts_the_box_model() {
        let lb = LayoutBox {
            rect: Rect {
                x: 0,
                y: 0,
                width: 100,
                height: 10,
            },
            box_model: BoxModel {
                margin: 8,
                border: 1,
                padding: 6,
            },
        };
        assert_eq!(lb.content_width(), 85);
    }
}

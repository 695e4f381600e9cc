//! Paint commands for the preview card.
//!
//! The closed command set is everything the rasterizer understands; the
//! tagged graphics from the surface resolve here to concrete fills, so no
//! markup or free-form drawing leaks in.

use crate::render::layout::{LayoutNode, NodeContent};
use crate::surface::{BadgeGraphic, BookmarkIcon, Color, Theme};
use crate::SurfaceSize;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        rgba: (u8, u8, u8, u8),
    },
    /// Greeked text: one glyph block per non-space character cell
    TextRun {
        x: i32,
        y: i32,
        text: String,
        scale: usize,
        rgba: (u8, u8, u8, u8),
    },
    /// An inlined data-URI image fitted to the box
    InlineImage {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        data_uri: String,
    },
}

/// Colors for one background theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color { r, g, b }
}

/// Resolve the closed theme set to its palette.
pub fn palette_for(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: rgb(0xff, 0xff, 0xff),
            foreground: rgb(0x0f, 0x14, 0x19),
            muted: rgb(0x53, 0x64, 0x71),
            border: rgb(0xcf, 0xd9, 0xde),
        },
        Theme::Dim => Palette {
            background: rgb(0x15, 0x20, 0x2b),
            foreground: rgb(0xf7, 0xf9, 0xf9),
            muted: rgb(0x8b, 0x98, 0xa5),
            border: rgb(0x38, 0x44, 0x4d),
        },
        Theme::Dark => Palette {
            background: rgb(0x00, 0x00, 0x00),
            foreground: rgb(0xe7, 0xe9, 0xea),
            muted: rgb(0x71, 0x76, 0x7b),
            border: rgb(0x2f, 0x33, 0x36),
        },
    }
}

/// Fixed fill for each badge graphic.
pub fn badge_fill(graphic: BadgeGraphic) -> Color {
    match graphic {
        BadgeGraphic::Blue => rgb(0x1d, 0xa1, 0xf2),
        BadgeGraphic::Grey => rgb(0x82, 0x9a, 0xab),
        BadgeGraphic::Gold => rgb(0xe2, 0xb7, 0x19),
    }
}

fn opaque(color: Color) -> (u8, u8, u8, u8) {
    (color.r, color.g, color.b, 255)
}

/// Resolve laid-out nodes into paint commands for the given theme.
///
/// The first command is always the card background; selecting a different
/// theme swaps that fill and the text colors in one place.
pub fn paint_surface(nodes: &[LayoutNode], theme: Theme, size: SurfaceSize) -> Vec<PaintCommand> {
    let palette = palette_for(theme);
    let mut commands = Vec::with_capacity(nodes.len() + 1);

    commands.push(PaintCommand::SolidRect {
        x: 0,
        y: 0,
        width: size.width,
        height: size.height,
        rgba: opaque(palette.background),
    });

    for node in nodes {
        let rect = &node.lb.rect;
        match &node.content {
            NodeContent::Avatar { data_uri } => match data_uri {
                Some(uri) => commands.push(PaintCommand::InlineImage {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    data_uri: uri.clone(),
                }),
                None => commands.push(PaintCommand::SolidRect {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    rgba: opaque(palette.border),
                }),
            },
            NodeContent::Text {
                text,
                scale,
                tint,
                muted,
            } => {
                let color =
                    (*tint).unwrap_or(if *muted { palette.muted } else { palette.foreground });
                commands.push(PaintCommand::TextRun {
                    x: rect.x,
                    y: rect.y,
                    text: text.clone(),
                    scale: *scale,
                    rgba: opaque(color),
                });
            }
            NodeContent::Badge { graphic } => commands.push(PaintCommand::SolidRect {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                rgba: opaque(badge_fill(*graphic)),
            }),
            NodeContent::Attachment { data_uri } => commands.push(PaintCommand::InlineImage {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                data_uri: data_uri.clone(),
            }),
            NodeContent::BookmarkMark { icon, tint } => {
                let color = match (icon, tint) {
                    (_, Some(tint)) => *tint,
                    (BookmarkIcon::Filled, None) => palette.foreground,
                    (BookmarkIcon::Outline, None) => palette.muted,
                };
                commands.push(PaintCommand::SolidRect {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    rgba: opaque(color),
                });
            }
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::layout_surface;
    use crate::surface::PreviewSurface;

    #[test]
    fn first_command_is_the_theme_background() {
        let surface = PreviewSurface::new();
        let size = SurfaceSize::default();
        let nodes = layout_surface(&surface, size);

        for (theme, expected) in [
            (Theme::Light, (0xff, 0xff, 0xff, 0xff)),
            (Theme::Dim, (0x15, 0x20, 0x2b, 0xff)),
            (Theme::Dark, (0x00, 0x00, 0x00, 0xff)),
        ] {
            let commands = paint_surface(&nodes, theme, size);
            match &commands[0] {
                PaintCommand::SolidRect {
                    x: 0,
                    y: 0,
                    width,
                    height,
                    rgba,
                } => {
                    assert_eq!(*width, size.width);
                    assert_eq!(*height, size.height);
                    assert_eq!(*rgba, expected);
                }
                other => panic!("expected background rect, got {:?}", other),
            }
        }
    }

    #[test]
    fn badge_fills_are_fixed_per_graphic() {
        assert_eq!(badge_fill(BadgeGraphic::Blue), rgb(0x1d, 0xa1, 0xf2));
        assert_eq!(badge_fill(BadgeGraphic::Grey), rgb(0x82, 0x9a, 0xab));
        assert_eq!(badge_fill(BadgeGraphic::Gold), rgb(0xe2, 0xb7, 0x19));
    }

    #[test]
    fn tinted_text_overrides_the_palette() {
        let surface = PreviewSurface {
            bookmarks: "9".to_string(),
            bookmark: crate::surface::BookmarkSlot {
                icon: crate::surface::BookmarkIcon::Filled,
                icon_tint: Some(crate::surface::BOOKMARK_ACCENT),
                count_tint: Some(crate::surface::BOOKMARK_ACCENT),
                container_tint: Some(crate::surface::BOOKMARK_ACCENT),
            },
            ..Default::default()
        };
        let size = SurfaceSize::default();
        let commands = paint_surface(&layout_surface(&surface, size), surface.theme, size);

        let accent = (0x1d, 0x9b, 0xf0, 0xff);
        let tinted = commands.iter().any(|c| match c {
            PaintCommand::TextRun { text, rgba, .. } => {
                text.contains("Bookmarks") && *rgba == accent
            }
            _ => false,
        });
        assert!(tinted);
    }
}

//! Tile captions.
//!
//! Each filled cell gets a translucent strip along its bottom edge with
//! "Artist - Title. (playcount)" in white. Geometry is given for a
//! 300x300 cell and scaled to the actual cell size.

use image::Rgb;
use rusttype::{point, Font, Scale};

use crate::error::{CollageError, Result};
use crate::layout::Collage;
use crate::models::Entity;

static FONT_BYTES: &[u8] = include_bytes!("../assets/fonts/DejaVuSansMono.ttf");

const REFERENCE_CELL: f32 = 300.0;
const FONT_SIZE: f32 = 15.0;
const STRIP_TOP: f32 = 235.0;
const TEXT_TOP: f32 = 240.0;
const TEXT_LEFT: f32 = 8.0;
const WRAP_WIDTH: f32 = 275.0;

/// Opacity of the strip behind the caption (out of 255).
const STRIP_ALPHA: f32 = 123.0;
const STRIP_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Caption for an entity, optionally with its playcount.
pub fn caption_text(entity: &Entity, show_playcount: bool) -> String {
    if show_playcount {
        format!("{}. ({})", entity.title(), entity.playcount)
    } else {
        entity.title()
    }
}

/// Draws captions with the bundled DejaVu Sans Mono font.
pub struct CaptionRenderer {
    font: Font<'static>,
}

impl CaptionRenderer {
    pub fn new() -> Result<Self> {
        let font = Font::try_from_bytes(FONT_BYTES)
            .ok_or_else(|| CollageError::Font("Failed to parse DejaVu Sans Mono".to_string()))?;
        Ok(Self { font })
    }

    fn text_width(&self, text: &str, scale: Scale) -> f32 {
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Break `text` into lines no wider than `max_width`, character by
    /// character.
    pub fn wrap(&self, text: &str, scale: Scale, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        for c in text.chars() {
            current.push(c);
            if self.text_width(&current, scale) >= max_width {
                lines.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Draw `text` over the cell at `(row, col)`. Nothing leaves the cell.
    pub fn draw(&self, collage: &mut Collage, row: u32, col: u32, text: &str) {
        let cell = collage.cell_size();
        let (x0, y0) = collage.cell_origin(row, col);
        let sx = cell.width as f32 / REFERENCE_CELL;
        let sy = cell.height as f32 / REFERENCE_CELL;
        let (x1, y1) = (x0 + cell.width, y0 + cell.height);

        let image = collage.image_mut();

        let strip_top = y0 + (STRIP_TOP * sy) as u32;
        for y in strip_top..y1 {
            for x in x0..x1 {
                blend(image.get_pixel_mut(x, y), STRIP_COLOR, STRIP_ALPHA / 255.0);
            }
        }

        let scale = Scale::uniform(FONT_SIZE * sy);
        let v_metrics = self.font.v_metrics(scale);
        let line_height = v_metrics.ascent - v_metrics.descent + v_metrics.line_gap;
        let left = x0 as f32 + TEXT_LEFT * sx;
        let top = y0 as f32 + TEXT_TOP * sy;

        for (i, line) in self.wrap(text, scale, WRAP_WIDTH * sx).iter().enumerate() {
            let baseline = top + v_metrics.ascent + line_height * i as f32;
            for glyph in self.font.layout(line, scale, point(left, baseline)) {
                let Some(bb) = glyph.pixel_bounding_box() else {
                    continue;
                };
                glyph.draw(|gx, gy, coverage| {
                    let px = bb.min.x + gx as i32;
                    let py = bb.min.y + gy as i32;
                    let inside = px >= x0 as i32
                        && py >= y0 as i32
                        && px < x1 as i32
                        && py < y1 as i32;
                    if inside {
                        blend(image.get_pixel_mut(px as u32, py as u32), TEXT_COLOR, coverage);
                    }
                });
            }
        }
    }
}

fn blend(base: &mut Rgb<u8>, color: Rgb<u8>, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let inv_alpha = 1.0 - alpha;
    for idx in 0..3 {
        base[idx] = (color[idx] as f32 * alpha + base[idx] as f32 * inv_alpha)
            .round()
            .clamp(0.0, 255.0) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout;
    use crate::models::{CellSize, EntityKind, GridSpec};
    use image::{DynamicImage, RgbImage};

    fn album() -> Entity {
        Entity {
            kind: EntityKind::Album,
            name: "Mezzanine".to_string(),
            artist: Some("Massive Attack".to_string()),
            image_url: None,
            rank: 1,
            playcount: 31,
        }
    }

    #[test]
    fn test_caption_text() {
        assert_eq!(caption_text(&album(), true), "Massive Attack - Mezzanine. (31)");
        assert_eq!(caption_text(&album(), false), "Massive Attack - Mezzanine");
    }

    #[test]
    fn test_wrap_splits_long_titles() {
        let renderer = CaptionRenderer::new().unwrap();
        let scale = Scale::uniform(FONT_SIZE);
        let text = "A very long artist name - An even longer album title. (1234)";

        let lines = renderer.wrap(text, scale, WRAP_WIDTH);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), text);

        let short = renderer.wrap("Short", scale, WRAP_WIDTH);
        assert_eq!(short, vec!["Short".to_string()]);
    }

    #[test]
    fn test_draw_darkens_strip_and_writes_text() {
        let grey = [120, 120, 120];
        let tile = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb(grey)));
        let grid = GridSpec::new(1, 2).unwrap();
        let mut collage = layout::compose(&[tile.clone(), tile], grid, CellSize::default());

        let renderer = CaptionRenderer::new().unwrap();
        renderer.draw(&mut collage, 0, 0, &caption_text(&album(), true));
        let img = collage.image();

        // Above the strip: untouched.
        assert_eq!(*img.get_pixel(150, 100), Rgb(grey));
        // Strip corner: darkened, no text.
        let dark = (120.0 * (1.0 - STRIP_ALPHA / 255.0)).round() as u8;
        assert_eq!(*img.get_pixel(299, 299), Rgb([dark, dark, dark]));
        // Some text pixels are brighter than the untouched tile.
        let lit = (0..300)
            .flat_map(|x| (240..260).map(move |y| (x, y)))
            .any(|(x, y)| img.get_pixel(x, y)[0] > 200);
        assert!(lit);
        // The neighbouring cell is not captioned.
        assert_eq!(*img.get_pixel(450, 299), Rgb(grey));
    }
}

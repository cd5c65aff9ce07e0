//! Text rendering for the overlay: a built-in 5x7 bitmap face or a TrueType file.

use crate::{ImageError, Result};
use image::Rgba;
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size, Canvas};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use std::fmt;
use std::path::Path;

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

/// Rows of a 5x7 glyph, most significant of the low five bits on the left.
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'm' => [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '/' => [0b00000, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '°' => [0b01100, 0b10010, 0b10010, 0b01100, 0b00000, 0b00000, 0b00000],
        '±' => [0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000, 0b11111],
        ' ' => [0; 7],
        _ => return None,
    };
    Some(rows)
}

/// Face used to draw overlay text.
#[derive(Clone, Default)]
pub enum OverlayFont {
    /// Built-in block face; always available
    #[default]
    Bitmap,
    /// TrueType face loaded at runtime
    TrueType(Font<'static>),
}

impl fmt::Debug for OverlayFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayFont::Bitmap => f.write_str("Bitmap"),
            OverlayFont::TrueType(_) => f.write_str("TrueType"),
        }
    }
}

impl OverlayFont {
    /// Loads a `.ttf`/`.otf` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Parses TrueType data.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Font::try_from_vec(data)
            .map(OverlayFont::TrueType)
            .ok_or_else(|| ImageError::Font("not a TrueType/OpenType font".into()))
    }

    /// Bitmap block size for a target line height.
    fn pixel_scale(line_height: u32) -> u32 {
        (line_height / GLYPH_HEIGHT).max(1)
    }

    /// Width and height of `text` drawn at `line_height`.
    pub fn measure(&self, text: &str, line_height: u32) -> (u32, u32) {
        match self {
            OverlayFont::Bitmap => {
                let scale = Self::pixel_scale(line_height);
                let chars = text.chars().count() as u32;
                let width = (chars * GLYPH_ADVANCE).saturating_sub(1) * scale;
                (width, GLYPH_HEIGHT * scale)
            }
            OverlayFont::TrueType(font) => {
                let (w, h) = text_size(Scale::uniform(line_height as f32), font, text);
                (w.max(0) as u32, h.max(0) as u32)
            }
        }
    }

    /// Draws `text` with its top-left corner at `(x, y)`.
    pub fn draw<C>(&self, canvas: &mut C, x: i32, y: i32, line_height: u32, color: Rgba<u8>, text: &str)
    where
        C: Canvas<Pixel = Rgba<u8>>,
    {
        match self {
            OverlayFont::Bitmap => {
                let scale = Self::pixel_scale(line_height);
                let mut cursor = x;
                for c in text.chars() {
                    if let Some(rows) = glyph(c) {
                        draw_glyph(canvas, cursor, y, scale, color, &rows);
                    }
                    cursor += (GLYPH_ADVANCE * scale) as i32;
                }
            }
            OverlayFont::TrueType(font) => {
                draw_text_mut(canvas, color, x, y, Scale::uniform(line_height as f32), font, text);
            }
        }
    }
}

fn draw_glyph<C>(canvas: &mut C, x: i32, y: i32, scale: u32, color: Rgba<u8>, rows: &[u8; 7])
where
    C: Canvas<Pixel = Rgba<u8>>,
{
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                let px = x + (col * scale) as i32;
                let py = y + (row as u32 * scale) as i32;
                draw_filled_rect_mut(canvas, Rect::at(px, py).of_size(scale, scale), color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_overlay_charset_covered() {
        for c in "0123456789 NSEW°.,-+:/()±m".chars() {
            assert!(glyph(c).is_some(), "missing glyph {:?}", c);
        }
        assert!(glyph('Z').is_none());
    }

    #[test]
    fn test_bitmap_measure() {
        let font = OverlayFont::Bitmap;
        assert_eq!(font.measure("12", 14), (22, 14));
        assert_eq!(font.measure("", 14), (0, 14));
        // line heights below one glyph still draw at scale 1
        assert_eq!(font.measure("N", 3), (5, 7));
    }

    #[test]
    fn test_bitmap_draw_marks_pixels() {
        let mut img = RgbaImage::new(20, 10);
        let white = Rgba([255, 255, 255, 255]);
        OverlayFont::Bitmap.draw(&mut img, 1, 1, 7, white, "1");
        // centre column of the "1" stem
        assert_eq!(*img.get_pixel(3, 4), white);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_rejects_non_font_bytes() {
        assert!(matches!(OverlayFont::from_bytes(vec![1, 2, 3]), Err(ImageError::Font(_))));
    }
}

//! North indicator glyph.

use super::OverlayFont;
use image::Rgba;
use imageproc::drawing::{draw_polygon_mut, Canvas};
use imageproc::point::Point;

/// Arrow outline pointing up, in units of the glyph radius.
const ARROW: [(f32, f32); 4] = [(0.0, -1.0), (0.55, 0.8), (0.0, 0.4), (-0.55, 0.8)];

/// Arrow vertices around `(cx, cy)` turned so the tip points at north.
///
/// `heading` is the camera direction in degrees clockwise from north, so the
/// arrow is turned by its negation.
pub(crate) fn arrow_points(cx: f32, cy: f32, radius: f32, heading: Option<f64>) -> Vec<Point<i32>> {
    let theta = -(heading.unwrap_or(0.0) as f32).to_radians();
    let (sin, cos) = theta.sin_cos();

    let mut points: Vec<Point<i32>> = ARROW
        .iter()
        .map(|&(x, y)| {
            let rx = x * cos - y * sin;
            let ry = x * sin + y * cos;
            Point::new((cx + rx * radius).round() as i32, (cy + ry * radius).round() as i32)
        })
        .collect();
    points.dedup();
    points
}

/// Draws the arrow with an "N" label above it into a `size`-pixel box at `(x, y)`.
pub(crate) fn draw_compass<C>(
    canvas: &mut C,
    x: i32,
    y: i32,
    size: u32,
    heading: Option<f64>,
    font: &OverlayFont,
    color: Rgba<u8>,
) where
    C: Canvas<Pixel = Rgba<u8>>,
{
    let label_height = (size / 3).max(7);
    let (label_width, _) = font.measure("N", label_height);
    font.draw(canvas, x + (size as i32 - label_width as i32) / 2, y, label_height, color, "N");

    let arrow_box = size.saturating_sub(label_height) as f32;
    let radius = arrow_box / 2.0 * 0.9;
    if radius < 2.0 {
        return;
    }
    let cx = x as f32 + size as f32 / 2.0;
    let cy = (y + label_height as i32) as f32 + arrow_box / 2.0;

    let points = arrow_points(cx, cy, radius, heading);
    // draw_polygon_mut rejects closed or degenerate outlines
    if points.len() >= 3 && points.first() != points.last() {
        draw_polygon_mut(canvas, &points, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_points_up_without_heading() {
        let points = arrow_points(50.0, 50.0, 10.0, None);
        assert_eq!(points[0], Point::new(50, 40));
    }

    #[test]
    fn test_arrow_turns_against_heading() {
        // facing east: north is to the left
        let points = arrow_points(50.0, 50.0, 10.0, Some(90.0));
        assert_eq!(points[0], Point::new(40, 50));

        let south = arrow_points(50.0, 50.0, 10.0, Some(180.0));
        assert_eq!(south[0], Point::new(50, 60));
    }
}

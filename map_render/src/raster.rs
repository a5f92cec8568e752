//! Pixel-level drawing primitives.
//!
//! Shapes are painted by predicate over a bounding box around the centre;
//! pixels outside the image are clipped. Hatched fills stripe diagonally in
//! absolute image coordinates so adjacent glyphs hatch in phase.

use image::{Rgb, RgbImage};

const SQRT_3: f64 = 1.732_050_807_568_877_2;
const SQRT_3_HALF: f64 = 0.866_025_403_784_438_6;

fn paint(
    image: &mut RgbImage,
    cx: i32,
    cy: i32,
    extent: i32,
    color: Rgb<u8>,
    inside: impl Fn(f64, f64) -> bool,
) {
    for dy in -extent..=extent {
        let py = cy + dy;
        if py < 0 || py >= image.height() as i32 {
            continue;
        }
        for dx in -extent..=extent {
            let px = cx + dx;
            if px < 0 || px >= image.width() as i32 {
                continue;
            }
            if inside(f64::from(dx), f64::from(dy)) {
                image.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

fn paint_hatched(
    image: &mut RgbImage,
    cx: i32,
    cy: i32,
    extent: i32,
    stroke: i32,
    color: Rgb<u8>,
    inside: impl Fn(f64, f64) -> bool,
) {
    let stroke = stroke.max(1);
    let period = stroke * 2;
    for dy in -extent..=extent {
        let py = cy + dy;
        if py < 0 || py >= image.height() as i32 {
            continue;
        }
        for dx in -extent..=extent {
            let px = cx + dx;
            if px < 0 || px >= image.width() as i32 {
                continue;
            }
            if inside(f64::from(dx), f64::from(dy)) && (px + py).rem_euclid(period) < stroke {
                image.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

fn in_circle(dx: f64, dy: f64, radius: f64) -> bool {
    dx * dx + dy * dy <= radius * radius
}

fn in_square(dx: f64, dy: f64, half: f64) -> bool {
    dx.abs() <= half && dy.abs() <= half
}

/// Pointy-top regular hexagon with circumradius `radius`.
fn in_hexagon(dx: f64, dy: f64, radius: f64) -> bool {
    let x = dx.abs();
    let y = dy.abs();
    x <= SQRT_3_HALF * radius && y <= radius - x / SQRT_3
}

pub(crate) fn fill_circle(image: &mut RgbImage, cx: i32, cy: i32, radius: f64, color: Rgb<u8>) {
    paint(image, cx, cy, radius.ceil() as i32, color, |dx, dy| {
        in_circle(dx, dy, radius)
    });
}

pub(crate) fn ring(
    image: &mut RgbImage,
    cx: i32,
    cy: i32,
    radius: f64,
    stroke: f64,
    color: Rgb<u8>,
) {
    let inner = (radius - stroke).max(0.0);
    paint(image, cx, cy, radius.ceil() as i32, color, |dx, dy| {
        in_circle(dx, dy, radius) && !in_circle(dx, dy, inner)
    });
}

pub(crate) fn square_outline(
    image: &mut RgbImage,
    cx: i32,
    cy: i32,
    half: f64,
    stroke: f64,
    color: Rgb<u8>,
) {
    let inner = (half - stroke).max(0.0);
    paint(image, cx, cy, half.ceil() as i32, color, |dx, dy| {
        in_square(dx, dy, half) && !in_square(dx, dy, inner)
    });
}

pub(crate) fn hexagon_outline(
    image: &mut RgbImage,
    cx: i32,
    cy: i32,
    radius: f64,
    stroke: f64,
    color: Rgb<u8>,
) {
    let inner = (radius - stroke).max(0.0);
    paint(image, cx, cy, radius.ceil() as i32, color, |dx, dy| {
        in_hexagon(dx, dy, radius) && !in_hexagon(dx, dy, inner)
    });
}

pub(crate) fn fill_circle_hatched(
    image: &mut RgbImage,
    cx: i32,
    cy: i32,
    radius: f64,
    stroke: i32,
    color: Rgb<u8>,
) {
    paint_hatched(image, cx, cy, radius.ceil() as i32, stroke, color, |dx, dy| {
        in_circle(dx, dy, radius)
    });
}

pub(crate) fn fill_square_hatched(
    image: &mut RgbImage,
    cx: i32,
    cy: i32,
    half: f64,
    stroke: i32,
    color: Rgb<u8>,
) {
    paint_hatched(image, cx, cy, half.ceil() as i32, stroke, color, |dx, dy| {
        in_square(dx, dy, half)
    });
}

pub(crate) fn fill_hexagon_hatched(
    image: &mut RgbImage,
    cx: i32,
    cy: i32,
    radius: f64,
    stroke: i32,
    color: Rgb<u8>,
) {
    paint_hatched(image, cx, cy, radius.ceil() as i32, stroke, color, |dx, dy| {
        in_hexagon(dx, dy, radius)
    });
}

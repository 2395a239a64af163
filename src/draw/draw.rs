use crate::draw::image::ImageViewMut;

/// Draws the outline of a center-form box given in normalized
/// coordinates. Degenerate boxes are a no-op; edges falling outside the
/// image are clipped pixel by pixel.
pub fn draw_box(
    img: &mut ImageViewMut,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    color: &[f32; 3],
    thickness: i32,
) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    let thickness = thickness.max(1);
    let left = ((x - width / 2.0) * img.width as f32) as i32;
    let right = ((x + width / 2.0) * img.width as f32) as i32;
    let top = ((y - height / 2.0) * img.height as f32) as i32;
    let bottom = ((y + height / 2.0) * img.height as f32) as i32;

    for t in 0..thickness {
        for px in left..=right {
            img.put_pixel(px, top + t, color);
            img.put_pixel(px, bottom - t, color);
        }
        for py in top..=bottom {
            img.put_pixel(left + t, py, color);
            img.put_pixel(right - t, py, color);
        }
    }
}

/// Draws a straight segment between two normalized points by stepping
/// along the longer axis. A zero-length segment paints a single spot.
pub fn draw_line(
    img: &mut ImageViewMut,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    color: &[f32; 3],
    thickness: i32,
) {
    let thickness = thickness.max(1);
    let start_x = x1 * img.width as f32;
    let start_y = y1 * img.height as f32;
    let delta_x = x2 * img.width as f32 - start_x;
    let delta_y = y2 * img.height as f32 - start_y;

    let steps = f32::max(delta_x.abs(), delta_y.abs()) as i32;
    if steps == 0 {
        paint_spot(img, start_x as i32, start_y as i32, color, thickness);
        return;
    }
    for i in 0..=steps {
        let f = i as f32 / steps as f32;
        let px = (start_x + delta_x * f) as i32;
        let py = (start_y + delta_y * f) as i32;
        paint_spot(img, px, py, color, thickness);
    }
}

fn paint_spot(img: &mut ImageViewMut, x: i32, y: i32, color: &[f32; 3], thickness: i32) {
    let radius = thickness / 2;
    for oy in -radius..=(thickness - 1 - radius) {
        for ox in -radius..=(thickness - 1 - radius) {
            img.put_pixel(x + ox, y + oy, color);
        }
    }
}

/// Axis-aligned bounding box in center form. All attributes are
/// normalized to [0, 1] relative to the image dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        BoundingBox {
            x,
            y,
            width,
            height,
        }
    }
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
    // Corner form: left, top, right, bottom
    fn corners(&self) -> (f32, f32, f32, f32) {
        (
            self.x - self.width / 2.0,
            self.y - self.height / 2.0,
            self.x + self.width / 2.0,
            self.y + self.height / 2.0,
        )
    }
    /// Intersection over union with another box.
    /// Returns 0 when the boxes do not overlap or the union is degenerate.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let (l1, t1, r1, b1) = self.corners();
        let (l2, t2, r2, b2) = other.corners();

        let inter_width = f32::min(r1, r2) - f32::max(l1, l2);
        let inter_height = f32::min(b1, b2) - f32::max(t1, t2);
        if inter_width <= 0.0 || inter_height <= 0.0 {
            return 0.0;
        }
        let intersection = inter_width * inter_height;
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }
}

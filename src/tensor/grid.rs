use crate::tensor::sample::Sample;

/// Row index of the box center x attribute.
pub const ROW_CENTER_X: usize = 0;
/// Row index of the box center y attribute.
pub const ROW_CENTER_Y: usize = 1;
/// Row index of the box width attribute.
pub const ROW_WIDTH: usize = 2;
/// Row index of the box height attribute.
pub const ROW_HEIGHT: usize = 3;
/// First per-class confidence row. Class k lives at row 4 + k.
pub const ROW_FIRST_CLASS: usize = 4;

/// Read-only view over a dense detection tensor with `max_detections`
/// columns. Element (row r, column d) lives at offset
/// r * max_detections + d. This is the only addressing rule; the layout
/// is never reshaped, transposed or re-strided.
pub struct DetectionGrid<'a, S> {
    data: &'a [S],
    max_detections: usize,
}

impl<'a, S: Sample> DetectionGrid<'a, S> {
    pub fn new(data: &'a [S], max_detections: usize) -> Self {
        DetectionGrid {
            data,
            max_detections,
        }
    }
    pub fn value(&self, row: usize, col: usize) -> S {
        self.data[row * self.max_detections + col]
    }
    pub fn value_f32(&self, row: usize, col: usize) -> f32 {
        self.value(row, col).to_f32()
    }
}

/// Mutable counterpart of [`DetectionGrid`], used for tracker output.
pub struct DetectionGridMut<'a, S> {
    data: &'a mut [S],
    max_detections: usize,
}

impl<'a, S: Sample> DetectionGridMut<'a, S> {
    pub fn new(data: &'a mut [S], max_detections: usize) -> Self {
        DetectionGridMut {
            data,
            max_detections,
        }
    }
    pub fn set(&mut self, row: usize, col: usize, value: S) {
        self.data[row * self.max_detections + col] = value;
    }
    pub fn set_f32(&mut self, row: usize, col: usize, value: f32) {
        self.set(row, col, S::from_f32(value));
    }
    /// Fills the whole tensor with the empty-cell sentinel.
    pub fn fill_empty(&mut self) {
        self.data.fill(S::EMPTY);
    }
}

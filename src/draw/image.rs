/// Mutable view over a dense H x W x C row-major float image.
/// Pixel (x, y) channel c lives at offset (y * width + x) * channels + c.
pub struct ImageViewMut<'a> {
    data: &'a mut [f32],
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

impl<'a> ImageViewMut<'a> {
    pub fn new(data: &'a mut [f32], width: usize, height: usize, channels: usize) -> Self {
        ImageViewMut {
            data,
            width,
            height,
            channels,
        }
    }
    /// Writes a color into one pixel. Coordinates outside the image are
    /// ignored, so callers never clip themselves. Images with more than
    /// three channels keep their extra channels untouched.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: &[f32; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let base = (y as usize * self.width + x as usize) * self.channels;
        for c in 0..usize::min(self.channels, 3) {
            self.data[base + c] = color[c];
        }
    }
    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let base = (y * self.width + x) * self.channels;
        &self.data[base..base + self.channels]
    }
}

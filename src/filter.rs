/// Debounces raw per-frame classifier outputs. A class must win the
/// confidence argmax for a run of consecutive frames before it is
/// reported; until then the output stays on the "no prediction" class.
/// Confidences below the threshold reset the run immediately.
pub struct ConsecutiveDetectionFilter {
    confidence_threshold: f32,
    min_consecutive_count: u32,
    default_class_index: usize,
    detect_count: u32,
    last_detected_class: i32,
}

impl ConsecutiveDetectionFilter {
    pub fn new(
        confidence_threshold: f32,
        min_consecutive_count: u32,
        default_class_index: usize,
    ) -> Self {
        ConsecutiveDetectionFilter {
            confidence_threshold,
            min_consecutive_count,
            default_class_index,
            detect_count: 0,
            last_detected_class: -1,
        }
    }
    /// Returns the filter to its freshly initialized state.
    pub fn reset(&mut self) {
        self.detect_count = 0;
        self.last_detected_class = -1;
    }

    /// Consumes one frame of per-class confidences and writes the
    /// one-hot activation of either the confirmed class or the default
    /// class. `input` and `output` must have the same length.
    pub fn process_frame(&mut self, input: &[f32], output: &mut [f32]) {
        let num_classes = input.len();
        if num_classes == 0 {
            return;
        }
        let mut max_confidence = input[0];
        let mut max_class = 0usize;
        for (class, &confidence) in input.iter().enumerate().skip(1) {
            if confidence > max_confidence {
                max_confidence = confidence;
                max_class = class;
            }
        }
        // Below the threshold the frame votes for "no prediction"
        if max_confidence < self.confidence_threshold {
            max_class = self.default_class_index;
        }

        if max_class as i32 != self.last_detected_class {
            self.detect_count = 1;
        } else {
            self.detect_count += 1;
        }
        self.last_detected_class = max_class as i32;

        let confirmed = self.detect_count >= self.min_consecutive_count
            && max_class != self.default_class_index;
        let emitted = if confirmed {
            max_class
        } else {
            self.default_class_index
        };
        for (class, value) in output.iter_mut().enumerate().take(num_classes) {
            *value = if class == emitted { 1.0 } else { 0.0 };
        }
    }
}

/// A pose landmark in normalized image coordinates
///
/// `x` and `y` are fractions of the image width/height in [0, 1], as reported
/// by the pose model. `visibility` is the model's confidence that the landmark
/// is correctly located, in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub visibility: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }

    /// Checks whether the landmark meets the visibility threshold (inclusive)
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility >= threshold
    }

    /// Converts the normalized x coordinate to a pixel column
    pub fn pixel_x(&self, frame_width: u32) -> i64 {
        (self.x * frame_width as f32) as i64
    }

    /// Converts the normalized y coordinate to a pixel row
    pub fn pixel_y(&self, frame_height: u32) -> i64 {
        (self.y * frame_height as f32) as i64
    }
}

/// The pair of shoulder landmarks a crop is computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShoulderPair {
    pub left: Keypoint,
    pub right: Keypoint,
}

impl ShoulderPair {
    pub fn new(left: Keypoint, right: Keypoint) -> Self {
        Self { left, right }
    }

    /// Checks whether both shoulders meet the visibility threshold
    ///
    /// A visibility exactly equal to the threshold passes; callers treat a
    /// failed gate as a skip condition, not an error.
    pub fn passes_gate(&self, threshold: f32) -> bool {
        self.left.is_visible(threshold) && self.right.is_visible(threshold)
    }

    /// The smaller of the two shoulder visibilities
    pub fn min_visibility(&self) -> f32 {
        self.left.visibility.min(self.right.visibility)
    }

    /// The shoulder x coordinates in pixels, ordered left-to-right in image space
    ///
    /// The detector labels shoulders anatomically, so the "left" shoulder can
    /// sit to the right of the "right" one in the image. Boundary math wants
    /// image order.
    pub fn pixel_span(&self, frame_width: u32) -> (i64, i64) {
        let a = self.left.pixel_x(frame_width);
        let b = self.right.pixel_x(frame_width);
        (a.min(b), a.max(b))
    }

    /// The pixel distance between the two shoulders
    pub fn shoulder_width(&self, frame_width: u32) -> i64 {
        let (left_x, right_x) = self.pixel_span(frame_width);
        right_x - left_x
    }

    /// The pixel midpoint between the two shoulders
    pub fn center_x(&self, frame_width: u32) -> i64 {
        let (left_x, right_x) = self.pixel_span(frame_width);
        (left_x + right_x) / 2
    }
}

use crate::keypoint::ShoulderPair;

/// An axis-aligned pixel rectangle to retain from the source image
///
/// Invariant: `0 <= x_start < x_end <= frame width` and
/// `0 <= y_top < y_bottom <= frame height`. Every constructor in this module
/// clamps its coordinates so a rectangle never references pixels outside the
/// source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x_start: u32,
    pub y_top: u32,
    pub x_end: u32,
    pub y_bottom: u32,
}

impl CropRect {
    pub fn new(x_start: u32, y_top: u32, x_end: u32, y_bottom: u32) -> Self {
        Self {
            x_start,
            y_top,
            x_end,
            y_bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.x_end - self.x_start
    }

    pub fn height(&self) -> u32 {
        self.y_bottom - self.y_top
    }

    /// Checks the rectangle invariant against the frame dimensions
    pub fn is_valid_for(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x_start < self.x_end
            && self.x_end <= frame_width
            && self.y_top < self.y_bottom
            && self.y_bottom <= frame_height
    }
}

/// How the crop boundary is derived from the shoulder pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropPolicy {
    /// Symmetric margin around the detected shoulder span, full image height
    Margin { margin: u32 },
    /// Predefined output size centered on the shoulder midpoint
    Predefined { width: u32, height: u32, margin: u32 },
    /// Reuse the overall width derived from a goal frame; images whose raw
    /// dimensions already equal the goal output resolution pass through
    MatchReference {
        overall_width: u32,
        goal_width: u32,
        goal_height: u32,
    },
}

/// The boundary a policy produced for one image
#[derive(Debug, Clone, PartialEq)]
pub enum CropResult {
    /// A plain rectangle (margin and reference policies)
    Crop(CropRect),
    /// A rectangle plus the left/right margins actually achieved after
    /// clamping (predefined policy); these can be smaller than requested
    CropWithMargins {
        rect: CropRect,
        left_margin: i64,
        right_margin: i64,
    },
}

impl CropResult {
    pub fn rect(&self) -> &CropRect {
        match self {
            CropResult::Crop(rect) => rect,
            CropResult::CropWithMargins { rect, .. } => rect,
        }
    }
}

// Clamps a pixel coordinate into [0, max]
fn clamp_to(value: i64, max: u32) -> u32 {
    value.clamp(0, max as i64) as u32
}

/// Calculates the boundary for a fixed overall width (margin and reference policies)
///
/// The crop keeps the full image height. `x_start` places the overall width
/// symmetrically around the shoulder span; both edges are clamped to the
/// frame, so an overall width larger than the frame collapses to the full
/// frame width without error.
pub fn calculate_width_crop(
    frame_width: u32,
    frame_height: u32,
    pair: &ShoulderPair,
    overall_width: u32,
) -> CropRect {
    let (left_x, right_x) = pair.pixel_span(frame_width);
    let shoulder_width = right_x - left_x;
    // A zero-width pair with a zero margin would produce an empty rectangle
    let overall = (overall_width as i64).max(1);

    // Keep at least one column available for the right edge
    let x_start = clamp_to(
        left_x - (overall - shoulder_width) / 2,
        frame_width.saturating_sub(1),
    );
    let x_end = clamp_to(x_start as i64 + overall, frame_width);

    CropRect::new(x_start, 0, x_end, frame_height)
}

/// Calculates the overall width for the margin policy
pub fn overall_width_with_margin(frame_width: u32, pair: &ShoulderPair, margin: u32) -> u32 {
    let width = pair.shoulder_width(frame_width) + 2 * margin as i64;
    width.max(1) as u32
}

/// Calculates the boundary for the margin policy
pub fn calculate_margin_crop(
    frame_width: u32,
    frame_height: u32,
    pair: &ShoulderPair,
    margin: u32,
) -> CropRect {
    let overall_width = overall_width_with_margin(frame_width, pair, margin);
    calculate_width_crop(frame_width, frame_height, pair, overall_width)
}

/// Calculates the boundary for the predefined policy
///
/// The overall width is the larger of the predefined width and the shoulder
/// span plus twice the margin, centered on the shoulder midpoint. The
/// vertical crop of the predefined height is centered on the image. Returns
/// the rectangle together with the left/right margins actually achieved,
/// which may be smaller than requested once the edges are clamped.
pub fn calculate_predefined_crop(
    frame_width: u32,
    frame_height: u32,
    pair: &ShoulderPair,
    predefined_width: u32,
    predefined_height: u32,
    margin: u32,
) -> (CropRect, i64, i64) {
    let (left_x, right_x) = pair.pixel_span(frame_width);
    let shoulder_width = right_x - left_x;

    let overall = (predefined_width as i64)
        .max(shoulder_width + 2 * margin as i64)
        .max(1);
    let center_x = (left_x + right_x) / 2;

    let x_start = clamp_to(center_x - overall / 2, frame_width.saturating_sub(1));
    let x_end = clamp_to(x_start as i64 + overall, frame_width);

    let predefined_height = (predefined_height as i64).max(1);
    let y_top = clamp_to(
        (frame_height as i64 - predefined_height) / 2,
        frame_height.saturating_sub(1),
    );
    let y_bottom = clamp_to(y_top as i64 + predefined_height, frame_height);

    let rect = CropRect::new(x_start, y_top, x_end, y_bottom);
    let left_margin = left_x - x_start as i64;
    let right_margin = x_end as i64 - right_x;
    (rect, left_margin, right_margin)
}

/// Calculates the crop boundary for a gated shoulder pair under the given policy
///
/// The caller is responsible for the confidence gate and, for the reference
/// policy, for the goal-resolution passthrough check, both of which happen
/// before any boundary math.
pub fn calculate_crop(
    policy: &CropPolicy,
    frame_width: u32,
    frame_height: u32,
    pair: &ShoulderPair,
) -> CropResult {
    match policy {
        CropPolicy::Margin { margin } => CropResult::Crop(calculate_margin_crop(
            frame_width,
            frame_height,
            pair,
            *margin,
        )),
        CropPolicy::Predefined {
            width,
            height,
            margin,
        } => {
            let (rect, left_margin, right_margin) = calculate_predefined_crop(
                frame_width,
                frame_height,
                pair,
                *width,
                *height,
                *margin,
            );
            CropResult::CropWithMargins {
                rect,
                left_margin,
                right_margin,
            }
        }
        CropPolicy::MatchReference { overall_width, .. } => CropResult::Crop(
            calculate_width_crop(frame_width, frame_height, pair, *overall_width),
        ),
    }
}

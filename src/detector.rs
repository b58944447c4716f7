use crate::keypoint::{Keypoint, ShoulderPair};
use anyhow::Result;
use usls::{Config, Image, Model, Runtime, models::YOLO};

/// COCO-17 keypoint index of the left shoulder
pub const LEFT_SHOULDER: usize = 5;
/// COCO-17 keypoint index of the right shoulder
pub const RIGHT_SHOULDER: usize = 6;

/// The pose-estimation boundary
///
/// The model behind this trait is an opaque collaborator: it maps an image to
/// an optional pair of shoulder landmarks. `None` means no usable pose was
/// found, which callers treat as a skip condition.
pub trait PoseDetector {
    fn detect(&mut self, image: &Image) -> Result<Option<ShoulderPair>>;
}

/// Pose detector backed by a YOLO pose model
pub struct YoloPoseDetector {
    model: Runtime<YOLO>,
}

impl YoloPoseDetector {
    pub fn new(config: Config) -> Result<Self> {
        let model = YOLO::new(config.commit()?)?;
        Ok(Self { model })
    }
}

impl PoseDetector for YoloPoseDetector {
    fn detect(&mut self, image: &Image) -> Result<Option<ShoulderPair>> {
        let ys = self.model.forward(std::slice::from_ref(image))?;
        let frame_width = image.width() as f32;
        let frame_height = image.height() as f32;

        let Some(y) = ys.iter().next() else {
            return Ok(None);
        };
        let persons = y.keypointss();

        // With several people in frame, keep the pair whose weaker shoulder
        // is the most confident
        let mut best: Option<ShoulderPair> = None;
        for keypoints in persons {
            if keypoints.len() <= RIGHT_SHOULDER {
                continue;
            }
            let pair = ShoulderPair::new(
                normalize_keypoint(&keypoints[LEFT_SHOULDER], frame_width, frame_height),
                normalize_keypoint(&keypoints[RIGHT_SHOULDER], frame_width, frame_height),
            );
            let is_better = match &best {
                None => true,
                Some(current) => pair.min_visibility() > current.min_visibility(),
            };
            if is_better {
                best = Some(pair);
            }
        }

        Ok(best)
    }
}

// Model keypoints arrive in pixel coordinates of the source image
fn normalize_keypoint(keypoint: &usls::Keypoint, frame_width: f32, frame_height: f32) -> Keypoint {
    Keypoint::new(
        keypoint.x() / frame_width,
        keypoint.y() / frame_height,
        keypoint.confidence().unwrap_or(0.0),
    )
}

use crate::crop::{self, CropPolicy, CropResult};
use crate::detector::PoseDetector;
use crate::image;
use crate::processor_utils;
use anyhow::{Context, Result};
use std::path::Path;

/// What happened to a single image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// A cropped image was written, with the written resolution
    Written { width: u32, height: u32 },
    /// The image already matched the goal resolution and was written unmodified
    Passthrough { width: u32, height: u32 },
    /// Shoulders were missing or below the confidence gate; nothing was written
    Skipped,
}

/// Width and output resolution derived from the goal frame (reference policy)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalFrame {
    pub overall_width: u32,
    pub width: u32,
    pub height: u32,
}

/// Crops images around detected shoulders, one image at a time
pub struct ShoulderCropper<D: PoseDetector> {
    detector: D,
    policy: CropPolicy,
    keypoint_threshold: f32,
}

impl<D: PoseDetector> ShoulderCropper<D> {
    pub fn new(detector: D, policy: CropPolicy, keypoint_threshold: f32) -> Self {
        Self {
            detector,
            policy,
            keypoint_threshold,
        }
    }

    /// Processes a single image: load, detect, gate, crop, save
    ///
    /// A load failure is an error. A detection miss is not: the image is
    /// skipped and the caller proceeds with the rest of the batch.
    pub fn process_image(&mut self, input: &Path, output: &Path) -> Result<ProcessOutcome> {
        let img = image::load_image(input)?;
        let frame_width = img.width();
        let frame_height = img.height();

        // An image already at the goal resolution is retained as-is, without
        // running the detector
        if let CropPolicy::MatchReference {
            goal_width,
            goal_height,
            ..
        } = self.policy
        {
            if frame_width == goal_width && frame_height == goal_height {
                let (width, height) = image::save_image(&img, output)?;
                return Ok(ProcessOutcome::Passthrough { width, height });
            }
        }

        let Some(pair) = self.detector.detect(&img)? else {
            return Ok(ProcessOutcome::Skipped);
        };
        if !pair.passes_gate(self.keypoint_threshold) {
            processor_utils::debug_println(format_args!(
                "shoulder visibility {:.3} below threshold {:.3} for {}",
                pair.min_visibility(),
                self.keypoint_threshold,
                input.display()
            ));
            return Ok(ProcessOutcome::Skipped);
        }

        let result = crop::calculate_crop(&self.policy, frame_width, frame_height, &pair);
        if let CropResult::CropWithMargins {
            left_margin,
            right_margin,
            ..
        } = &result
        {
            if let CropPolicy::Predefined { margin, .. } = self.policy {
                let requested = margin as i64;
                if *left_margin < requested || *right_margin < requested {
                    processor_utils::debug_println(format_args!(
                        "clamping reduced margins for {}: left {}px, right {}px (requested {}px)",
                        input.display(),
                        left_margin,
                        right_margin,
                        requested
                    ));
                }
            }
        }

        let cropped = image::crop_to_rect(&img, result.rect())?;
        let (width, height) = image::save_image(&cropped, output)?;
        Ok(ProcessOutcome::Written { width, height })
    }
}

/// Derives the overall width and output resolution from the goal frame
///
/// The goal frame is cropped through the margin policy and written next to
/// the other outputs. Missing shoulders here are fatal: without the goal
/// width the rest of the batch cannot be processed.
pub fn process_goal_frame<D: PoseDetector>(
    detector: &mut D,
    input: &Path,
    output: &Path,
    margin: u32,
    keypoint_threshold: f32,
) -> Result<GoalFrame> {
    let img = image::load_image(input)?;
    let frame_width = img.width();
    let frame_height = img.height();

    let pair = detector
        .detect(&img)?
        .filter(|pair| pair.passes_gate(keypoint_threshold))
        .with_context(|| format!("no shoulder landmarks detected in goal frame {}", input.display()))?;

    let overall_width = crop::overall_width_with_margin(frame_width, &pair, margin);
    let rect = crop::calculate_width_crop(frame_width, frame_height, &pair, overall_width);
    let cropped = image::crop_to_rect(&img, &rect)?;
    let (width, height) = image::save_image(&cropped, output)?;

    Ok(GoalFrame {
        overall_width,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::{Keypoint, ShoulderPair};
    use ::image::RgbImage;
    use std::fs;
    use std::path::PathBuf;

    /// Detector stub that returns a fixed pair without running a model
    struct StubDetector {
        pair: Option<ShoulderPair>,
    }

    impl PoseDetector for StubDetector {
        fn detect(&mut self, _image: &usls::Image) -> Result<Option<ShoulderPair>> {
            Ok(self.pair)
        }
    }

    fn pair_with_visibility(visibility: f32) -> ShoulderPair {
        ShoulderPair::new(
            Keypoint::new(0.1, 0.4, visibility),
            Keypoint::new(0.3, 0.4, visibility),
        )
    }

    fn write_test_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        RgbImage::from_pixel(width, height, ::image::Rgb([40, 80, 120]))
            .save(&path)
            .unwrap();
        path
    }

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(name)
    }

    #[test]
    fn test_margin_policy_writes_cropped_image() {
        let dir = temp_dir("shouldercrop_processor_margin_test");
        let input = write_test_image(&dir, "input.png", 1000, 800);
        let output = dir.join("out").join("input.png");

        let detector = StubDetector {
            pair: Some(pair_with_visibility(0.9)),
        };
        let mut cropper =
            ShoulderCropper::new(detector, CropPolicy::Margin { margin: 50 }, 0.5);

        let outcome = cropper.process_image(&input, &output).unwrap();
        // shoulder span 100..300, overall width 300, full height
        assert_eq!(
            outcome,
            ProcessOutcome::Written {
                width: 300,
                height: 800
            }
        );
        assert!(output.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_detection_miss_skips_without_writing() {
        let dir = temp_dir("shouldercrop_processor_miss_test");
        let input = write_test_image(&dir, "input.png", 640, 480);
        let output = dir.join("out.png");

        let detector = StubDetector { pair: None };
        let mut cropper =
            ShoulderCropper::new(detector, CropPolicy::Margin { margin: 50 }, 0.5);

        let outcome = cropper.process_image(&input, &output).unwrap();
        assert_eq!(outcome, ProcessOutcome::Skipped);
        assert!(!output.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_low_visibility_pair_is_skipped() {
        let dir = temp_dir("shouldercrop_processor_gate_test");
        let input = write_test_image(&dir, "input.png", 640, 480);
        let output = dir.join("out.png");

        let detector = StubDetector {
            pair: Some(pair_with_visibility(0.499)),
        };
        let mut cropper =
            ShoulderCropper::new(detector, CropPolicy::Margin { margin: 50 }, 0.5);

        let outcome = cropper.process_image(&input, &output).unwrap();
        assert_eq!(outcome, ProcessOutcome::Skipped);
        assert!(!output.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_reference_policy_passes_matching_image_through() {
        let dir = temp_dir("shouldercrop_processor_passthrough_test");
        let input = write_test_image(&dir, "input.png", 300, 800);
        let output = dir.join("out.png");

        // Detector would refuse this image, but the passthrough check runs first
        let detector = StubDetector { pair: None };
        let policy = CropPolicy::MatchReference {
            overall_width: 300,
            goal_width: 300,
            goal_height: 800,
        };
        let mut cropper = ShoulderCropper::new(detector, policy, 0.5);

        let outcome = cropper.process_image(&input, &output).unwrap();
        assert_eq!(
            outcome,
            ProcessOutcome::Passthrough {
                width: 300,
                height: 800
            }
        );
        assert!(output.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_reference_policy_crops_non_matching_image() {
        let dir = temp_dir("shouldercrop_processor_reference_test");
        let input = write_test_image(&dir, "input.png", 1000, 800);
        let output = dir.join("out.png");

        let detector = StubDetector {
            pair: Some(pair_with_visibility(0.9)),
        };
        let policy = CropPolicy::MatchReference {
            overall_width: 300,
            goal_width: 300,
            goal_height: 800,
        };
        let mut cropper = ShoulderCropper::new(detector, policy, 0.5);

        let outcome = cropper.process_image(&input, &output).unwrap();
        assert_eq!(
            outcome,
            ProcessOutcome::Written {
                width: 300,
                height: 800
            }
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_failure_is_fatal_for_the_image() {
        let detector = StubDetector {
            pair: Some(pair_with_visibility(0.9)),
        };
        let mut cropper =
            ShoulderCropper::new(detector, CropPolicy::Margin { margin: 50 }, 0.5);

        let result = cropper.process_image(
            Path::new("/nonexistent/input.png"),
            Path::new("/nonexistent/out.png"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_process_goal_frame_derives_width_and_resolution() {
        let dir = temp_dir("shouldercrop_processor_goal_test");
        let input = write_test_image(&dir, "goal.png", 1000, 800);
        let output = dir.join("goal_cropped.png");

        let mut detector = StubDetector {
            pair: Some(pair_with_visibility(0.9)),
        };
        let goal = process_goal_frame(&mut detector, &input, &output, 50, 0.5).unwrap();

        assert_eq!(
            goal,
            GoalFrame {
                overall_width: 300,
                width: 300,
                height: 800
            }
        );
        assert!(output.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_process_goal_frame_without_shoulders_is_fatal() {
        let dir = temp_dir("shouldercrop_processor_goal_miss_test");
        let input = write_test_image(&dir, "goal.png", 1000, 800);
        let output = dir.join("goal_cropped.png");

        let mut detector = StubDetector { pair: None };
        let result = process_goal_frame(&mut detector, &input, &output, 50, 0.5);
        assert!(result.is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}

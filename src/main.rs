use anyhow::{Context, Result, bail};
use chrono::Local;
use shouldercrop::cli;
use shouldercrop::config;
use shouldercrop::crop::CropPolicy;
use shouldercrop::detector::YoloPoseDetector;
use shouldercrop::processor::{self, ProcessOutcome, ShoulderCropper};
use shouldercrop::processor_utils;
use shouldercrop::progress::BatchProgressTracker;
use std::fs;
use std::path::Path;

/// Creates the output directory, timestamped under ./runs unless one was given
fn create_output_dir(requested: &str) -> Result<String> {
    let output_dir = if requested.is_empty() {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        format!("./runs/{}", timestamp)
    } else {
        requested.to_string()
    };
    fs::create_dir_all(&output_dir)?;
    Ok(output_dir)
}

fn main() -> Result<()> {
    let args: cli::Args = argh::from_env();

    let output_dir = create_output_dir(&args.output_dir)?;
    println!("Created output directory: {}", output_dir);

    let model_config = config::build_config(&args)?;
    let mut detector = YoloPoseDetector::new(model_config)?;

    // Resolve the cropping policy; the reference policy needs the goal frame
    // processed before anything else
    let policy = match args.policy.as_str() {
        "margin" => CropPolicy::Margin {
            margin: args.margin,
        },
        "predefined" => CropPolicy::Predefined {
            width: args.predefined_width,
            height: args.predefined_height,
            margin: args.margin,
        },
        "reference" => {
            let goal_path = args
                .goal_frame
                .as_deref()
                .context("--goal-frame is required for the reference policy")?;
            let goal_output = Path::new(&output_dir).join("goal_frame_cropped.jpg");
            let goal = processor::process_goal_frame(
                &mut detector,
                Path::new(goal_path),
                &goal_output,
                args.margin,
                args.keypoint_conf,
            )?;
            println!(
                "Goal frame processed | Overall width: {} | Resolution: {}x{}",
                goal.overall_width, goal.width, goal.height
            );
            CropPolicy::MatchReference {
                overall_width: goal.overall_width,
                goal_width: goal.width,
                goal_height: goal.height,
            }
        }
        other => bail!(
            "unknown policy: {} (expected margin, predefined, or reference)",
            other
        ),
    };

    let inputs = processor_utils::collect_image_files(Path::new(&args.source))?;
    if inputs.is_empty() {
        bail!("no images found in {}", args.source);
    }

    let mut cropper = ShoulderCropper::new(detector, policy, args.keypoint_conf);
    let mut tracker = BatchProgressTracker::new(inputs.len() as u64, "shoulder crop");
    let mut written = 0usize;
    let mut skipped = 0usize;

    for input in &inputs {
        let file_name = input
            .file_name()
            .with_context(|| format!("input path has no file name: {}", input.display()))?;
        let output = Path::new(&output_dir).join(file_name);

        match cropper.process_image(input, &output)? {
            ProcessOutcome::Written { width, height } => {
                written += 1;
                println!(
                    "Cropped image saved to {} | Resolution: {}x{}",
                    output.display(),
                    width,
                    height
                );
            }
            ProcessOutcome::Passthrough { width, height } => {
                written += 1;
                println!(
                    "{} matches the goal resolution, retained unmodified | Resolution: {}x{}",
                    input.display(),
                    width,
                    height
                );
            }
            ProcessOutcome::Skipped => {
                skipped += 1;
                println!(
                    "Shoulders not detected in {}. Skipping crop.",
                    input.display()
                );
            }
        }
        tracker.update_image();
    }

    tracker.finish();
    println!("Done: {} written, {} skipped", written, skipped);
    Ok(())
}

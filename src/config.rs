use crate::cli::Args;
use anyhow::Result;
use usls::{Config, NAMES_COCO_KEYPOINTS_17};

/// Builds a YOLO pose model configuration from command line arguments
pub fn build_config(args: &Args) -> Result<Config> {
    let config = Config::yolo()
        .with_task("pose".parse()?)
        .with_version(args.ver.try_into()?)
        .with_scale(args.scale.parse()?)
        .with_model_dtype(args.dtype.parse()?)
        .with_model_device(args.device.parse()?)
        .with_class_confs(&[0.25])
        .with_keypoint_confs(&[args.keypoint_conf])
        .with_keypoint_names(&NAMES_COCO_KEYPOINTS_17)
        .with_nk(17)
        .with_model_num_dry_run(2);

    Ok(config)
}

pub mod cli;
pub mod config;
pub mod crop;
pub mod detector;
pub mod image;
pub mod keypoint;
pub mod processor;
pub mod processor_utils;
pub mod progress;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Progress tracker for batch image processing
pub struct BatchProgressTracker {
    progress_bar: ProgressBar,
    start_time: Instant,
    total_images: u64,
    processed_images: u64,
}

impl BatchProgressTracker {
    /// Creates a new progress tracker for a batch of known size
    pub fn new(total_images: u64, operation_name: &str) -> Self {
        let progress_bar = ProgressBar::new(total_images);

        // Set up the progress bar style with time and image information
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images ({percent}%) | {msg}")
            .unwrap()
            .progress_chars("#>-");

        progress_bar.set_style(style);
        progress_bar.set_message(format!("Processing {}", operation_name));

        Self {
            progress_bar,
            start_time: Instant::now(),
            total_images,
            processed_images: 0,
        }
    }

    /// Updates the progress by one image
    pub fn update_image(&mut self) {
        self.processed_images += 1;
        self.progress_bar.inc(1);
        self.progress_bar.set_message(self.progress_message());
    }

    /// Gets comprehensive progress message
    fn progress_message(&self) -> String {
        if self.processed_images == 0 {
            return "Starting...".to_string();
        }

        let elapsed = self.start_time.elapsed();
        let images_per_second = self.processed_images as f64 / elapsed.as_secs_f64();
        let remaining_images = self.total_images.saturating_sub(self.processed_images);
        let eta = if images_per_second > 0.0 {
            format_duration(remaining_images as f64 / images_per_second)
        } else {
            "Calculating...".to_string()
        };

        format!("Speed: {:.1} img/s | ETA: {}", images_per_second, eta)
    }

    /// Finishes the progress bar with a summary
    pub fn finish(&self) {
        let total_time = self.start_time.elapsed();
        let avg_speed = self.processed_images as f64 / total_time.as_secs_f64();
        self.progress_bar.finish_with_message(format!(
            "Completed! {} images in {} | Avg: {:.1} img/s",
            self.processed_images,
            format_duration(total_time.as_secs_f64()),
            avg_speed
        ));
    }

    /// Gets the total number of images
    pub fn total_images(&self) -> u64 {
        self.total_images
    }

    /// Gets the current number of processed images
    pub fn processed_images(&self) -> u64 {
        self.processed_images
    }
}

/// Formats a duration in seconds to h:mm:ss format
fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

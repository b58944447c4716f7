use argh::FromArgs;

/// Crops still images to a shoulder-centered boundary
#[derive(FromArgs, Debug)]
pub struct Args {
    /// source: image file or folder of images
    #[argh(option, default = "String::from(\"./images\")")]
    pub source: String,

    /// cropping policy: margin, predefined, or reference
    #[argh(option, default = "String::from(\"margin\")")]
    pub policy: String,

    /// margin in pixels around the detected shoulder span
    #[argh(option, default = "500")]
    pub margin: u32,

    /// predefined crop width in pixels (predefined policy)
    #[argh(option, default = "1291")]
    pub predefined_width: u32,

    /// predefined crop height in pixels (predefined policy)
    #[argh(option, default = "1080")]
    pub predefined_height: u32,

    /// goal frame whose crop width is reused (reference policy)
    #[argh(option)]
    pub goal_frame: Option<String>,

    /// minimum shoulder keypoint visibility
    #[argh(option, default = "0.5")]
    pub keypoint_conf: f32,

    /// output directory; defaults to a timestamped folder under ./runs
    #[argh(option, default = "String::new()")]
    pub output_dir: String,

    /// model dtype
    #[argh(option, default = "String::from(\"auto\")")]
    pub dtype: String,

    /// version
    #[argh(option, default = "8.0")]
    pub ver: f32,

    /// device: cuda, cpu, mps
    #[argh(option, default = "String::from(\"cpu:0\")")]
    pub device: String,

    /// scale: n, s, m, l
    #[argh(option, default = "String::from(\"m\")")]
    pub scale: String,
}

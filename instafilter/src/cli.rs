use clap::Parser;
use filter_engine::FilterKind;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Apply a photo filter to an image and save the result")]
pub struct Args {
    /// Image to filter
    pub input: Option<PathBuf>,

    /// Filter to apply, by name or slug (see --list-filters)
    #[arg(short, long, value_name = "KIND")]
    pub filter: Option<FilterKind>,

    #[arg(long, value_parser = unit_interval)]
    pub intensity: Option<f32>,

    #[arg(long, value_parser = unit_interval)]
    pub radius: Option<f32>,

    #[arg(long, value_parser = unit_interval)]
    pub scale: Option<f32>,

    /// Where to save the filtered image; PNG or JPEG by extension
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print every filter with the controls it uses, then exit
    #[arg(long)]
    pub list_filters: bool,

    /// Config file to use instead of the platform default
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

fn unit_interval(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not between 0 and 1"))
    }
}

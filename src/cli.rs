use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use marchtrace::params::RenderMode;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
///
/// Every render setting is optional here; values given on the command line
/// override the config file, which overrides the built-in defaults.
#[derive(Parser)]
#[command(name = "marchtrace")]
#[command(about = "Ray marcher and path tracer for a field of spheres")]
pub struct Args {
    /// TOML config file
    #[arg(short, long, help = "TOML config file")]
    pub config: Option<PathBuf>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, help = "Image width in pixels")]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long, help = "Image height in pixels")]
    pub height: Option<u32>,

    /// Render algorithm
    #[arg(long, value_enum, help = "Render algorithm")]
    pub mode: Option<RenderMode>,

    /// Number of samples per pixel (path tracing only)
    #[arg(long, short = 's', help = "Number of samples per pixel (path tracing only)")]
    pub samples_per_pixel: Option<u32>,

    /// Maximum metal reflections per path
    #[arg(long, help = "Maximum metal reflections per path")]
    pub bounces: Option<u32>,

    /// Seed for per-pixel sample jitter
    #[arg(long, help = "Seed for per-pixel sample jitter")]
    pub seed: Option<u64>,

    /// Animation time in seconds used to pose the sphere grid
    #[arg(long, help = "Animation time in seconds used to pose the sphere grid")]
    pub time: Option<f32>,

    /// Hide the progress bar
    #[arg(long, help = "Hide the progress bar")]
    pub quiet: bool,

    /// Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)
    #[arg(short, long, default_value = "output.png", help = "Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_are_optional() {
        let args = Args::try_parse_from(["marchtrace"]).unwrap();
        assert!(args.config.is_none() && args.width.is_none() && args.mode.is_none());
        assert_eq!(args.output, PathBuf::from("output.png"));
    }

    #[test]
    fn parses_mode_and_samples() {
        let args = Args::try_parse_from(["marchtrace", "--mode", "ray-march", "-s", "4", "-o", "a.exr"]).unwrap();
        assert_eq!(args.mode, Some(RenderMode::RayMarch));
        assert_eq!(args.samples_per_pixel, Some(4));
        assert_eq!(args.output, PathBuf::from("a.exr"));
    }
}

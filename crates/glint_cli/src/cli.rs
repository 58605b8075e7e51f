use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use glint_renderer::ProxyShape;
use log::LevelFilter;

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// One synchronous frame through the single-threaded renderer
    Static,
    /// Jittered passes averaged by the progressive accumulator
    Progressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Proxy {
    /// Convex hull of each object's vertices
    Hull,
    /// Exact object triangles
    Mesh,
}

impl From<Proxy> for ProxyShape {
    fn from(proxy: Proxy) -> Self {
        match proxy {
            Proxy::Hull => ProxyShape::ConvexHull,
            Proxy::Mesh => ProxyShape::Mesh,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "glint")]
#[command(about = "Direct-lighting ray tracer: renders a JSON scene to PNG")]
pub struct Args {
    /// Scene description (JSON); the built-in demo scene when omitted
    pub scene: Option<PathBuf>,

    #[arg(short, long, default_value = "glint.png", help = "Output PNG path")]
    pub output: PathBuf,

    #[arg(short, long, value_enum, default_value = "static")]
    pub mode: Mode,

    /// Passes to accumulate in progressive mode
    #[arg(short, long, default_value = "16")]
    pub passes: u32,

    /// Display size as WIDTHxHEIGHT
    #[arg(long, default_value = "640x360", value_parser = parse_size)]
    pub size: (u32, u32),

    /// Output pixels per display pixel along each axis
    #[arg(long, default_value = "1")]
    pub scale: u32,

    #[arg(long, value_enum, default_value = "hull", help = "Proxy geometry for renderable objects")]
    pub proxy: Proxy,

    /// Worker threads for the rayon kernel; rayon's default pool when omitted
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Kernel launcher for progressive mode: rayon, bucket or serial
    #[arg(short, long, default_value = "rayon")]
    pub kernel: String,

    /// Seed for the jitter RNG
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sample pixel centers instead of jittered offsets
    #[arg(long)]
    pub no_jitter: bool,

    #[arg(long, value_enum, default_value = "info", help = "Set the logging level")]
    pub log_level: LogLevel,
}

/// Parse `WIDTHxHEIGHT`, e.g. `1280x720`.
pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid dimension '{part}': {e}"))
    };
    let size = (parse(width)?, parse(height)?);
    if size.0 == 0 || size.1 == 0 {
        return Err(format!("size must be non-zero, got '{value}'"));
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["glint"]).unwrap();
        assert!(args.scene.is_none());
        assert_eq!(args.output, PathBuf::from("glint.png"));
        assert_eq!(args.mode, Mode::Static);
        assert_eq!(args.size, (640, 360));
        assert_eq!(args.scale, 1);
        assert_eq!(args.proxy, Proxy::Hull);
        assert_eq!(args.kernel, "rayon");
        assert_eq!(args.log_level, LogLevel::Info);
        assert!(!args.no_jitter);
    }

    #[test]
    fn test_progressive_flags() {
        let args = Args::try_parse_from([
            "glint",
            "room.json",
            "--mode",
            "progressive",
            "--passes",
            "64",
            "--size",
            "320x200",
            "--proxy",
            "mesh",
            "--kernel",
            "bucket",
            "--threads",
            "4",
            "--seed",
            "7",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.scene, Some(PathBuf::from("room.json")));
        assert_eq!(args.mode, Mode::Progressive);
        assert_eq!(args.passes, 64);
        assert_eq!(args.size, (320, 200));
        assert_eq!(ProxyShape::from(args.proxy), ProxyShape::Mesh);
        assert_eq!(args.kernel, "bucket");
        assert_eq!(args.threads, Some(4));
        assert_eq!(args.seed, Some(7));
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_size("64X48"), Ok((64, 48)));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Args::try_parse_from(["glint", "--mode", "gpu"]).is_err());
    }
}

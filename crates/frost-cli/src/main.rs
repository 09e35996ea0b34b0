use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use frost_core::{BlurStyle, Capabilities, EffectRuntime, Rect, VisualEffect};
use frost_skia::{SkiaBackend, SkiaDrawScope, SkiaPlatform};
use skia_safe::{Data, EncodedImageFormat, Image};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Applies a Frost blur style to a region of a PNG image.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input PNG
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Blur style JSON
    #[arg(value_name = "STYLE")]
    style: PathBuf,

    /// Output PNG path (defaults to INPUT with a `.frost.png` suffix)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Effect area as `x,y,width,height` in pixels (defaults to the whole image)
    #[arg(long, value_parser = parse_area)]
    area: Option<Rect>,

    /// Density (pixels per dp)
    #[arg(long, default_value_t = 1.0)]
    density: f32,

    /// Disable runtime shaders (forces the multi-layer progressive path)
    #[arg(long)]
    no_runtime_shaders: bool,

    /// Largest accepted blur radius in pixels
    #[arg(long)]
    max_blur_radius: Option<f32>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The `EnvFilter` directive, spelled as on the command line.
    fn directive(self) -> String {
        self.to_possible_value()
            .map_or_else(|| "info".to_owned(), |v| v.get_name().to_owned())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

fn parse_area(s: &str) -> Result<Rect, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid area '{}': {}", s, e))?;
    match parts.as_slice() {
        [x, y, w, h] if *w > 0.0 && *h > 0.0 => Ok(Rect::from_xywh(*x, *y, *w, *h)),
        _ => Err(format!("area must be x,y,width,height with a positive size, got '{}'", s)),
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(cli.log_level.directive().parse()?)
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match cli.log_format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("frost.png"));
    info!("Input: {:?}", cli.input);
    info!("Output: {:?}", output_path);

    let bytes = fs::read(&cli.input).with_context(|| format!("reading {:?}", cli.input))?;
    let content = Image::from_encoded(Data::new_copy(&bytes))
        .ok_or_else(|| anyhow!("cannot decode {:?}", cli.input))?;
    let json = fs::read_to_string(&cli.style).with_context(|| format!("reading {:?}", cli.style))?;
    let style = BlurStyle::from_json(&json)?;

    let mut backend = if cli.no_runtime_shaders {
        SkiaBackend::without_runtime_shaders()
    } else {
        SkiaBackend::new()
    };
    if let Some(max) = cli.max_blur_radius {
        backend = backend.with_max_blur_radius(max);
    }
    let mut platform = SkiaPlatform::with_capabilities(Capabilities {
        blur: true,
        runtime_shaders: !cli.no_runtime_shaders,
    });
    let runtime = EffectRuntime::new(backend);

    let (width, height) = (content.width(), content.height());
    let area = cli
        .area
        .unwrap_or_else(|| Rect::from_xywh(0.0, 0.0, width as f32, height as f32));
    let mut surface = skia_safe::surfaces::raster_n32_premul((width, height))
        .ok_or_else(|| anyhow!("cannot allocate {}x{} surface", width, height))?;
    surface.canvas().draw_image(&content, (0, 0), None);

    let mut effect = VisualEffect::new(style);
    effect.attach(&mut platform);
    info!(state = ?effect.state(), "Drawing effect");
    let drawn = {
        let mut scope = SkiaDrawScope::new(surface.canvas(), &content, cli.density);
        effect.draw(&runtime, &mut platform, &mut scope, area)
    };
    effect.detach(&mut platform);
    drawn?;
    debug!(cached = runtime.cached_len(), "render effects built");

    let data = surface
        .image_snapshot()
        .encode(None, EncodedImageFormat::PNG, 100)
        .ok_or_else(|| anyhow!("PNG encoding failed"))?;
    fs::write(&output_path, data.as_bytes())
        .with_context(|| format!("writing {:?}", output_path))?;
    info!("Render complete.");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&cli) {
        eprintln!("Invalid log configuration: {}", e);
        std::process::exit(2);
    }
    if let Err(e) = run(cli) {
        error!("Render failed: {:#}", e);
        std::process::exit(1);
    }
}

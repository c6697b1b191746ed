use anyhow::{bail, Context, Result};
use clap::Parser;
use dotmatrix::cell::Shape;
use dotmatrix::color::{Color, ColorMode};
use dotmatrix::params::Parameters;
use image::ImageReader;
use log::{info, warn};
use notify::{EventKind, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

/// Quiet period that must follow a burst of input changes before the
/// matrix is regenerated.
const DEBOUNCE: Duration = Duration::from_millis(50);

#[derive(Parser)]
pub struct Options {
    /// Source image (png or jpeg)
    #[arg(long, short)]
    input: PathBuf,

    /// Output file; the extension picks the renderer (.svg or .png)
    #[arg(long, short)]
    output: PathBuf,

    /// Also write a self-contained HTML fragment to this path
    #[arg(long)]
    embed: Option<PathBuf>,

    /// JSON parameter file, replacing the style options below
    #[arg(long)]
    params: Option<PathBuf>,

    /// Grid pitch in source pixels
    #[arg(long, default_value_t = 8)]
    spacing: u32,

    /// Nominal dot diameter in output pixels
    #[arg(long, default_value_t = 6.0)]
    dot_size: f64,

    /// color, grayscale, black-and-white or custom
    #[arg(long, default_value_t = ColorMode::BlackAndWhite)]
    color_mode: ColorMode,

    /// Dot color used with --color-mode custom
    #[arg(long, default_value = "#000000", value_parser = Color::parse)]
    custom_color: Color,

    /// Background color
    #[arg(long, default_value = "#000000", value_parser = Color::parse)]
    background_color: Color,

    /// circle, square or diamond
    #[arg(long, default_value_t = Shape::Circle)]
    shape: Shape,

    /// Scale dots by sample darkness
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    size_by_brightness: bool,

    /// Shrink the source to fit WIDTHxHEIGHT before sampling
    #[arg(long, value_parser = parse_fit)]
    fit: Option<(u32, u32)>,

    /// Keep running and regenerate whenever the input changes
    #[arg(long)]
    watch: bool,
}

fn parse_fit(s: &str) -> Result<(u32, u32)> {
    let (width, height) = match s.split_once('x') {
        Some(pair) => pair,
        None => bail!("expected WIDTHxHEIGHT, got {}", s),
    };

    Ok((width.parse()?, height.parse()?))
}

fn parameters(opt: &Options) -> Result<Parameters> {
    let par: Parameters = match &opt.params {
        Some(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;

            serde_json::from_reader(file)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => Parameters {
            spacing: opt.spacing,
            dot_size: opt.dot_size,
            color_mode: opt.color_mode,
            custom_color: opt.custom_color.clone(),
            background_color: opt.background_color.clone(),
            shape: opt.shape,
            size_by_brightness: opt.size_by_brightness,
        },
    };

    par.validate()?;

    Ok(par)
}

fn run(opt: &Options, par: &Parameters) -> Result<()> {
    let img = ImageReader::open(&opt.input)
        .with_context(|| format!("failed to open {}", opt.input.display()))?
        .decode()
        .with_context(|| format!("failed to decode {}", opt.input.display()))?;

    let img = match opt.fit {
        Some((width, height)) => dotmatrix::fit_within(img, width, height),
        None => img,
    };

    let artifacts = dotmatrix::generate(&img, par)?;
    let format = opt
        .output
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match format.as_deref() {
        Some("svg") => fs::write(&opt.output, &artifacts.markup)?,
        Some("png") => artifacts.surface.save(&opt.output)?,
        _ => bail!("unsupported output extension: {}", opt.output.display()),
    }

    info!("wrote {}", opt.output.display());

    if let Some(path) = &opt.embed {
        fs::write(path, &artifacts.html)?;
        info!("wrote {}", path.display());
    }

    Ok(())
}

fn touches_input(event: &notify::Event, input: &Path) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }

    match input.file_name() {
        Some(name) => event.paths.iter().any(|p| p.file_name() == Some(name)),
        None => false,
    }
}

/// Regenerate after every change to the input file. Editors replace files
/// rather than rewrite them, so the parent directory is watched and events
/// are filtered by file name.
fn watch(opt: &Options, par: &Parameters) -> Result<()> {
    let dir = match opt.input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx)?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    info!("watching {}", opt.input.display());

    while let Ok(event) = rx.recv() {
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                warn!("watch error: {}", err);
                continue;
            }
        };

        if !touches_input(&event, &opt.input) {
            continue;
        }

        // Wait out the burst; a save produces several events back to back.
        while rx.recv_timeout(DEBOUNCE).is_ok() {}

        if let Err(err) = run(opt, par) {
            warn!("regeneration failed: {:#}", err);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let opt = Options::parse();
    let par = parameters(&opt)?;

    run(&opt, &par)?;

    if opt.watch {
        watch(&opt, &par)?;
    }

    Ok(())
}

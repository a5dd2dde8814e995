use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use twibbon::{InputEvent, Point, Session, TwibbonConfig, Viewport};

#[derive(Parser, Debug)]
#[command(name = "twibbon", version)]
struct Cli {
    /// Log progress to stderr (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a photo under the frame and write the square export PNG.
    Export(ExportArgs),
    /// Write the viewport-sized preview instead of the export.
    Preview(PlacementArgs),
}

#[derive(Args, Debug)]
struct PlacementArgs {
    /// User photo (any format the image decoder understands).
    #[arg(long)]
    photo: PathBuf,

    /// Frame overlay PNG. Overrides the config and `TWIBBON_FRAME_PATH`.
    #[arg(long)]
    frame: Option<PathBuf>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preview viewport, `WIDTHxHEIGHT`.
    #[arg(long, default_value = "500x500", value_parser = parse_viewport)]
    viewport: Viewport,

    /// Drag the photo by `DX,DY` preview pixels.
    #[arg(long, value_parser = parse_pan, allow_hyphen_values = true)]
    pan: Option<Point>,

    /// Wheel steps: positive zooms in, negative zooms out.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    zoom_steps: i32,

    /// Output PNG path.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    placement: PlacementArgs,

    /// Override the export edge length in pixels.
    #[arg(long)]
    size: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &PlacementArgs) -> anyhow::Result<TwibbonConfig> {
    let config = match &args.config {
        Some(path) => TwibbonConfig::from_json_path(path)?,
        None => TwibbonConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(frame) = &args.frame {
        config.frame_path = frame.clone();
    }
    Ok(config)
}

/// Upload the photo and replay the requested gestures.
fn compose(args: &PlacementArgs, config: TwibbonConfig) -> anyhow::Result<Session> {
    let mut session = Session::new(config, args.viewport)?;
    let bytes = std::fs::read(&args.photo)
        .with_context(|| format!("read photo '{}'", args.photo.display()))?;
    if let Err(err) = session.upload(&bytes) {
        anyhow::bail!("{} ({err})", err.user_message());
    }

    if let Some(pan) = args.pan {
        let center = args.viewport.center();
        session.handle_input(&InputEvent::PointerDown { pos: center })?;
        session.handle_input(&InputEvent::PointerMove {
            pos: center + pan.to_vec2(),
        })?;
        session.handle_input(&InputEvent::PointerUp)?;
    }
    let delta_y = if args.zoom_steps > 0 { -1.0 } else { 1.0 };
    for _ in 0..args.zoom_steps.unsigned_abs() {
        session.handle_input(&InputEvent::Wheel { delta_y })?;
    }
    tracing::info!(
        scale = session.transform().scale(),
        pan_x = session.transform().pan().x,
        pan_y = session.transform().pan().y,
        "placement"
    );
    Ok(session)
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.placement)?;
    if let Some(size) = args.size {
        config.export_size = size;
    }
    let out = args
        .placement
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.download_file_name));

    let mut session = compose(&args.placement, config)?;
    let image = session
        .request_export()?
        .context("export control already used")?;
    write_png(&out, &image.png)?;
    eprintln!("wrote {} ({}x{})", out.display(), image.width, image.height);
    Ok(())
}

fn cmd_preview(args: PlacementArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from("twibbon-preview.png"));

    let session = compose(&args, config)?;
    let surface = session.preview().context("no preview after upload")?;
    let png = twibbon::encode_png(surface)?;
    write_png(&out, &png)?;
    eprintln!(
        "wrote {} ({}x{})",
        out.display(),
        surface.width(),
        surface.height()
    );
    Ok(())
}

fn write_png(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))
}

fn parse_viewport(s: &str) -> Result<Viewport, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = w.trim().parse::<u32>().map_err(|e| format!("width: {e}"))?;
    let height = h.trim().parse::<u32>().map_err(|e| format!("height: {e}"))?;
    Ok(Viewport::new(width, height))
}

fn parse_pan(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got '{s}'"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("dx: {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("dy: {e}"))?;
    Ok(Point::new(x, y))
}

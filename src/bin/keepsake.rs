use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use keepsake::{
    Capsule, CropRegion, DirSink, EngineConfig, ExportStatus, Exporter, FilterConfig, FontBook,
    Format, HttpFetcher, LetterBackground, LetterRequest, MessageSource, POLAROID_MESSAGE_LIMIT,
    PolaroidRequest, RenderRequest,
};

#[derive(Parser, Debug)]
#[command(name = "keepsake", version)]
struct Cli {
    /// Engine config JSON (fonts, branding, timings).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a job at full resolution and save it as a PNG.
    Render(RenderArgs),
    /// Render a job and write a display-size preview PNG.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Job JSON.
    #[arg(long)]
    job: PathBuf,

    /// Directory the PNG is saved into.
    #[arg(long)]
    out_dir: PathBuf,

    /// Run the vintage filter over the photo before rendering (polaroid only).
    #[arg(long, default_value_t = false)]
    vintage: bool,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Job JSON.
    #[arg(long)]
    job: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Display width in CSS pixels.
    #[arg(long)]
    width: u32,

    /// Display height in CSS pixels.
    #[arg(long)]
    height: u32,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f32,
}

/// One keepsake described as JSON. Relative paths resolve against the job file's directory.
#[derive(serde::Deserialize, Debug)]
#[serde(tag = "template", rename_all = "snake_case")]
enum Job {
    Polaroid {
        capsule: Capsule,
        #[serde(default)]
        message_source: MessageSource,
        photo: PathBuf,
        /// Pixel crop; defaults to the centered square.
        #[serde(default)]
        crop: Option<CropRegion>,
        /// `[x, y, width, height]` as fractions of the photo; used when `crop` is absent.
        #[serde(default)]
        crop_normalized: Option<[f64; 4]>,
        #[serde(default)]
        format: Format,
        #[serde(default)]
        filter: FilterConfig,
    },
    Letter {
        capsule: Capsule,
        #[serde(default)]
        message_source: MessageSource,
        /// Hex color, URL or path.
        background: String,
        #[serde(default = "default_sign_off")]
        sign_off: String,
        #[serde(default)]
        format: Format,
    },
}

fn default_sign_off() -> String {
    "With love,".to_owned()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => EngineConfig::default(),
    };
    match cli.cmd {
        Command::Render(args) => cmd_render(args, config).await,
        Command::Preview(args) => cmd_preview(args, config).await,
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("KEEPSAKE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("keepsake=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn cmd_render(args: RenderArgs, config: EngineConfig) -> anyhow::Result<()> {
    let request = load_request(&args.job, args.vintage, &config)?;
    let fonts = FontBook::load(&config.fonts).await;
    let fetcher = HttpFetcher::from_config(&config)?;
    let exporter = Exporter::new(config, fonts, fetcher, DirSink::new(&args.out_dir));
    match exporter.export_png(&request).await {
        ExportStatus::Saved(path) => {
            println!("{}", path.display());
            // Give the staging release a chance to run before the runtime shuts down.
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            Ok(())
        }
        ExportStatus::Debounced => anyhow::bail!("export was debounced"),
        ExportStatus::Failed => anyhow::bail!("export failed, see log"),
    }
}

async fn cmd_preview(args: PreviewArgs, config: EngineConfig) -> anyhow::Result<()> {
    let request = load_request(&args.job, false, &config)?;
    let mut fonts = FontBook::load(&config.fonts).await;
    let fetcher = HttpFetcher::from_config(&config)?;
    let outcome = keepsake::render(&request, &mut fonts, &fetcher, &config).await?;
    let preview = keepsake::downscale_for_preview(&outcome.bitmap, args.width, args.height, args.dpr)?;
    let png = keepsake::encode_png(&preview)?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write preview '{}'", args.out.display()))?;
    println!(
        "{} ({}x{}, message {}px)",
        args.out.display(),
        preview.width,
        preview.height,
        outcome.report.message_size
    );
    Ok(())
}

fn load_request(job_path: &Path, vintage: bool, config: &EngineConfig) -> anyhow::Result<RenderRequest> {
    let text = std::fs::read_to_string(job_path)
        .with_context(|| format!("open job '{}'", job_path.display()))?;
    let job: Job = serde_json::from_str(&text).context("parse job JSON")?;
    let root = job_path.parent().unwrap_or_else(|| Path::new("."));

    match job {
        Job::Polaroid {
            capsule,
            message_source,
            photo,
            crop,
            crop_normalized,
            format,
            filter,
        } => {
            let photo_path = root.join(photo);
            let bytes = std::fs::read(&photo_path)
                .with_context(|| format!("read photo '{}'", photo_path.display()))?;
            let image = keepsake::assets::decode::decode_photo(&bytes)?;
            let (w, h) = image.dimensions();
            let crop = match (crop, crop_normalized) {
                (Some(crop), _) => crop,
                (None, Some([nx, ny, nw, nh])) => CropRegion::from_normalized(nx, ny, nw, nh, w, h),
                (None, None) => CropRegion::centered_square(w, h),
            };
            let mut canvas = keepsake::compose(&image, crop).context("crop region is empty")?;
            if vintage {
                let cfg = if filter == FilterConfig::identity() {
                    FilterConfig::warm()
                } else {
                    filter
                };
                canvas = canvas.vintage(&cfg, config.grain_seed)?;
            }
            let message = capsule.resolve_message(message_source, Some(POLAROID_MESSAGE_LIMIT));
            if message.source != message_source || message.truncated {
                tracing::info!(source = ?message.source, truncated = message.truncated, "message adjusted to fit");
            }
            Ok(RenderRequest::Polaroid(PolaroidRequest {
                processed_image: Arc::new(canvas),
                track_name: capsule.track_name,
                artist_name: capsule.artist_name,
                album_art_url: capsule.album_art_url,
                message: message.text,
                receiver_name: capsule.receiver_name,
                format,
                filter,
            }))
        }
        Job::Letter {
            capsule,
            message_source,
            background,
            sign_off,
            format,
        } => {
            let background = match LetterBackground::parse(&background) {
                LetterBackground::ImageUrl(url) if !url.contains("://") => {
                    LetterBackground::ImageUrl(root.join(url).display().to_string())
                }
                other => other,
            };
            let message = capsule.resolve_message(message_source, None);
            let sender_name = capsule.sender().unwrap_or_default().to_owned();
            Ok(RenderRequest::Letter(LetterRequest {
                background,
                message: message.text,
                track_name: capsule.track_name,
                artist_name: capsule.artist_name,
                album_art_url: capsule.album_art_url,
                receiver_name: capsule.receiver_name,
                sign_off,
                sender_name,
                format,
            }))
        }
    }
}

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "poster", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a poster order in the catalog and render it to `./<UUID>.jpg`.
    Create(CreateArgs),
    /// Render a poster from a local request JSON.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Worker threads for tile fetching and resampling.
    #[arg(long, default_value_t = 8)]
    threads: usize,

    /// HTTP timeout per request, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Parser, Debug)]
struct CreateArgs {
    /// Poster order identifier.
    poster_id: Uuid,

    /// Render a 1/10 scale preview (default).
    #[arg(long, overrides_with = "full")]
    preview: bool,

    /// Render at full print resolution.
    #[arg(long, overrides_with = "preview")]
    full: bool,

    /// Catalog endpoint.
    #[arg(long, default_value = poster::CATALOG_URL)]
    catalog: String,

    #[command(flatten)]
    fetch: FetchArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Poster request JSON.
    #[arg(long)]
    request: PathBuf,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    /// Render at full print resolution instead of a preview.
    #[arg(long)]
    full: bool,

    #[command(flatten)]
    fetch: FetchArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Create(args) => cmd_create(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn poster_opts(preview: bool, fetch: &FetchArgs) -> poster::PosterOpts {
    poster::PosterOpts::default().with_preview(preview).with_fetch(
        poster::FetchOpts::default()
            .with_threads(fetch.threads)
            .with_timeout_secs(fetch.timeout),
    )
}

fn cmd_create(args: CreateArgs) -> anyhow::Result<()> {
    let preview = args.preview || !args.full;
    eprintln!("Order: {}", args.poster_id);

    let client = poster::ReqwestClient::with_timeout(args.fetch.timeout)?;
    let record = poster::lookup(&client, &args.catalog, args.poster_id)
        .with_context(|| format!("look up poster {}", args.poster_id))?;
    let req = record.to_request()?;

    eprintln!("Layer: {}", record.layer_name());
    eprintln!("Date: {}", record.date);
    eprintln!("Size: {:?}", req.style.size);
    eprintln!("Orientation: {:?}", req.style.orient);
    eprintln!("Preview: {preview}");

    let img = poster::create_poster(&req, &poster_opts(preview, &args.fetch))?;
    let out = PathBuf::from(format!("./{}.jpg", args.poster_id));
    write_jpeg(&out, &img.jpeg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.request)
        .with_context(|| format!("read request '{}'", args.request.display()))?;
    let req = poster::PosterRequest::from_json(&bytes)?;
    let img = poster::create_poster(&req, &poster_opts(!args.full, &args.fetch))?;
    write_jpeg(&args.out, &img.jpeg)
}

fn write_jpeg(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write jpeg '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

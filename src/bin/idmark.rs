use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "idmark", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watermark a document and save it as `<name>_watermarked.<ext>`.
    Apply(ApplyArgs),
    /// Print the watermark geometry for a document as JSON.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input image or PDF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Declared MIME type (inferred from the extension by default).
    #[arg(long)]
    mime: Option<String>,

    /// Watermark text (blank uses the default text).
    #[arg(long, conflicts_with = "spec")]
    text: Option<String>,

    /// Watermark spec JSON, e.g. `{"text": "COPY"}`.
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Font file to draw with (overrides IDMARK_FONT and font discovery).
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    input: InputArgs,
}

#[derive(serde::Serialize)]
struct InspectReport<'a> {
    name: &'a str,
    kind: idmark::DocumentKind,
    width: u32,
    height: u32,
    #[serde(flatten)]
    measurement: idmark::Measurement,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_spec(input: &InputArgs) -> anyhow::Result<idmark::WatermarkSpec> {
    if let Some(path) = &input.spec {
        let f = File::open(path).with_context(|| format!("open spec '{}'", path.display()))?;
        return Ok(idmark::WatermarkSpec::from_json_reader(BufReader::new(f))?);
    }
    Ok(idmark::WatermarkSpec::new(
        input.text.clone().unwrap_or_default(),
    ))
}

fn prepare(
    input: &InputArgs,
) -> anyhow::Result<(idmark::Session, idmark::Compositor, idmark::WatermarkSpec)> {
    let spec = read_spec(input)?;
    let settings = idmark::Settings::from_env().with_font_file(input.font.clone());
    let compositor = idmark::Compositor::from_settings(&settings)?;

    let upload = idmark::read_upload(&input.in_path, input.mime.as_deref())?;
    let mut session = idmark::Session::new();
    session.load(&upload, idmark::builtin_rasterizer())?;
    Ok((session, compositor, spec))
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let (mut session, mut compositor, spec) = prepare(&args.input)?;
    session.apply(&mut compositor, &spec)?;

    let download = session.download()?;
    let path = idmark::write_download(&args.out_dir, &download)?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let (session, mut compositor, spec) = prepare(&args.input)?;
    let document = session
        .state()
        .document()
        .ok_or_else(|| anyhow::anyhow!("document was not loaded"))?;

    let (width, height) = (document.source.width(), document.source.height());
    let report = InspectReport {
        name: display_name(&args.input.in_path, &document.name),
        kind: document.kind,
        width,
        height,
        measurement: compositor.measure(width, height, &spec)?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn display_name<'a>(path: &'a Path, name: &'a str) -> &'a str {
    if name.is_empty() {
        path.to_str().unwrap_or_default()
    } else {
        name
    }
}

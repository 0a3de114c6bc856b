use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cuegrid::{CommandInfo, ComparativeAnimationCue, CueConfig, XmlElement};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cuegrid", version)]
struct Cli {
    /// Cue configuration JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the value resolved for every cell of a grid.
    Grid(GridArgs),
    /// Apply a StateChange diff to a full state.
    Apply(ApplyArgs),
}

#[derive(Parser, Debug)]
struct GridArgs {
    /// Full-state XML.
    #[arg(long)]
    state: PathBuf,

    /// Grid width.
    #[arg(long)]
    dx: i32,

    /// Grid height.
    #[arg(long)]
    dy: i32,

    /// Print a JSON array of rows instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Full-state XML.
    #[arg(long)]
    state: PathBuf,

    /// StateChange XML.
    #[arg(long)]
    diff: PathBuf,

    /// Output full-state XML path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CueConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => CueConfig::default(),
    };
    match cli.cmd {
        Command::Grid(args) => cmd_grid(&config, args),
        Command::Apply(args) => cmd_apply(&config, args),
    }
}

fn load_cue(config: &CueConfig, path: &Path) -> anyhow::Result<ComparativeAnimationCue> {
    let state = XmlElement::from_path(path)
        .with_context(|| format!("read state '{}'", path.display()))?;
    let mut cue = ComparativeAnimationCue::with_config(config);
    cue.load_command_info(CommandInfo::FullState(&state))
        .with_context(|| format!("load state '{}'", path.display()))?;
    Ok(cue)
}

fn cmd_grid(config: &CueConfig, args: GridArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.dx > 0 && args.dy > 0,
        "grid dimensions must be positive, got {}x{}",
        args.dx,
        args.dy
    );
    let mut cue = load_cue(config, &args.state)?;

    let rows: Vec<Vec<Option<Vec<f64>>>> = (0..args.dy)
        .map(|y| {
            (0..args.dx)
                .map(|x| {
                    let values = cue.values(x, y, args.dx, args.dy);
                    (!values.is_empty()).then(|| values.to_vec())
                })
                .collect()
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    for row in rows {
        let cells: Vec<String> = row
            .into_iter()
            .map(|cell| match cell {
                Some(values) => cuegrid::format_f64_list(&values),
                None => "-".to_owned(),
            })
            .collect();
        println!("{}", cells.join("\t"));
    }
    Ok(())
}

fn cmd_apply(config: &CueConfig, args: ApplyArgs) -> anyhow::Result<()> {
    let mut cue = load_cue(config, &args.state)?;
    let diff = XmlElement::from_path(&args.diff)
        .with_context(|| format!("read diff '{}'", args.diff.display()))?;
    cue.load_command_info(CommandInfo::Diff(&diff))
        .with_context(|| format!("apply diff '{}'", args.diff.display()))?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let text = cue.state_snapshot().to_xml_string()?;
    std::fs::write(&args.out, text)
        .with_context(|| format!("write state '{}'", args.out.display()))?;

    eprintln!("wrote {} ({} commands)", args.out.display(), cue.queue().len());
    Ok(())
}

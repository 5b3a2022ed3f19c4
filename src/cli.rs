use crate::config::{Config, load_config};
use crate::ir::{ContentRequest, parse_content};
use crate::layout_dump::write_layout_dump;
use crate::mindmap::{MindmapRequest, create_mindmap, plan_mindmap};
use crate::store::FileCanvasStore;
use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "canvas-mindmap",
    version,
    about = "Grow an auto-laid-out mind map from a node of a JSON Canvas"
)]
pub struct Args {
    /// Canvas file name, resolved inside the output directory
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Id of the existing node the mind map attaches to
    #[arg(short = 'r', long = "root")]
    pub root: Option<String>,

    /// Content tree (JSON or JSON5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Deepest level to place, clamped to the configured limit
    #[arg(short = 'd', long = "max-depth", allow_negative_numbers = true)]
    pub max_depth: Option<i64>,

    /// Expansion direction: right or down
    #[arg(short = 'l', long = "layout")]
    pub layout: Option<String>,

    /// Directory holding canvas files
    #[arg(short = 'o', long = "output-dir", env = "OUTPUT_PATH")]
    pub output_dir: Option<PathBuf>,

    /// Config JSON file with layout overrides
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Print the computed layout as JSON instead of saving the canvas
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Log level (error, warn, info, debug, trace, off)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

pub fn run(args: Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(dir) = &args.output_dir {
        config.store.output_dir = dir.clone();
    }

    let input = read_input(args.input.as_deref())?;
    let content = parse_content(&input)
        .context("failed to parse content tree")?
        .into_request();
    let request = build_request(&args, content)?;
    debug!(
        file = request.filename.as_str(),
        root = request.root_node_id.as_str(),
        top_level = request.children.len();
        "parsed mindmap request"
    );

    execute(&request, &config, args.dry_run, io::stdout().lock())
}

fn execute(
    request: &MindmapRequest,
    config: &Config,
    dry_run: bool,
    mut out: impl io::Write,
) -> Result<()> {
    let store = FileCanvasStore::open(&config.store.output_dir)?;
    if dry_run {
        let plan = plan_mindmap(&store, request, &config.mindmap)?;
        write_layout_dump(&mut out, &request.root_node_id, &plan.layout, plan.options)?;
        writeln!(out)?;
        return Ok(());
    }

    let report = create_mindmap(&store, request, &config.mindmap)?;
    writeln!(out, "{report}")?;
    Ok(())
}

/// Command-line flags win over fields carried in the input.
fn build_request(args: &Args, content: ContentRequest) -> Result<MindmapRequest> {
    let filename = args
        .file
        .clone()
        .or(content.filename)
        .ok_or_else(|| anyhow::anyhow!("No canvas file given (use --file or \"filename\")"))?;
    let root_node_id = args
        .root
        .clone()
        .or(content.root_node_id)
        .ok_or_else(|| anyhow::anyhow!("No root node given (use --root or \"root_node_id\")"))?;

    Ok(MindmapRequest {
        filename,
        root_node_id,
        children: content.children,
        max_depth: args.max_depth.or(content.max_depth),
        layout: args.layout.clone().or(content.layout),
    })
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use handlebars::Handlebars;
use layer_atlas_core::config::{AtlasConfig, CanvasGrowth, LayoutConfig, SortOrder};
use layer_atlas_core::{
    AtlasRecord, BackgroundIssue, Document, LayoutPlan, apply_plan, build_atlas_record,
    check_background, out_of_range_regions, plan_layout,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "layer-atlas",
    about = "Pack document layers and export texture-atlas UV mappings",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute a packed layout plan (moves + layers that did not fit)
    Layout(LayoutArgs),
    /// Build atlas UV mappings from the document's current layer bounds
    Atlas(AtlasArgs),
    /// Layout, apply the moves, then build the atlas from the moved layers
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
struct LayoutOpts {
    /// Pixels added to each layer's width and height before packing
    #[arg(long, default_value_t = 0, help_heading = "Layout")]
    spacing: u32,
    /// Sort order: max_side_desc|area_desc|height_desc|width_desc|name_asc|none
    #[arg(long, default_value = "max_side_desc", help_heading = "Layout")]
    sort_order: String,
    /// Canvas growth: fixed | bounded | unbounded
    #[arg(long, value_parser = ["fixed", "bounded", "unbounded"], default_value = "fixed", help_heading = "Layout")]
    growth: String,
    /// Growth ceiling width (bounded growth)
    #[arg(long, help_heading = "Layout")]
    max_width: Option<u32>,
    /// Growth ceiling height (bounded growth)
    #[arg(long, help_heading = "Layout")]
    max_height: Option<u32>,
    /// YAML config file path (fields present override the flags above)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct AtlasOpts {
    /// Full resolution texture path written into the atlas
    #[arg(long, default_value = "atlas.xbm", help_heading = "Atlas")]
    texture: String,
    /// Lower resolution texture path written into the atlas
    #[arg(long, default_value = "atlas_1080p.xbm", help_heading = "Atlas")]
    texture_low_res: String,
    /// Atlas format: json | ink | template
    #[arg(long, value_parser = ["json", "ink", "template"], default_value = "ink", help_heading = "Atlas")]
    format: String,
    /// External template file (handlebars), used when --format template
    #[arg(long, help_heading = "Atlas")]
    template: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
struct LayoutArgs {
    /// Document description (JSON or YAML)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    #[command(flatten)]
    layout: LayoutOpts,
    /// Write the plan here instead of stdout
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    /// Apply the plan and write the moved document to this path
    #[arg(long, help_heading = "Input/Output")]
    apply: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
}

#[derive(Parser, Debug, Clone)]
struct AtlasArgs {
    /// Document description (JSON or YAML)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    #[command(flatten)]
    atlas: AtlasOpts,
    /// YAML config file path (texture paths)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Write the atlas here instead of stdout
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
struct RunArgs {
    /// Document description (JSON or YAML)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    #[command(flatten)]
    layout: LayoutOpts,
    #[command(flatten)]
    atlas: AtlasOpts,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Base name for output files (name.plan.json, name.document.json, name.<atlas>)
    #[arg(short, long, default_value = "atlas", help_heading = "Input/Output")]
    name: String,
    /// Dry run: compute plan and atlas but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Layout(args) => run_layout(args),
        Commands::Atlas(args) => run_atlas(args),
        Commands::Run(args) => run_all(args),
    }
}

fn run_layout(args: &LayoutArgs) -> anyhow::Result<()> {
    let cfg = layout_config(&args.layout)?;
    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let mut doc = load_document(&args.input)?;
    let plan = plan_layout(&doc.layers, doc.width, doc.height, &cfg)?;
    report_plan(&plan);

    let json = serde_json::to_string_pretty(&layer_atlas_core::to_plan_json(&plan))?;
    write_or_print(args.out.as_deref(), &json)?;

    if let Some(path) = &args.apply {
        let moved = apply_plan(&mut doc, &plan)?;
        write_document(path, &doc)?;
        info!(?path, moved, "moved document written");
    }
    Ok(())
}

fn run_atlas(args: &AtlasArgs) -> anyhow::Result<()> {
    let yaml = load_yaml_config(args.config.as_deref())?;
    let cfg = yaml.atlas_config(&args.atlas);
    let doc = load_document(&args.input)?;
    warn_background(&doc);

    let record = build_atlas_record(doc.width, doc.height, &doc.layers, &cfg)?;
    report_atlas(&record);
    let rendered = render_atlas(&record, &args.atlas)?;
    write_or_print(args.out.as_deref(), &rendered)
}

fn run_all(args: &RunArgs) -> anyhow::Result<()> {
    let yaml = load_yaml_config(args.layout.config.as_deref())?;
    let layout_cfg = yaml.layout_config(base_layout_config(&args.layout)?)?;
    let atlas_cfg = yaml.atlas_config(&args.atlas);

    let mut doc = load_document(&args.input)?;
    warn_background(&doc);

    let plan = plan_layout(&doc.layers, doc.width, doc.height, &layout_cfg)?;
    report_plan(&plan);
    let moved = apply_plan(&mut doc, &plan)?;
    info!(moved, "plan applied");

    // UVs are normalized against the document, not the packer canvas.
    let record = build_atlas_record(doc.width, doc.height, &doc.layers, &atlas_cfg)?;
    report_atlas(&record);
    let rendered = render_atlas(&record, &args.atlas)?;

    if args.dry_run {
        println!(
            "moves={} failed={} parts={} canvas={}x{}",
            plan.moves.len(),
            plan.failed.len(),
            record.parts().len(),
            plan.canvas.0,
            plan.canvas.1
        );
        return Ok(());
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create out_dir {}", args.out_dir.display()))?;
    let plan_path = args.out_dir.join(format!("{}.plan.json", args.name));
    let plan_json = serde_json::to_string_pretty(&layer_atlas_core::to_plan_json(&plan))?;
    fs::write(&plan_path, plan_json).with_context(|| format!("write {}", plan_path.display()))?;
    info!(?plan_path, "plan written");

    let doc_path = args.out_dir.join(format!("{}.document.json", args.name));
    write_document(&doc_path, &doc)?;
    info!(?doc_path, "moved document written");

    let atlas_path = args.out_dir.join(match args.atlas.format.as_str() {
        "ink" => format!("{}.inkatlas.json", args.name),
        "template" => format!("{}.template.json", args.name),
        _ => format!("{}.json", args.name),
    });
    fs::write(&atlas_path, rendered).with_context(|| format!("write {}", atlas_path.display()))?;
    info!(?atlas_path, parts = record.parts().len(), "atlas written");
    Ok(())
}

fn layout_config(opts: &LayoutOpts) -> anyhow::Result<LayoutConfig> {
    let yaml = load_yaml_config(opts.config.as_deref())?;
    yaml.layout_config(base_layout_config(opts)?)
}

fn base_layout_config(opts: &LayoutOpts) -> anyhow::Result<LayoutConfig> {
    let growth = parse_growth(&opts.growth)?;
    Ok(LayoutConfig {
        spacing: opts.spacing,
        sort_order: parse_sort_order(&opts.sort_order)?,
        growth,
        max_width: opts.max_width,
        max_height: opts.max_height,
    })
}

fn report_plan(plan: &LayoutPlan) {
    info!(
        moves = plan.moves.len(),
        failed = plan.failed.len(),
        "{}",
        plan.stats.summary()
    );
    if !plan.failed.is_empty() {
        let names: Vec<&str> = plan.failed.iter().map(String::as_str).collect();
        warn!("Could not fit layers: {}", names.join(", "));
    }
}

fn report_atlas(record: &AtlasRecord) {
    let bad: Vec<&str> = out_of_range_regions(record.parts())
        .map(|r| r.name.as_str())
        .collect();
    if !bad.is_empty() {
        warn!(
            "{} part(s) extend beyond the canvas: {}",
            bad.len(),
            bad.join(", ")
        );
    }
}

fn warn_background(doc: &Document) {
    match check_background(&doc.layers) {
        Some(BackgroundIssue::Missing) => {
            warn!("document has no Background layer; the exported texture has no backdrop")
        }
        Some(BackgroundIssue::Hidden) => warn!("Background layer is hidden"),
        None => {}
    }
}

fn render_atlas(record: &AtlasRecord, opts: &AtlasOpts) -> anyhow::Result<String> {
    match opts.format.as_str() {
        "json" => Ok(serde_json::to_string_pretty(
            &layer_atlas_core::to_atlas_json(record)?,
        )?),
        "ink" => Ok(serde_json::to_string_pretty(
            &layer_atlas_core::to_ink_atlas_json(record),
        )?),
        "template" => {
            let tpl_owned_from_file: Option<String> = match &opts.template {
                Some(path) => Some(
                    fs::read_to_string(path)
                        .with_context(|| format!("read template {}", path.display()))?,
                ),
                None => None,
            };
            let tpl_ref: &str = match &tpl_owned_from_file {
                Some(s) => s.as_str(),
                None => include_str!("templates/regions.hbs"),
            };
            let mut reg = Handlebars::new();
            reg.set_strict_mode(true);
            reg.register_escape_fn(json_escape);
            reg.register_template_string("tpl", tpl_ref)?;
            Ok(reg.render("tpl", &build_template_context(record))?)
        }
        other => anyhow::bail!("unknown atlas format: {}", other),
    }
}

fn json_escape(s: &str) -> String {
    let quoted = serde_json::Value::String(s.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

#[derive(Serialize)]
struct TemplatePart {
    name: String,
    top: f64,
    left: f64,
    right: f64,
    bottom: f64,
}

#[derive(Serialize)]
struct TemplateSlot {
    texture: String,
    parts: Vec<TemplatePart>,
}

#[derive(Serialize)]
struct TemplateContext {
    slots: Vec<TemplateSlot>,
    meta: serde_json::Value,
}

fn build_template_context(record: &AtlasRecord) -> TemplateContext {
    let slots = record
        .slots
        .iter()
        .map(|s| TemplateSlot {
            texture: s.texture.clone(),
            parts: s
                .parts
                .iter()
                .map(|p| TemplatePart {
                    name: p.name.clone(),
                    top: p.uv.top,
                    left: p.uv.left,
                    right: p.uv.right,
                    bottom: p.uv.bottom,
                })
                .collect(),
        })
        .collect();
    let meta = serde_json::json!({
        "app": record.meta.app,
        "version": record.meta.version,
        "width": record.meta.size.0,
        "height": record.meta.size.1,
    });
    TemplateContext { slots, meta }
}

fn load_document(path: &Path) -> anyhow::Result<Document> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read document {}", path.display()))?;
    let doc: Document = if is_yaml(path) {
        serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    };
    info!(
        layers = doc.layers.len(),
        width = doc.width,
        height = doc.height,
        "loaded document"
    );
    Ok(doc)
}

fn write_document(path: &Path, doc: &Document) -> anyhow::Result<()> {
    let text = if is_yaml(path) {
        serde_yaml::to_string(doc)?
    } else {
        serde_json::to_string_pretty(doc)?
    };
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}

fn write_or_print(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            fs::write(p, text).with_context(|| format!("write {}", p.display()))?;
            info!(path = ?p, "written");
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn is_yaml(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "yaml" | "yml")
    )
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    spacing: Option<u32>,
    sort_order: Option<String>,
    growth: Option<String>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    texture_path: Option<String>,
    low_res_texture_path: Option<String>,
}

impl YamlConfig {
    fn layout_config(&self, mut cfg: LayoutConfig) -> anyhow::Result<LayoutConfig> {
        if let Some(v) = self.spacing {
            cfg.spacing = v;
        }
        if let Some(v) = &self.sort_order {
            cfg.sort_order = parse_sort_order(v).context("config file: sort_order")?;
        }
        if let Some(v) = &self.growth {
            cfg.growth = parse_growth(v).context("config file: growth")?;
        }
        if let Some(v) = self.max_width {
            cfg.max_width = Some(v);
        }
        if let Some(v) = self.max_height {
            cfg.max_height = Some(v);
        }
        Ok(cfg)
    }

    fn atlas_config(&self, opts: &AtlasOpts) -> AtlasConfig {
        AtlasConfig {
            texture_path: self
                .texture_path
                .clone()
                .unwrap_or_else(|| opts.texture.clone()),
            low_res_texture_path: self
                .low_res_texture_path
                .clone()
                .unwrap_or_else(|| opts.texture_low_res.clone()),
        }
    }
}

fn load_yaml_config(path: Option<&Path>) -> anyhow::Result<YamlConfig> {
    match path {
        Some(p) => {
            let file = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
            Ok(serde_yaml::from_str(&file)?)
        }
        None => Ok(YamlConfig::default()),
    }
}

fn parse_sort_order(s: &str) -> anyhow::Result<SortOrder> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown sort order: {}", s))
}

fn parse_growth(s: &str) -> anyhow::Result<CanvasGrowth> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown growth mode: {}", s))
}

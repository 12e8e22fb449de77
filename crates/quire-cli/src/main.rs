//! `quire`: expand templates, truncate HTML and preview posts from the shell.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::{Args, Parser, Subcommand};
use quire::{load_posts, Context, DirPartials, Feed, Listing, Post, Preview, QuireConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "Mustache-style templates and HTML previews for small sites")]
struct Cli {
    /// Configuration file (.yaml, .yml or .json)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a template and print the result
    Render(RenderArgs),

    /// Truncate HTML to a visible-character budget
    Truncate(TruncateArgs),

    /// Print the listing preview of a front-matter post
    Preview(PreviewArgs),

    /// Render one page of the blog listing
    Blog(BlogArgs),

    /// Print the Atom feed of a post directory
    Feed(FeedArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Template file
    template: PathBuf,

    /// Context data (.json, .yaml or .yml)
    #[arg(long, value_name = "FILE")]
    context: Option<PathBuf>,

    /// Directory partials are read from [default: the template's directory]
    #[arg(long, value_name = "DIR")]
    partials: Option<PathBuf>,

    /// Truncate the expanded output to this many visible characters
    #[arg(long, value_name = "N")]
    truncate: Option<usize>,
}

#[derive(Args)]
struct TruncateArgs {
    /// HTML file, or `-` for stdin
    input: String,

    /// Visible characters to keep [default: preview_budget]
    #[arg(short, long)]
    budget: Option<usize>,
}

#[derive(Args)]
struct PreviewArgs {
    /// Post file with front matter
    post: PathBuf,

    /// Visible characters to keep [default: preview_budget]
    #[arg(short, long)]
    budget: Option<usize>,
}

#[derive(Args)]
struct BlogArgs {
    /// Directory of post files
    posts: PathBuf,

    /// Stream template expanded with `entries` and `placeholder`
    #[arg(long, value_name = "FILE")]
    template: PathBuf,

    /// Directory partials are read from [default: the template's directory]
    #[arg(long, value_name = "DIR")]
    partials: Option<PathBuf>,

    /// Index of the first listed post
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// List drafts too
    #[arg(long)]
    drafts: bool,
}

#[derive(Args)]
struct FeedArgs {
    /// Directory of post files
    posts: PathBuf,

    /// Site origin used for entry URLs
    #[arg(long, default_value = "http://localhost:8080")]
    host: String,

    /// Include drafts
    #[arg(long)]
    drafts: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => QuireConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => QuireConfig::default(),
    };

    let output = match cli.command {
        Commands::Render(args) => render(&config, &args)?,
        Commands::Truncate(args) => truncate(&config, &args)?,
        Commands::Preview(args) => preview(&config, &args)?,
        Commands::Blog(args) => blog(&config, &args)?,
        Commands::Feed(args) => feed(&config, &args)?,
    };
    println!("{}", output);
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render(config: &QuireConfig, args: &RenderArgs) -> Result<String> {
    let template = read_file(&args.template)?;
    let context = match &args.context {
        Some(path) => load_context(path)?,
        None => Context::new(),
    };
    let partials = partials_for(&args.template, args.partials.as_deref());

    let html = config
        .expander()
        .try_expand(&template, &context, &partials)
        .with_context(|| format!("expanding {}", args.template.display()))?;

    Ok(match args.truncate {
        Some(budget) => config.truncator().truncate(&html, budget),
        None => html,
    })
}

fn truncate(config: &QuireConfig, args: &TruncateArgs) -> Result<String> {
    let html = if args.input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        read_file(Path::new(&args.input))?
    };
    let budget = args.budget.unwrap_or(config.preview_budget);

    let report = config.truncator().truncate_report(&html, budget);
    tracing::debug!(cut = report.cut, halted_at = ?report.halted_at, "truncated");
    Ok(report.html)
}

fn preview(config: &QuireConfig, args: &PreviewArgs) -> Result<String> {
    let post = Post::from_file(&args.post)?;
    if !post.is_published() {
        tracing::debug!(post = %args.post.display(), "previewing a draft");
    }
    let budget = args.budget.unwrap_or(config.preview_budget);
    let preview = Preview::build(post.content(), budget, &config.truncator());
    Ok(format!("{}\nmore: {}", preview.html, preview.more))
}

fn blog(config: &QuireConfig, args: &BlogArgs) -> Result<String> {
    let template = read_file(&args.template)?;
    let posts = load_posts(&args.posts)
        .with_context(|| format!("loading posts from {}", args.posts.display()))?;
    let partials = partials_for(&args.template, args.partials.as_deref());

    Ok(Listing::new()
        .start(args.start)
        .drafts(args.drafts)
        .render(&template, &posts, config, &partials))
}

fn feed(config: &QuireConfig, args: &FeedArgs) -> Result<String> {
    let posts = load_posts(&args.posts)
        .with_context(|| format!("loading posts from {}", args.posts.display()))?;
    Ok(Feed::new(&config.name, &args.host)
        .drafts(args.drafts)
        .render(&posts, config))
}

/// Partials come from `dir`, or else from next to the template.
fn partials_for(template: &Path, dir: Option<&Path>) -> DirPartials {
    let root = match dir {
        Some(dir) => dir.to_path_buf(),
        None => template.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    DirPartials::new(root)
}

/// Reads template data, picking the parser from the file extension.
fn load_context(path: &Path) -> Result<Context> {
    let text = read_file(path)?;
    let data: serde_json::Value = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&text)
            .with_context(|| format!("parsing JSON context {}", path.display()))?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
            .with_context(|| format!("parsing YAML context {}", path.display()))?,
        _ => bail!(
            "unsupported context file {} (expected .json, .yaml or .yml)",
            path.display()
        ),
    };
    Ok(Context::from_json(&data))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

use clap::{Parser, Subcommand};
use sitefold::pipeline::{self, BuildOptions};
use sitefold::{config, output};
use std::path::PathBuf;

/// Shared flags for commands that write the site.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Ignore the previous build's manifest and rewrite every page
    #[arg(long)]
    no_cache: bool,
}

#[derive(Parser)]
#[command(name = "sitefold")]
#[command(about = "Incremental static site builder for markdown notes")]
#[command(long_about = "\
Incremental static site builder for markdown notes

Every markdown file becomes a page, and every folder that holds notes gets a
listing page. A folder's listing shows its index.md above the list of its pages
and subfolders. Without an index.md, a note named after the folder (a.md for
a/) is shown there instead, and it keeps its own page too.

Content structure:

  content/
  ├── config.toml          # Site config (optional)
  ├── index.md             # → index.html
  ├── a/
  │   ├── note1.md         # → a/note1.html, listed on a/index.html
  │   └── note2.md         # → a/note2.html, listed on a/index.html
  ├── b/
  │   └── index.md         # Describes the b/ folder → b/index.html
  └── tags/                # Reserved: no folder page, hidden from the explorer

Rebuilds only rewrite pages whose sources changed. Metadata or config changes
rebuild everything.

Run 'sitefold gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site: scan → plan → emit
    Build(CacheArgs),
    /// Validate the content directory without building
    Check,
    /// Print which outputs depend on which sources
    Graph,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(cache_args) => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);

            println!(
                "==> Building {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_build_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = pipeline::build(
                &cli.source,
                &cli.output,
                &site_config,
                BuildOptions {
                    use_cache: !cache_args.no_cache,
                },
                Some(tx),
            );
            printer.join().ok();
            let report = result?;
            output::print_build_report(&report);

            if !report.is_ok() {
                return Err(format!(
                    "{} page(s) failed to build",
                    report.failures().count()
                )
                .into());
            }
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let site_config = config::load_config(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            let (scanned, graph) = pipeline::analyze(&cli.source, &site_config)?;
            output::print_scan_output(&scanned, &site_config);
            let outputs = graph
                .nodes()
                .filter(|n| graph.in_neighbors(n).next().is_some())
                .count();
            println!("{} pages planned", outputs);
            println!("==> Content is valid");
        }
        Command::Graph => {
            let site_config = config::load_config(&cli.source)?;
            let (_, graph) = pipeline::analyze(&cli.source, &site_config)?;
            output::print_graph(&graph);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

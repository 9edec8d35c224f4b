use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tutorial_site::{config, convert, output};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "tutorial-site")]
#[command(about = "Build the Node.js / Express.js tutorial pages from markdown")]
#[command(long_about = "\
Build the Node.js / Express.js tutorial pages from markdown

Each configured page is a (markdown input, HTML output, title) triple.
`convert` renders the markdown into a complete page with header,
breadcrumb, navigation buttons and footer. `update` retrofits that same
shell onto HTML pages that were produced without it.

Project layout:

  site/
  ├── config.toml              # Optional, see `tutorial-site gen-config`
  ├── nodejs-tutorial.md       # → nodejs-tutorial.html
  ├── express-tutorial.md      # → express-tutorial.html
  └── assets/
      ├── css/style.css        # Referenced by every page
      └── js/main.js

Missing inputs are skipped with a warning. Set RUST_LOG=debug for
per-step injection details.")]
#[command(version = version_string())]
struct Cli {
    /// Project root; page paths and config.toml are resolved against it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log progress at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every configured markdown page to HTML
    Convert,
    /// Inject the site shell into existing HTML pages, in place
    Update,
    /// Validate config.toml and report which page files exist
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Convert => {
            let site_config = config::load_config(&cli.root)?;
            init_thread_pool(&site_config.processing);
            let reports = convert::convert_pages(&cli.root, &site_config);
            output::print_convert_output(&reports);
            if convert::any_failed(&reports) {
                return Err("one or more pages failed to convert".into());
            }
        }
        Command::Update => {
            let site_config = config::load_config(&cli.root)?;
            init_thread_pool(&site_config.processing);
            let reports = convert::update_pages(&cli.root, &site_config);
            output::print_update_output(&reports);
            if convert::any_failed(&reports) {
                return Err("one or more pages failed to update".into());
            }
        }
        Command::Check => {
            println!("==> Checking {}", cli.root.display());
            let site_config = config::load_config(&cli.root)?;
            let checks = convert::check_pages(&cli.root, &site_config);
            output::print_check_output(&checks);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the fmt subscriber. `RUST_LOG` wins unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

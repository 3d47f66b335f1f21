use clap::{Parser, Subcommand};
use folio::output::{self, BuildTally};
use folio::{config, scaffold, site};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("FOLIO_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("FOLIO_GIT_HASH");
        if hash.is_empty() {
            concat!(env!("CARGO_PKG_VERSION"), "-dev")
        } else {
            // Leaked once at startup
            Box::leak(format!("{}-dev@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator: Markdown + Tera templates, everything else mirrored")]
#[command(long_about = "\
Static site generator: Markdown + Tera templates, everything else mirrored

Project layout:

  my-site/
  ├── folio.toml           # Optional config (see `folio gen-config`)
  ├── site/                # Source tree
  │   ├── index.md         # Rendered → _site/index.html
  │   └── css/style.css    # Copied   → _site/css/style.css
  └── templates/
      └── root.html        # Named by front matter

Pages open with TOML front matter between +++ lines:

  +++
  template = \"root.html\"
  title = \"Home\"
  +++
  # Home

Templates receive every front matter key plus `content`, the rendered body.

Run 'folio init' in an empty directory to get started.")]
#[command(version = version_string())]
struct Cli {
    /// Log debug details (skipped entries, loaded templates, each write)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the source tree into the target directory
    Build {
        /// Project root containing folio.toml and the source directory
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Create a starter project in an empty directory
    Init {
        /// Directory to initialize (defaults to the current directory)
        #[arg(short, long)]
        directory: Option<PathBuf>,
    },
    /// Print a stock folio.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build { root } => build(&root)?,
        Command::Init { directory } => {
            let dir = match directory {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            match scaffold::init_project(&dir) {
                Ok(created) => output::print_init_output(&dir, &created),
                Err(e) => {
                    output::print_errors(&[e.to_string()]);
                    std::process::exit(1);
                }
            }
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }
    Ok(())
}

fn build(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let site_config = config::load_config(root)?;
    if !site_config.is_valid() {
        output::print_errors(&site_config.errors);
        std::process::exit(1);
    }
    init_thread_pool(&site_config.processing);

    println!(
        "{}",
        output::format_build_header(&site_config.source, &site_config.target)
    );

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        let mut tally = BuildTally::default();
        for event in rx {
            tally.record(&event);
            println!("{}", output::format_build_event(&event));
        }
        tally
    });
    let errors = site::build_site_at(root, &site_config, Some(tx));
    let tally = printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;

    let target = root.join(&site_config.target);
    if errors.is_empty() {
        println!("{}", output::format_summary(&tally, &target));
        return Ok(());
    }

    output::print_errors(&errors);
    if tally.failed > 0 {
        println!("{}", output::format_summary(&tally, &target));
    }
    std::process::exit(1);
}

/// Install the `log` backend. Quiet unless something is wrong or
/// `--verbose` is set.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // Only fails if a logger is already installed
    let _ = SimpleLogger::new().with_level(level).init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down,
/// not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

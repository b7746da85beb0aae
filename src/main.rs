use clap::{Parser, Subcommand};
use sitebake::pipeline::{self, BuildOptions};
use sitebake::{config, logger, output};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("SITEBAKE_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("SITEBAKE_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "sitebake")]
#[command(about = "Asset build for small static sites")]
#[command(long_about = "\
Asset build for small static sites

Inlines HTML components, minifies the page, resizes every <img> that
declares width and height to exactly that size, copies static assets,
and compresses the remaining images.

Source structure:

  src/
  ├── index.html                   # Page; <component src=\"header.html\"></component>
  ├── components/                  # Fragments inlined into pages
  │   └── header.html
  ├── images/                      # Resized when referenced, compressed otherwise
  │   └── hero.jpg
  ├── assets/                      # Copied verbatim
  ├── styles.css                   # Copied verbatim
  └── script.js                    # Copied verbatim

Running with no command is the same as 'sitebake build'.
Run 'sitebake gen-config' to generate a documented sitebake.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ./sitebake.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Source directory, overriding the config file
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Output directory, overriding the config file
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Errors only (ignored with --verbose)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full build (default)
    Build {
        /// Remove the output directory first
        #[arg(long)]
        clean: bool,

        /// Write a JSON build report to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },
    /// Compose and scan pages without writing anything
    Check,
    /// Print a stock sitebake.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    let command = cli.command.unwrap_or(Command::Build {
        clean: false,
        report: None,
    });

    match command {
        Command::Build { clean, report } => {
            let config = resolve_config(cli.config.as_deref(), cli.source, cli.output)?;
            tracing::info!(
                "Building {} into {}",
                config.source.display(),
                config.output.display()
            );
            let result = pipeline::build(&config, &BuildOptions { clean })?;
            if let Some(path) = report {
                std::fs::write(&path, serde_json::to_string_pretty(&result)?)?;
                tracing::info!("Wrote build report to {}", path.display());
            }
            if cli.verbose || !cli.quiet {
                output::print_build_report(&result);
            }
            tracing::info!("Build completed!");
        }
        Command::Check => {
            let config = resolve_config(cli.config.as_deref(), cli.source, cli.output)?;
            let result = pipeline::check(&config)?;
            output::print_check_report(&result);
            if !result.is_clean() {
                return Err(format!("{} image problem(s) found", result.problems.len()).into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file, then apply command-line overrides and re-validate.
fn resolve_config(
    path: Option<&Path>,
    source: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<config::BuildConfig, config::ConfigError> {
    let mut config = match path {
        Some(path) => config::load_config(path)?,
        None => config::load_config_or_default(Path::new("."))?,
    };
    if let Some(source) = source {
        config.source = source;
    }
    if let Some(output) = output {
        config.output = output;
    }
    config.validate()?;
    Ok(config)
}

use clap::{Parser, Subcommand};
use futures::executor::block_on;
use simple_lightbox::dom::Document;
use simple_lightbox::gallery::{ApplyOutcome, Gallery};
use simple_lightbox::ready::await_ready;
use simple_lightbox::settings::{self, Overrides, Settings};
use simple_lightbox::{output, script};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simple-lightbox")]
#[command(about = "Inspect gallery discovery and replay lightbox sessions")]
#[command(long_about = "\
Inspect gallery discovery and replay lightbox sessions

Pages are JSON element trees. Every <img> and <video> is a gallery node,
unless the page has anchors marked data-attribute=\"SRL\": then only those
anchors are, and each opens its href.

  {
    \"tag\": \"div\",
    \"children\": [
      { \"tag\": \"img\", \"attrs\": { \"src\": \"dawn.jpg\", \"alt\": \"Dawn\" },
        \"natural_width\": 1600, \"natural_height\": 1067 },
      { \"tag\": \"img\", \"attrs\": { \"src\": \"gone.jpg\" }, \"load\": \"error\" }
    ]
  }

Scripts are one step per line:

  open <id>      click <n>      next      prev      goto <i>
  wait <ms>      close          remove <n>          touch

where <n> is a node's position in the latest discovery.

Run 'simple-lightbox gen-config' to generate a documented lightbox.toml.")]
#[command(version)]
struct Cli {
    /// Option overrides (TOML)
    #[arg(long, default_value = "lightbox.toml", global = true)]
    config: PathBuf,

    /// Print JSON instead of the text listing
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover a page's media, wait for readiness, print the catalogue
    Scan {
        /// Page description (JSON)
        page: PathBuf,
    },
    /// Replay a session script against a page
    Play {
        /// Page description (JSON)
        page: PathBuf,
        /// Session script
        script: PathBuf,
    },
    /// Print a stock lightbox.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan { page } => {
            let doc = Document::load(&page)?;
            let mut gallery = gallery_from_config(&cli.config)?;
            let snapshot = gallery.rescan(&doc);
            let report = block_on(await_ready(&doc, snapshot));
            let summary = report.clone();
            if gallery.apply(&doc, report) == ApplyOutcome::Stale {
                tracing::warn!("nodes left the page while loading");
            }
            let catalogue = gallery.session().catalogue();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(catalogue)?);
            } else {
                output::print_scan_output(&summary, catalogue);
            }
        }
        Command::Play { page, script } => {
            let mut doc = Document::load(&page)?;
            let steps = script::load_script(&script)?;
            let mut gallery = gallery_from_config(&cli.config)?;
            block_on(gallery.refresh(&doc, &doc));
            let reports = block_on(script::play(&mut gallery, &mut doc, &steps))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                output::print_play_output(&reports, gallery.session());
            }
        }
        Command::GenConfig => {
            print!("{}", settings::stock_config_toml());
        }
    }

    Ok(())
}

/// A gallery on stock settings with the config file's overrides applied.
fn gallery_from_config(path: &Path) -> Result<Gallery, settings::SettingsError> {
    let mut gallery = Gallery::new(Settings::default());
    let overrides = Overrides {
        options: settings::load_overrides(path)?,
        ..Overrides::default()
    };
    gallery.set_overrides(&overrides)?;
    Ok(gallery)
}

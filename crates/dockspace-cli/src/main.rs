mod manifest;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dockspace_config::Config;
use dockspace_layout::persist::ObjectDoc;
use dockspace_layout::{DockFrame, LayoutsDocument, Rectangle};
use manifest::Manifest;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default host area used when laying out from the command line
const DEFAULT_AREA: Rectangle = Rectangle {
    x: 0,
    y: 0,
    width: 1280,
    height: 800,
};

#[derive(Parser)]
#[command(name = "dockspace")]
#[command(about = "Inspect and generate dock layout files")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every layout of a layouts file as a tree
    Show {
        /// Layouts file (defaults to the configured one)
        file: Option<PathBuf>,
    },
    /// Validate a layouts file
    Check {
        /// Layouts file (defaults to the configured one)
        file: Option<PathBuf>,
    },
    /// Build the default layout for the items of a manifest
    Bootstrap {
        /// TOML manifest with one [[item]] table per dock item
        manifest: PathBuf,

        /// Write the layouts file here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Show { file } => {
            let path = layouts_file(&config, file)?;
            show(config, &path)
        }
        Commands::Check { file } => {
            let path = layouts_file(&config, file)?;
            check(&path)
        }
        Commands::Bootstrap { manifest, output } => bootstrap(config, &manifest, output.as_deref()),
    }
}

fn layouts_file(config: &Config, file: Option<PathBuf>) -> Result<PathBuf> {
    match file {
        Some(path) => Ok(path),
        None => config.layouts_path(),
    }
}

fn read_document(path: &Path) -> Result<LayoutsDocument> {
    let file = File::open(path).with_context(|| format!("Failed to open layouts file: {:?}", path))?;
    LayoutsDocument::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse layouts file: {:?}", path))
}

fn show(config: Config, path: &Path) -> Result<()> {
    let doc = read_document(path)?;

    // Register every referenced id so no leaf is dropped on load
    let mut frame = DockFrame::new(config);
    for id in doc.item_ids() {
        frame.add_item(&id)?;
    }
    frame.relayout(DEFAULT_AREA);
    frame.load_layouts_from_path(path)?;

    let current = frame.current_layout().map(str::to_string);
    for name in frame.layout_names() {
        let marker = if current.as_deref() == Some(name) { " (current)" } else { "" };
        println!("{}{}", name, marker);
        if let Some(tree) = frame.layout(name) {
            print!("{}", tree.dump());
        }
        println!();
    }
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let doc = read_document(path)?;

    println!("{} layouts, current: {}", doc.layouts.len(), doc.current.as_deref().unwrap_or("-"));
    for (name, root) in &doc.layouts {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        count_leaves(root, &mut counts);

        let leaves: usize = counts.values().sum();
        let mut duplicates: Vec<&str> = counts
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(id, _)| *id)
            .collect();
        duplicates.sort();

        if duplicates.is_empty() {
            println!("  {}: {} leaves", name, leaves);
        } else {
            println!("  {}: {} leaves, duplicate ids: {}", name, leaves, duplicates.join(", "));
        }
    }
    Ok(())
}

fn count_leaves<'a>(doc: &'a ObjectDoc, counts: &mut HashMap<&'a str, usize>) {
    match doc {
        ObjectDoc::Group(group) => {
            for child in &group.children {
                count_leaves(child, counts);
            }
        }
        ObjectDoc::Item(item) => *counts.entry(item.id.as_str()).or_insert(0) += 1,
    }
}

fn bootstrap(config: Config, manifest_path: &Path, output: Option<&Path>) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;

    let area = manifest
        .area
        .map(|area| Rectangle::new(0, 0, area.width, area.height))
        .unwrap_or(DEFAULT_AREA);

    let mut frame = DockFrame::new(config);
    manifest.register(&mut frame)?;
    frame.relayout(area);
    frame.ensure_default_layout();
    info!("Bootstrapped {} items", manifest.items.len());

    match output {
        Some(path) => frame.save_layouts_to_path(path),
        None => {
            frame
                .save_layouts(io::stdout().lock())
                .context("Failed to write layouts to stdout")?;
            println!();
            Ok(())
        }
    }
}

//! vxref CLI - Extract Kythe facts from Verilog indexing-facts trees

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vxref::config::{self, ExtractorOptions, XrefConfig};
use vxref::schema::EdgeKind;
use vxref::{
    ExtractionSummary, FactGraph, IndexingFactNode, IndexingFactType, JsonLinesEmitter,
    KytheFactsExtractor, ui,
};

#[derive(Parser)]
#[command(name = "vxref")]
#[command(version)]
#[command(about = "Verilog cross-reference extractor - indexing-facts tree to Kythe entries")]
#[command(long_about = r#"
vxref reads the indexing-facts tree of one Verilog file (as JSON) and writes
the Kythe facts and edges describing its declarations and references.

Example usage:
  vxref extract --tree top.facts.json --file rtl/top.sv > top.entries.json
  vxref stats --tree top.facts.json --file rtl/top.sv
  vxref init
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors (also set by VXREF_QUIET=1)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file (defaults to ./vxref.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract Kythe entries as JSON lines
    Extract {
        /// Indexing-facts tree as JSON
        #[arg(short, long)]
        tree: PathBuf,

        /// Path of the source file the tree was built from, as it should appear in VNames
        #[arg(short, long)]
        file: String,

        /// Write entries here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show statistics about the entries a tree produces
    Stats {
        /// Indexing-facts tree as JSON
        #[arg(short, long)]
        tree: PathBuf,

        /// Path of the source file the tree was built from
        #[arg(short, long)]
        file: String,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let quiet = cli.quiet || ui::quiet_from_env();
    ui::set_quiet(quiet);

    // Initialize logging; stdout is reserved for entries
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Extract { tree, file, output } => {
            let options = load_options(cli.config.as_deref())?;
            let root = read_tree(&tree)?;
            tracing::info!("Extracting {} ({})", file, tree.display());

            let extracted = match &output {
                Some(path) => extract_to_path(&root, &file, options, path),
                None => write_entries(&root, &file, options, std::io::stdout().lock()),
            };
            let (summary, entries) = match extracted {
                Ok(extracted) => extracted,
                Err(e) => {
                    ui::error(&format!("Extraction failed for {}: {}", file, e));
                    return Err(e.into());
                }
            };

            ui::extraction_report(&file, entries, &summary);
            if let Some(path) = output {
                ui::success(&format!("Entries written to {}", path.display()));
            }
        }

        Commands::Stats { tree, file } => {
            let options = load_options(cli.config.as_deref())?;
            let root = read_tree(&tree)?;

            let mut extractor = KytheFactsExtractor::new(&file, options, FactGraph::new());
            let summary = extractor.extract(&root)?;
            let graph = extractor.into_sink();
            let stats = graph.stats();

            ui::header(&format!("{} ({})", file, tree.display()));
            let mut rows = vec![
                ("Modules", root.count(IndexingFactType::Module).to_string()),
                ("Classes", root.count(IndexingFactType::Class).to_string()),
                ("Declarations", stats.declarations.to_string()),
                ("Anchors", stats.anchors.to_string()),
                ("Facts", stats.total_facts.to_string()),
                ("Edges", stats.total_edges.to_string()),
            ];
            for kind in EdgeKind::all() {
                rows.push((kind.as_str(), stats.edges_of(*kind).to_string()));
            }
            rows.push(("Unresolved references", summary.unresolved.to_string()));
            println!("{}", ui::stats_table(&rows));
        }

        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            config::write_config(&path, &XrefConfig::with_defaults(), force)?;
            ui::success(&format!("Wrote {}", path.display()));
        }
    }

    Ok(())
}

/// Extract `root` as JSON lines into `writer`; returns the summary and the entry count.
fn write_entries<W: Write>(
    root: &IndexingFactNode,
    file: &str,
    options: ExtractorOptions,
    writer: W,
) -> vxref::Result<(ExtractionSummary, usize)> {
    let mut extractor = KytheFactsExtractor::new(file, options, JsonLinesEmitter::new(BufWriter::new(writer)));
    let summary = extractor.extract(root)?;
    Ok((summary, extractor.into_sink().entries()))
}

/// Like [`write_entries`], but a failed extraction leaves no file at `path`.
fn extract_to_path(
    root: &IndexingFactNode,
    file: &str,
    options: ExtractorOptions,
    path: &Path,
) -> vxref::Result<(ExtractionSummary, usize)> {
    let created = std::fs::File::create(path)?;
    let extracted = write_entries(root, file, options, created);
    if extracted.is_err() {
        // The writer was dropped (and flushed) inside write_entries.
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
        }
    }
    extracted
}

fn load_options(path: Option<&Path>) -> anyhow::Result<ExtractorOptions> {
    let options = config::load_config(path)?
        .map(|config| config.options())
        .unwrap_or_default();
    tracing::debug!(?options, "extractor options");
    Ok(options)
}

fn read_tree(path: &Path) -> anyhow::Result<IndexingFactNode> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let root = serde_json::from_str(&contents)
        .with_context(|| format!("parsing indexing-facts tree {}", path.display()))?;
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vxref::Anchor;

    fn tree(children: Vec<IndexingFactNode>) -> IndexingFactNode {
        children
            .into_iter()
            .fold(IndexingFactNode::new(IndexingFactType::File), IndexingFactNode::with_child)
    }

    #[test]
    fn test_failed_extraction_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.entries.json");
        // The module is written before its anchorless child aborts the run.
        let module = IndexingFactNode::new(IndexingFactType::Module)
            .with_anchor(Anchor::new("foo", 7))
            .with_child(IndexingFactNode::new(IndexingFactType::VariableReference));

        let result = extract_to_path(&tree(vec![module]), "top.sv", ExtractorOptions::default(), &path);
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_successful_extraction_keeps_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.entries.json");
        let module = IndexingFactNode::new(IndexingFactType::Module).with_anchor(Anchor::new("foo", 7));

        let (summary, entries) =
            extract_to_path(&tree(vec![module]), "top.sv", ExtractorOptions::default(), &path).unwrap();
        assert_eq!(summary.definitions, 1);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), entries);
    }
}

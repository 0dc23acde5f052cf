//! Command line interface for the paperlens paper analysis pipeline.

use std::path::PathBuf;

use clap::{builder::ArgAction, Parser, Subcommand, ValueEnum};
use console::{style, Emoji};
use errors::PaperlensCliError;
use paperlens::{
  Analyzer, AnalyzerConfig, CitationGraphBuilder, HttpOracle, ParseRequest, PdfSource, Summarizer,
  SummaryMode,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod errors;

static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static GRAPH: Emoji<'_, '_> = Emoji("🕸️  ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✨ ", "");

#[derive(Parser)]
#[command(author, version, about = "Parse, summarize, and graph academic papers from PDF")]
struct Cli {
  /// Verbose mode (-v, -vv, -vvv)
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

/// Summary granularity selector for the `summarize` command.
#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
  /// One short summary of the whole paper
  Short,
  /// One summary per detected section
  Long,
  /// Both the short and the per-section summaries
  Both,
}

impl From<ModeArg> for SummaryMode {
  fn from(mode: ModeArg) -> Self {
    match mode {
      ModeArg::Short => SummaryMode::Short,
      ModeArg::Long => SummaryMode::Long,
      ModeArg::Both => SummaryMode::Both,
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Extract and structure the text of a PDF, no network access
  Parse {
    /// Path to the PDF file
    pdf:  PathBuf,
    /// Emit the structured result as JSON instead of a listing
    #[arg(long)]
    json: bool,
  },
  /// Summarize a PDF, using the configured oracle when available
  Summarize {
    /// Path to the PDF file
    pdf:  PathBuf,
    /// Summary granularity
    #[arg(long, value_enum, default_value = "short")]
    mode: ModeArg,
  },
  /// Build the citation graph of a PDF and print its Mermaid code
  Graph {
    /// Path to the PDF file
    pdf:    PathBuf,
    /// Write the Mermaid code to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
  },
  /// Run the full pipeline and emit a Markdown digest
  Analyze {
    /// Path to the PDF file
    pdf:      PathBuf,
    /// arXiv identifier for metadata lookup
    #[arg(long)]
    arxiv_id: Option<String>,
    /// DOI for metadata lookup
    #[arg(long)]
    doi:      Option<String>,
    /// Paper title hint for metadata lookup
    #[arg(long)]
    title:    Option<String>,
    /// Emit the full analysis as JSON instead of Markdown
    #[arg(long)]
    json:     bool,
    /// Write the digest to this file instead of stdout
    #[arg(long, short)]
    output:   Option<PathBuf>,
  },
}

/// Setup logging with the specified verbosity level
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

#[tokio::main]
async fn main() -> Result<(), PaperlensCliError> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);
  let config = AnalyzerConfig::default();

  match cli.command {
    Commands::Parse { pdf, json } => {
      println!("{} Parsing: {}", style(LOOKING_GLASS).cyan(), style(pdf.display()).yellow());

      let analyzer = Analyzer::rule_based(&config);
      let parsed = analyzer.parse(&PdfSource::Path(pdf))?;
      debug!("parsed stats: {:?}", parsed.stats);

      if json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
      }

      println!(
        "\n{} {} of {} pages, {} figures, {} formulas",
        style(SUCCESS).green(),
        style(parsed.stats.processed_pages).yellow(),
        style(parsed.stats.total_pages).yellow(),
        style(parsed.stats.figure_count).yellow(),
        style(parsed.stats.formula_count).yellow()
      );
      for (section, text) in &parsed.text.sections {
        println!(
          "   {} {} words",
          style(format!("{section}:")).green().bold(),
          style(text.split_whitespace().count()).white()
        );
      }
      if !parsed.text.references.is_empty() {
        println!(
          "   {} {} entries",
          style("References:").green().bold(),
          style(parsed.text.references.len()).white()
        );
      }
      Ok(())
    },

    Commands::Summarize { pdf, mode } => {
      println!("{} Summarizing: {}", style(LOOKING_GLASS).cyan(), style(pdf.display()).yellow());

      let analyzer = Analyzer::rule_based(&config);
      let parsed = analyzer.parse(&PdfSource::Path(pdf))?;

      let summarizer = match HttpOracle::from_env(config.oracle_timeout) {
        Some(oracle) => Summarizer::with_oracle(oracle, &config),
        None => {
          println!("{} No oracle configured, using extractive summaries", style(WARNING).yellow());
          Summarizer::rule_based(&config)
        },
      };
      let summary = summarizer.summarize(&parsed.text, mode.into()).await;

      if let Some(short) = &summary.short_summary {
        println!("\n{} Summary:", style(PAPER).green());
        println!("{short}");
      }
      if let Some(long) = &summary.long_summary {
        for (section, text) in &long.sections {
          println!("\n{}", style(section).green().bold());
          println!("{text}");
        }
      }
      if !summary.keywords.is_empty() {
        let terms: Vec<&str> = summary.keywords.iter().map(|k| k.term.as_str()).collect();
        println!("\n{} {}", style("Keywords:").green().bold(), style(terms.join(", ")).white());
      }
      Ok(())
    },

    Commands::Graph { pdf, output } => {
      println!(
        "{} Building citation graph: {}",
        style(GRAPH).cyan(),
        style(pdf.display()).yellow()
      );

      let analyzer = Analyzer::rule_based(&config);
      let parsed = analyzer.parse(&PdfSource::Path(pdf))?;
      let graph = CitationGraphBuilder::new(&config).build(&parsed.text);
      println!(
        "{} {} references, {} cited in text",
        style(SUCCESS).green(),
        style(graph.references.len()).yellow(),
        style(graph.edges.len()).yellow()
      );

      match output {
        Some(path) => {
          std::fs::write(&path, &graph.mermaid_code)?;
          println!("{} Mermaid code written to {}", style(SUCCESS).green(), path.display());
        },
        None => println!("\n{}", graph.mermaid_code),
      }
      Ok(())
    },

    Commands::Analyze { pdf, arxiv_id, doi, title, json, output } => {
      println!("{} Analyzing: {}", style(LOOKING_GLASS).cyan(), style(pdf.display()).yellow());

      let analyzer = Analyzer::from_env(&config);
      let request = ParseRequest { arxiv_id, doi, title };
      let analysis = analyzer.analyze(&PdfSource::Path(pdf), &request).await?;

      let rendered =
        if json { serde_json::to_string_pretty(&analysis)? } else { analysis.to_markdown() };
      match output {
        Some(path) => {
          std::fs::write(&path, rendered)?;
          println!("{} Digest written to {}", style(SUCCESS).green(), path.display());
        },
        None => println!("{rendered}"),
      }
      Ok(())
    },
  }
}

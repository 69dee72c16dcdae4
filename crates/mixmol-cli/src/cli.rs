//! Command-line interface for the mixmol utility
//!
//! Reads typed recipe notation or JSON and prints the molecule layout as
//! JSON or as a text preview.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::colorizer::colorize_preview;
use mixmol::core::logging::init_logging;
use mixmol::layout::Phase;
use mixmol::preview::{node_glyph, PreviewConfig, PreviewRenderer};
use mixmol::recipe::{detect_format, parse_recipe_as, RecipeFormat};
use mixmol::{ClassifiedIngredient, IngredientType, LayoutOptions, MoleculeLayoutAlgorithm};

/// mixmol - lay out cocktail recipes as molecule diagrams
#[derive(Parser)]
#[command(name = "mixmol")]
#[command(about = "Lay out cocktail recipes as molecular-structure diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Canvas flags shared by the layout and preview commands
#[derive(clap::Args, Clone, Copy, Debug, PartialEq)]
pub struct CanvasArgs {
    /// Canvas width
    #[arg(long, default_value_t = 400.0)]
    pub width: f64,

    /// Canvas height
    #[arg(long, default_value_t = 300.0)]
    pub height: f64,

    /// Radius of non-spirit nodes
    #[arg(long, default_value_t = 14.0)]
    pub base_radius: f64,
}

impl CanvasArgs {
    /// Build validated layout options
    pub fn options(&self) -> Result<LayoutOptions> {
        let options = LayoutOptions::new(self.width, self.height).with_base_radius(self.base_radius);
        options.validate()?;
        Ok(options)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lay out a recipe and print the result as JSON
    Layout {
        /// Recipe file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Recipe format; detected from the input when omitted
        #[arg(long, value_enum)]
        format: Option<InputFormat>,

        #[command(flatten)]
        canvas: CanvasArgs,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Lay out a recipe and draw it as text
    Preview {
        /// Recipe file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Recipe format; detected from the input when omitted
        #[arg(long, value_enum)]
        format: Option<InputFormat>,

        #[command(flatten)]
        canvas: CanvasArgs,

        /// Restrict output to ASCII characters
        #[arg(long)]
        ascii: bool,

        /// Leave out the glyph legend
        #[arg(long)]
        no_legend: bool,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Check that a recipe parses
    Validate {
        /// Recipe file to validate (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Recipe format; detected from the input when omitted
        #[arg(long, value_enum)]
        format: Option<InputFormat>,
    },

    /// Show ingredient types and how they are placed
    Types {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Recipe input formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum InputFormat {
    Notation,
    Json,
}

impl From<InputFormat> for RecipeFormat {
    fn from(value: InputFormat) -> Self {
        match value {
            InputFormat::Notation => RecipeFormat::Notation,
            InputFormat::Json => RecipeFormat::Json,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
pub struct MixmolApp {
    algorithm: MoleculeLayoutAlgorithm,
}

impl MixmolApp {
    pub fn new() -> Self {
        Self {
            algorithm: MoleculeLayoutAlgorithm::new(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("MIXMOL_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("MIXMOL_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("mixmol v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Layout {
                input,
                output,
                format,
                canvas,
                pretty,
            } => self.layout_command(input, output, format, canvas, pretty, cli.verbose),
            Commands::Preview {
                input,
                output,
                format,
                canvas,
                ascii,
                no_legend,
                color,
            } => {
                let config = PreviewConfig {
                    ascii,
                    show_legend: !no_legend,
                    ..Default::default()
                };
                self.preview_command(input, output, format, canvas, config, color, cli.verbose)
            }
            Commands::Validate { input, format } => self.validate_command(input, format, cli.verbose),
            Commands::Types { json } => self.types_command(json, cli.verbose),
        }
    }

    /// Read and parse a recipe
    fn load_recipe(
        &self,
        input: Option<PathBuf>,
        format: Option<InputFormat>,
        verbose: bool,
    ) -> Result<Vec<ClassifiedIngredient>> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        let format = format
            .map(RecipeFormat::from)
            .unwrap_or_else(|| detect_format(&content));
        debug!(%format, "Reading recipe");
        Ok(parse_recipe_as(&content, format)?)
    }

    /// Handle the layout command
    fn layout_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        format: Option<InputFormat>,
        canvas: CanvasArgs,
        pretty: bool,
        verbose: bool,
    ) -> Result<()> {
        let options = canvas.options()?;
        let ingredients = self.load_recipe(input, format, verbose)?;
        let layout = self.algorithm.layout(&ingredients, &options);
        info!(node_count = layout.nodes.len(), "Computed layout");

        let json = if pretty {
            serde_json::to_string_pretty(&layout)?
        } else {
            serde_json::to_string(&layout)?
        };
        self.write_output(output, &json)
    }

    /// Handle the preview command
    #[allow(clippy::too_many_arguments)]
    fn preview_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        format: Option<InputFormat>,
        canvas: CanvasArgs,
        config: PreviewConfig,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<()> {
        let options = canvas.options()?;
        let ingredients = self.load_recipe(input, format, verbose)?;
        let layout = self.algorithm.layout(&ingredients, &options);

        let text = PreviewRenderer::with_config(config).render_layout(&layout, &options);
        if verbose {
            eprintln!(
                "Placed {} nodes ({} junctions, {} rings)",
                layout.nodes.len(),
                layout.junction_count,
                layout.ring_count
            );
        }

        let text = if self.should_colorize(&output, color) {
            colorize_preview(&text)
        } else {
            text
        };
        self.write_output(output, &text)
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: &Option<PathBuf>, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                    Some(ref p) if p.to_str() == Some("-") => {
                        crossterm::tty::IsTty::is_tty(&std::io::stdout())
                    }
                    Some(_) => false,
                }
            }
        }
    }

    /// Handle the validate command
    fn validate_command(
        &self,
        input: Option<PathBuf>,
        format: Option<InputFormat>,
        verbose: bool,
    ) -> Result<()> {
        match self.load_recipe(input, format, verbose) {
            Ok(ingredients) => {
                let spirits = ingredients
                    .iter()
                    .filter(|i| i.kind == IngredientType::Spirit)
                    .count();
                println!(
                    "✓ Valid recipe: {} ingredients ({} spirits)",
                    ingredients.len(),
                    spirits
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid recipe: {}", e);
                Err(e)
            }
        }
    }

    /// Handle the types command
    fn types_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing ingredient types");
        }

        let types = type_table();
        if json {
            let entries: Vec<_> = types
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "name": t.kind.as_str(),
                        "phase": t.phase,
                        "role": t.role,
                        "glyph": t.glyph.to_string(),
                    })
                })
                .collect();
            let doc = serde_json::json!({
                "types": entries,
                "total": types.len(),
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        } else {
            println!("Ingredient types (in placement order):");
            for t in &types {
                println!("  {}  {:<9} {:<8} {}", t.glyph, t.kind.as_str(), t.role, t.phase);
            }
            println!();
            println!("Total: {} ingredient types", types.len());
        }
        Ok(())
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for MixmolApp {
    fn default() -> Self {
        Self::new()
    }
}

/// One row of the `types` listing
struct TypeRow {
    kind: IngredientType,
    phase: &'static str,
    role: &'static str,
    glyph: char,
}

/// Types in the order the layout places them
fn type_table() -> Vec<TypeRow> {
    let mut rows: Vec<TypeRow> = IngredientType::ALL
        .iter()
        .copied()
        .filter(|k| *k != IngredientType::Junction)
        .map(|kind| {
            let phase = if kind == IngredientType::Spirit {
                "spirit"
            } else {
                Phase::for_kind(kind).as_str()
            };
            let role = if kind == IngredientType::Spirit {
                "backbone"
            } else if kind.is_inline() {
                "inline"
            } else if kind.is_terminal() {
                "terminal"
            } else {
                "other"
            };
            TypeRow {
                kind,
                phase,
                role,
                glyph: node_glyph(kind, false),
            }
        })
        .collect();

    let rank = |kind: IngredientType| {
        if kind == IngredientType::Spirit {
            0
        } else {
            Phase::ORDER
                .iter()
                .position(|p| *p == Phase::for_kind(kind))
                .map_or(Phase::ORDER.len(), |i| i + 1)
        }
    };
    rows.sort_by_key(|row| rank(row.kind));
    rows
}

//! Topologic - n-dimensional model renderer
//!
//! Renders a model to a vector document, or dumps the drawing operations of
//! a raster frame. The scene comes from configuration, optionally overridden
//! by a metadata document (a rendered SVG or a JSON value tree).

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use topologic::config::AppConfig;
use topologic::context::{Context, ContextError};
use topologic::logging::init_logging;
use topologic_core::Frame;
use topologic_render::{replay, OutputMode, RecordingContext};

#[derive(Parser)]
#[command(name = "topologic", about = "Render n-dimensional models and reproduce them from metadata")]
struct Cli {
    /// Metadata document to load (`.json` for a value tree, anything else for XML/SVG)
    input: Option<PathBuf>,
    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Print the value-tree encoding instead of rendering
    #[arg(long, conflicts_with = "describe")]
    json: bool,
    /// Print the attribute-tree encoding instead of rendering
    #[arg(long)]
    describe: bool,
    /// Produce raster drawing operations instead of a vector document
    #[arg(long)]
    raster: bool,
    /// Directory holding default.toml and user.toml
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,
}

fn run(cli: Cli) -> Result<(), ContextError> {
    let mut config = AppConfig::load_from(&cli.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    if cli.raster {
        config.output.mode = OutputMode::Raster;
    }
    init_logging(&config.debug.log_level);

    let mut context = Context::start(&config);
    if let Some(input) = &cli.input {
        if !context.load_file(input)? {
            log::warn!("{} declares no usable model; keeping {}", input.display(), context.model().id);
        }
    }

    let output = if cli.json {
        format!("{:#}\n", context.to_json())
    } else if cli.describe {
        format!("{}\n", context.describe())
    } else {
        match context.render() {
            Some(Frame::Vector(doc)) => doc,
            Some(Frame::Raster(commands)) => {
                let mut recorder = RecordingContext::new();
                replay(&commands, &mut recorder);
                recorder.operations.join("\n") + "\n"
            }
            None => {
                log::error!("no model to render");
                String::new()
            }
        }
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, output)?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{}", output),
    }

    context.exit();
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("topologic: {}", e);
            ExitCode::FAILURE
        }
    }
}

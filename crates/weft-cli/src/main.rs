use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use weft_cropper::{PixelRect, Size};
use weft_editor_core::{
    EditorConfig, Preview, ReferenceRegistry, Variable, VariableInserter, render_preview,
    variable_legend,
};

mod crop;
mod session;

#[derive(Parser)]
#[command(version, about = "Weft - rich-text template editor toolkit", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Editor configuration (JSON)
    #[arg(long, global = true, env = "WEFT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the live preview of a template
    Render {
        /// Template markup file
        file: PathBuf,

        /// Sample value, as name=value (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
    },
    /// Crop an image the way the editor's crop modal does
    Crop {
        image: PathBuf,

        /// Displayed preview size; defaults to the modal's fit
        #[arg(long, value_name = "WxH", value_parser = parse_size)]
        display: Option<Size>,

        /// Crop rectangle in displayed pixels; defaults to the centred half
        #[arg(long, value_name = "X,Y,W,H", value_parser = parse_rect)]
        rect: Option<PixelRect>,

        /// Where to write the JPEG
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Replay a JSON script of editor operations and print the result
    Session { script: PathBuf },
    /// List the variables offered by the inserter
    Variables {
        #[arg(long = "var", value_name = "NAME[=VALUE]")]
        vars: Vec<String>,
    },
}

fn main() -> Result<()> {
    init_miette();
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { file, vars } => {
            let content = std::fs::read_to_string(&file).into_diagnostic()?;
            let variables = merged_variables(&config, &vars)?;
            match render_preview(&content, &variables, &config.preview) {
                Preview::Empty { placeholder } => println!("{placeholder}"),
                Preview::Rendered { html } => println!("{html}"),
            }
            let legend = variable_legend(&variables);
            if !legend.is_empty() {
                eprintln!("\nAvailable variables:");
                for line in legend {
                    eprintln!("  {line}");
                }
            }
        }
        Commands::Crop {
            image,
            display,
            rect,
            output,
        } => {
            let registry = Rc::new(ReferenceRegistry::new());
            let file = crop::read_image_file(&image)?;
            let request = crop::CropRequest { display, rect };
            let cropped = crop::run(file, &registry, &config, &request)?;
            std::fs::write(&output, &cropped.bytes).into_diagnostic()?;
            println!("wrote {} ({}) to {}", cropped.reference, cropped.size, output.display());
        }
        Commands::Session { script } => {
            let report = session::run_file(&script, config)?;
            println!("{}", report.content);
            tracing::info!(
                notifications = report.notifications.len(),
                failures = report.failures,
                "session finished"
            );
        }
        Commands::Variables { vars } => {
            let variables = merged_variables(&config, &vars)?;
            let inserter = VariableInserter::new(variables.iter().map(|v| v.name.clone()))?;
            for name in inserter.names() {
                match variables.iter().find(|v| v.name == *name).and_then(|v| v.value.as_deref()) {
                    Some(value) => println!("{name}\t{value}"),
                    None => println!("{name}"),
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    Ok(match path {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    })
}

/// Config variables overridden by `--var` flags of the same name.
fn merged_variables(config: &EditorConfig, flags: &[String]) -> Result<Vec<Variable>> {
    let mut variables = config.variables.clone();
    for flag in flags {
        let variable = Variable::parse_pair(flag)?;
        match variables.iter_mut().find(|v| v.name == variable.name) {
            Some(existing) => *existing = variable,
            None => variables.push(variable),
        }
    }
    Ok(variables)
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got `{s}`"))?;
    let dim = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("`{v}`: {e}"));
    Ok(Size::new(dim(w)?, dim(h)?))
}

fn parse_rect(s: &str) -> Result<PixelRect, String> {
    let parts = s
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("`{v}`: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts[..] {
        [x, y, width, height] => Ok(PixelRect::new(x, y, width, height)),
        _ => Err(format!("expected X,Y,W,H, got `{s}`")),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("WEFT_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}

//! The command line interface for rendering migration maps.
use crate::controller::{Controller, SvgFileSurface};
use crate::log;
use crate::model::MapModel;
use crate::output::{create_output_directory, get_output_dir, write_maps, write_metadata};
use crate::settings::Settings;
use crate::year::YearSelection;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The file name of the map shown in interactive mode
const INTERACTIVE_FILE_NAME: &str = "current.svg";

/// The command line interface for rendering migration maps.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the render command
#[derive(Args, Default)]
pub struct RenderOpts {
    /// Years to render: "all", a single year or a semicolon-separated list. Defaults to the map's
    /// default year.
    #[arg(short, long)]
    pub years: Option<YearSelection>,
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Render maps for one or more years to SVG files.
    Render {
        /// Path to the map directory.
        map_dir: PathBuf,
        /// Other render options
        #[command(flatten)]
        opts: RenderOpts,
    },
    /// Step through the years of a map interactively.
    Interactive {
        /// Path to the map directory.
        map_dir: PathBuf,
        /// Directory for the displayed map
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Validate a map directory.
    Validate {
        /// The path to the map directory.
        map_dir: PathBuf,
    },
    /// Manage example maps.
    Example {
        /// The available subcommands for managing example maps.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Render { map_dir, opts } => handle_render_command(&map_dir, &opts, None),
            Self::Interactive {
                map_dir,
                output_dir,
            } => handle_interactive_command(&map_dir, output_dir.as_deref(), None),
            Self::Validate { map_dir } => handle_validate_command(&map_dir, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ migration-map --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Resolve the output folder, falling back on the default for the map
fn resolve_output_dir(map_dir: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    match output_dir {
        Some(p) => Ok(p.to_path_buf()),
        None => get_output_dir(map_dir),
    }
}

/// Handle the `render` command.
pub fn handle_render_command(
    map_path: &Path,
    opts: &RenderOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Get path to output folder
    let output_path = resolve_output_dir(map_path, opts.output_dir.as_deref())?;
    let overwrite = create_output_directory(&output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(&output_path))
        .context("Failed to initialise logging.")?;

    // Load the map to render
    let model = MapModel::from_path(map_path).context("Failed to load map.")?;
    info!("Loaded map from {}", map_path.display());
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Files in output folder will be overwritten");
    }

    let years = match &opts.years {
        Some(selection) => selection.resolve(&model.flow_years())?,
        None => vec![model.default_year()],
    };

    write_maps(&model, &years, &output_path)?;
    write_metadata(&output_path, map_path, &years).context("Failed to save metadata.")?;
    info!("Rendering complete!");

    Ok(())
}

/// Handle the `interactive` command.
pub fn handle_interactive_command(
    map_path: &Path,
    output_dir: Option<&Path>,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let output_path = resolve_output_dir(map_path, output_dir)?;
    create_output_directory(&output_path, true).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_path.display()
        )
    })?;

    // Log files aren't useful when stepping through years by hand
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    let model = Arc::new(MapModel::from_path(map_path).context("Failed to load map.")?);
    let surface = SvgFileSurface::new(
        output_path.join(INTERACTIVE_FILE_NAME),
        model.parameters.figure.clone(),
    );
    let controller = Controller::new(model, surface)?;

    let stdin = std::io::stdin();
    run_interactive(controller, stdin.lock(), std::io::stdout())
}

/// A command entered in interactive mode
#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    /// Select a specific year
    Select(u32),
    /// Move the selection by a number of years
    Step(i32),
    /// Stop
    Quit,
}

/// Parse a line of input in interactive mode
fn parse_interactive_command(line: &str) -> Option<InteractiveCommand> {
    match line.trim() {
        "q" | "quit" => Some(InteractiveCommand::Quit),
        "+" => Some(InteractiveCommand::Step(1)),
        "-" => Some(InteractiveCommand::Step(-1)),
        s => s.parse().ok().map(InteractiveCommand::Select),
    }
}

/// Drive a controller from lines of input until the input ends or the user quits
fn run_interactive<R, W>(
    mut controller: Controller<SvgFileSurface>,
    input: R,
    mut out: W,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    let bounds = controller.year_bounds();
    writeln!(
        out,
        "Showing {} in {}. Enter a year ({}-{}), + or - to step, or q to quit.",
        controller.selected_year(),
        controller.surface().path().display(),
        bounds.start(),
        bounds.end()
    )?;

    for line in input.lines() {
        let line = line?;
        let scene = match parse_interactive_command(&line) {
            Some(InteractiveCommand::Quit) => break,
            Some(InteractiveCommand::Select(year)) => controller.on_year_changed(year)?,
            Some(InteractiveCommand::Step(delta)) => controller.step(delta)?,
            None => {
                writeln!(out, "Unrecognised input: {}", line.trim())?;
                continue;
            }
        };
        writeln!(
            out,
            "Year {}: {} flow(s)",
            scene.year,
            scene.segments.len()
        )?;
    }

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(map_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    // Load/validate the map
    MapModel::from_path(map_path).context("Failed to validate map.")?;
    info!("Map validation successful!");

    Ok(())
}

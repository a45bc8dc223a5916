//! The `example` subcommands, for the demo maps bundled into the binary.
use super::{RenderOpts, handle_render_command};
use crate::settings::Settings;
use anyhow::{Context, Result, ensure};
use clap::Subcommand;
use include_dir::{Dir, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One subfolder per demo map
static EXAMPLES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/demos");

/// The file describing each demo map
const README_FILE_NAME: &str = "README.txt";

/// The available subcommands for managing example maps.
#[derive(Subcommand)]
pub enum ExampleSubcommands {
    /// List available examples.
    List,
    /// Print the description of an example.
    Info {
        /// The name of the example.
        name: String,
    },
    /// Copy an example's input files to a new folder.
    Extract {
        /// The name of the example to extract.
        name: String,
        /// The folder to create. Defaults to the example's name.
        new_path: Option<PathBuf>,
    },
    /// Render an example.
    Render {
        /// The name of the example to render.
        name: String,
        /// Other render options
        #[command(flatten)]
        opts: RenderOpts,
    },
}

impl ExampleSubcommands {
    /// Execute the supplied example subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => {
                for name in example_names() {
                    println!("{name}");
                }
            }
            Self::Info { name } => println!("{}", example_readme(&name)?),
            Self::Extract { name, new_path } => {
                let new_path = new_path.unwrap_or_else(|| PathBuf::from(&name));
                extract_example(&name, &new_path)?;
            }
            Self::Render { name, opts } => handle_example_render_command(&name, &opts, None)?,
        }

        Ok(())
    }
}

/// Names of the bundled examples
pub fn example_names() -> impl Iterator<Item = &'static str> {
    EXAMPLES_DIR
        .dirs()
        .filter_map(|dir| dir.path().file_name()?.to_str())
}

/// Get the folder for the named example
fn find_example(name: &str) -> Result<&'static Dir<'static>> {
    EXAMPLES_DIR
        .get_dir(name)
        .with_context(|| format!("Example not found: {name}"))
}

/// The README text for the named example
fn example_readme(name: &str) -> Result<&'static str> {
    find_example(name)?
        .get_file(Path::new(name).join(README_FILE_NAME))
        .with_context(|| format!("Example {name} has no {README_FILE_NAME}"))?
        .contents_utf8()
        .with_context(|| format!("{README_FILE_NAME} is not UTF-8 encoded"))
}

/// Copy the files of the named example into a new folder at `new_path`
pub fn extract_example(name: &str, new_path: &Path) -> Result<()> {
    let example = find_example(name)?;
    ensure!(
        example.dirs().next().is_none(),
        "Example {name} contains subfolders, which cannot be extracted"
    );
    ensure!(
        !new_path.exists(),
        "Destination directory {} already exists",
        new_path.display()
    );

    fs::create_dir_all(new_path)
        .with_context(|| format!("Could not create {}", new_path.display()))?;
    for file in example.files() {
        let file_name = file
            .path()
            .file_name()
            .context("Example file has no name")?;
        fs::write(new_path.join(file_name), file.contents())?;
    }

    Ok(())
}

/// Handle the `example render` command.
///
/// The example is extracted to a temporary folder, which is removed once rendering finishes.
pub fn handle_example_render_command(
    name: &str,
    opts: &RenderOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let map_path = temp_dir.path().join(name);
    extract_example(name, &map_path)?;
    handle_render_command(&map_path, opts, settings)
}

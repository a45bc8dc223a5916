//! The module responsible for writing rendered maps to disk.
use crate::model::MapModel;
use anyhow::{Context, Result, ensure};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;
pub use metadata::write_metadata;

/// The root folder in which map-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "migration_map_results";

/// Get the default output folder for the map in the specified directory
pub fn get_output_dir(map_dir: &Path) -> Result<PathBuf> {
    // Get the map name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors.
    let map_dir = map_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to map")?;

    let map_name = map_dir
        .file_name()
        .context("Map cannot be in root folder")?
        .to_str()
        .context("Invalid chars in map dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, map_name].iter().collect())
}

/// Create a new output directory, if it doesn't already exist.
///
/// An existing folder which already has files in it is only reused if `allow_overwrite` is true.
///
/// # Returns
///
/// Whether existing files may be overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        let is_empty = fs::read_dir(output_dir)?.next().is_none();
        ensure!(
            is_empty || allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite to replace its contents."
        );

        return Ok(!is_empty);
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Get the file name for the map of the given year
pub fn map_file_name(year: u32) -> String {
    format!("migration_map_{year}.svg")
}

/// Render the given years of a map and write each to an SVG file in `output_path`.
///
/// # Returns
///
/// The paths of the files written, in the same order as `years`.
pub fn write_maps(model: &MapModel, years: &[u32], output_path: &Path) -> Result<Vec<PathBuf>> {
    years
        .iter()
        .map(|&year| {
            let scene = model.render(year);
            let svg = scene.to_svg(&model.parameters.figure)?;
            let file_path = output_path.join(map_file_name(year));
            fs::write(&file_path, svg)
                .with_context(|| format!("Could not write {}", file_path.display()))?;
            info!(
                "Wrote map for {year} with {} flow(s) to {}",
                scene.segments.len(),
                file_path.display()
            );

            Ok(file_path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::map_model;
    use rstest::rstest;
    use tempfile::tempdir;

    #[test]
    fn test_create_output_directory_new() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("a").join("b");
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());
    }

    #[test]
    fn test_create_output_directory_existing() {
        let dir = tempdir().unwrap();

        // Empty folder can be reused
        assert!(!create_output_directory(dir.path(), false).unwrap());

        // Non-empty folder needs overwrite
        fs::write(dir.path().join("file.txt"), "").unwrap();
        assert!(create_output_directory(dir.path(), false).is_err());
        assert!(create_output_directory(dir.path(), true).unwrap());
    }

    #[test]
    fn test_get_output_dir() {
        let dir = tempdir().unwrap();
        let map_dir = dir.path().join("yangtze");
        fs::create_dir(&map_dir).unwrap();
        assert_eq!(
            get_output_dir(&map_dir).unwrap(),
            PathBuf::from(OUTPUT_DIRECTORY_ROOT).join("yangtze")
        );
    }

    #[rstest]
    fn test_write_maps(map_model: MapModel) {
        let dir = tempdir().unwrap();
        let paths = write_maps(&map_model, &[2020, 2022], dir.path()).unwrap();
        assert_eq!(
            paths,
            [
                dir.path().join("migration_map_2020.svg"),
                dir.path().join("migration_map_2022.svg")
            ]
        );
        for (path, year) in paths.iter().zip([2020, 2022]) {
            let svg = fs::read_to_string(path).unwrap();
            assert!(svg.contains(&format!("Year {year}")));
        }
    }
}

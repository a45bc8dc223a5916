//! Code for reading migration flow records from a CSV file.
use super::*;
use crate::flow::FlowRecord;
use anyhow::Result;
use std::path::Path;

const FLOWS_FILE_NAME: &str = "flows.csv";

/// Read the migration flow records from the map directory.
///
/// # Arguments
///
/// * `map_dir` - Folder containing map input files
///
/// # Returns
///
/// The flow records in file order, or an error if the file is missing, empty or malformed.
pub fn read_flows(map_dir: &Path) -> Result<Vec<FlowRecord>> {
    let file_path = map_dir.join(FLOWS_FILE_NAME);
    Ok(read_csv(&file_path)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    /// Create an example flows file in dir_path
    fn create_flows_file(dir_path: &Path, contents: &str) {
        let file_path = dir_path.join(FLOWS_FILE_NAME);
        let mut file = File::create(file_path).unwrap();
        writeln!(file, "{contents}").unwrap();
    }

    #[test]
    fn test_read_flows() {
        let dir = tempdir().unwrap();
        create_flows_file(
            dir.path(),
            "city1,city2,year,avg_migration_index
Shanghai,Suzhou,2018,5123.5
Hangzhou,Ningbo,2019,250",
        );
        let flows = read_flows(dir.path()).unwrap();
        assert_eq!(
            flows,
            [
                FlowRecord {
                    city1: "Shanghai".into(),
                    city2: "Suzhou".into(),
                    year: 2018,
                    intensity: 5123.5,
                },
                FlowRecord {
                    city1: "Hangzhou".into(),
                    city2: "Ningbo".into(),
                    year: 2019,
                    intensity: 250.0,
                },
            ]
        );
    }

    #[test]
    fn test_read_flows_malformed() {
        let dir = tempdir().unwrap();
        create_flows_file(
            dir.path(),
            "city1,city2,year,avg_migration_index
Shanghai,Suzhou,twenty,5123.5",
        );
        assert!(read_flows(dir.path()).is_err());
    }

    #[test]
    fn test_read_flows_missing_file() {
        let dir = tempdir().unwrap();
        assert!(read_flows(dir.path()).is_err());
    }
}

//! Writing `metadata.toml`, which records how a set of maps was produced.
use anyhow::{Context, Result, anyhow};
use chrono::Local;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Build information generated by the build script via `built`
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Serialize)]
struct Metadata<'a> {
    run: RunInfo<'a>,
    program: ProgramInfo,
    platform: PlatformDetails,
}

/// What was rendered, and when
#[derive(Serialize)]
struct RunInfo<'a> {
    /// Path to the map which was rendered
    map_path: &'a Path,
    /// The years which were rendered
    years: &'a [u32],
    /// When rendering started
    datetime: String,
}

/// The build of the program which did the rendering
#[derive(Serialize)]
struct ProgramInfo {
    name: &'static str,
    version: &'static str,
    /// Target triple (e.g. x86_64-unknown-linux-gnu)
    target: &'static str,
    is_debug: bool,
    rustc_version: &'static str,
    build_time_utc: &'static str,
    /// Short git hash, suffixed with "-dirty" for uncommitted changes, or "unknown"
    git_commit_hash: String,
}

impl ProgramInfo {
    fn current() -> Self {
        let git_commit_hash = match built_info::GIT_COMMIT_HASH_SHORT {
            Some(hash) if built_info::GIT_DIRTY == Some(true) => format!("{hash}-dirty"),
            Some(hash) => hash.to_string(),
            None => "unknown".to_string(),
        };

        Self {
            name: built_info::PKG_NAME,
            version: built_info::PKG_VERSION,
            target: built_info::TARGET,
            is_debug: built_info::DEBUG,
            rustc_version: built_info::RUSTC_VERSION,
            build_time_utc: built_info::BUILT_TIME_UTC,
            git_commit_hash,
        }
    }
}

/// The machine the program ran on, as reported by `uname`
#[derive(Serialize)]
struct PlatformDetails {
    sysname: String,
    nodename: String,
    release: String,
    version: String,
    machine: String,
    osname: String,
}

impl PlatformDetails {
    fn current() -> Result<Self> {
        let info = PlatformInfo::new()
            .map_err(|err| anyhow!("Unable to determine platform info: {err}"))?;

        Ok(Self {
            sysname: info.sysname().to_string_lossy().into(),
            nodename: info.nodename().to_string_lossy().into(),
            release: info.release().to_string_lossy().into(),
            version: info.version().to_string_lossy().into(),
            machine: info.machine().to_string_lossy().into(),
            osname: info.osname().to_string_lossy().into(),
        })
    }
}

/// Write `metadata.toml` to the output folder.
///
/// # Arguments
///
/// * `output_path` - The folder to write `metadata.toml` to
/// * `map_path` - The map directory which was rendered
/// * `years` - The years which were rendered
pub fn write_metadata(output_path: &Path, map_path: &Path, years: &[u32]) -> Result<()> {
    let metadata = Metadata {
        run: RunInfo {
            map_path,
            years,
            datetime: Local::now().to_rfc2822(),
        },
        program: ProgramInfo::current(),
        platform: PlatformDetails::current()?,
    };

    let file_path = output_path.join(METADATA_FILE_NAME);
    let contents = toml::to_string(&metadata).context("Could not serialise metadata")?;
    fs::write(&file_path, contents)
        .with_context(|| format!("Could not write {}", file_path.display()))
}

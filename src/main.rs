//! Provides the main entry point to the program.
use human_panic::{metadata, setup_panic};
use migration_map::cli::run_cli;

fn main() -> anyhow::Result<()> {
    setup_panic!(metadata!().support("Open an issue on the project's issue tracker"));

    run_cli()
}

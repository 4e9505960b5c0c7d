//! `tressfx` command-line tool: validate hair configurations and pack their
//! records into binary blobs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tressfx_interop::interop::{verify_layouts, GpuRecord};
use tressfx_interop::options::HairConfig;
use tressfx_interop::pack::write_records;
use tressfx_interop::TressFxError;

#[derive(Parser)]
#[command(version, about = "Hair simulation record tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a configuration and the record layouts.
    Check {
        /// Hair configuration TOML file.
        config: PathBuf,
    },
    /// Write the records of a configuration as `.tfxb` blobs.
    Pack {
        /// Hair configuration TOML file.
        config: PathBuf,
        /// Output directory.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print the configuration JSON schema.
    Schema,
}

fn check(config_path: &Path) -> Result<(), TressFxError> {
    verify_layouts()?;
    let config = HairConfig::load(config_path)?;
    let layout = config.strands.to_layout()?;
    let colliders = config.colliders.to_collider_set()?;
    log::info!(
        "{}: {} strands, {} vertices, {} capsules, {} spheres",
        config_path.display(),
        layout.hair_count(),
        layout.vertex_count(),
        colliders.capsules().len(),
        colliders.spheres().len()
    );
    Ok(())
}

fn write_blob<T: GpuRecord>(
    dir: &Path,
    name: &str,
    records: &[T],
) -> Result<(), TressFxError> {
    let path = dir.join(name);
    let mut writer = BufWriter::new(File::create(&path)?);
    write_records(&mut writer, records)?;
    writer.flush()?;
    log::info!("wrote {} ({} records)", path.display(), records.len());
    Ok(())
}

fn pack(config_path: &Path, out: &Path) -> Result<(), TressFxError> {
    verify_layouts()?;
    let config = HairConfig::load(config_path)?;
    let layout = config.strands.to_layout()?;
    let colliders = config.colliders.to_collider_set()?;

    std::fs::create_dir_all(out)?;
    write_blob(out, "strand_indices.tfxb", &layout.strand_indices())?;
    write_blob(out, "capsules.tfxb", colliders.capsules())?;
    write_blob(out, "spheres.tfxb", colliders.spheres())?;
    Ok(())
}

fn schema() -> Result<(), TressFxError> {
    let json = serde_json::to_string_pretty(&HairConfig::json_schema())
        .map_err(|e| TressFxError::ConfigParse(e.to_string()))?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(json.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Check { config } => check(config),
        Command::Pack { config, out } => pack(config, out),
        Command::Schema => schema(),
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

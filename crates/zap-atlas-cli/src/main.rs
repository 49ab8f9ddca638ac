mod files;

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use zap_atlas::{extrude, AtlasConfig, AtlasPipeline};

#[derive(Parser, Debug)]
#[command(name = "zap-atlas", version, about = "Sprite sheet extrusion and atlas packing")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack every Aseprite sheet in a directory into one atlas + manifest
    Pack {
        /// Directory holding the sheet JSON files and their images
        #[arg(long)]
        input_dir: PathBuf,
        /// Where `<name>.png` and `<name>.json` are written
        #[arg(long)]
        output_dir: PathBuf,
        /// Base name of the output files
        #[arg(long, default_value = "0")]
        name: String,
        /// JSON file with atlas settings
        #[arg(long)]
        config: Option<PathBuf>,
        /// Largest allowed atlas side in pixels
        #[arg(long)]
        max_size: Option<u32>,
    },
    /// Extrude opaque pixels one pixel outward in every PNG of a directory
    Extrude {
        #[arg(long)]
        input_dir: PathBuf,
        #[arg(long)]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.cmd {
        Command::Pack {
            input_dir,
            output_dir,
            name,
            config,
            max_size,
        } => {
            let mut config = match config {
                Some(path) => load_config(&path)?,
                None => AtlasConfig::default(),
            };
            if let Some(max_size) = max_size {
                config.max_canvas_size = max_size;
            }
            run_pack(&input_dir, &output_dir, &name, config)
        }
        Command::Extrude {
            input_dir,
            output_dir,
        } => run_extrude(&input_dir, &output_dir),
    }
}

fn load_config(path: &Path) -> Result<AtlasConfig> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    AtlasConfig::from_json(&json).with_context(|| format!("parsing config {}", path.display()))
}

fn run_pack(input_dir: &Path, output_dir: &Path, name: &str, config: AtlasConfig) -> Result<()> {
    let sheets = files::files_with_extension(input_dir, "json")?;
    log::info!("found {} sheets in {}", sheets.len(), input_dir.display());

    let mut pipeline = AtlasPipeline::new(config);
    for path in &sheets {
        let sheet = files::load_sheet(path)?;
        pipeline.add_sheet(&sheet)?;
    }
    let output = pipeline.build()?;

    // Nothing is written until the whole build succeeded.
    fs::create_dir_all(output_dir).with_context(|| format!("creating {}", output_dir.display()))?;
    let image_path = output_dir.join(format!("{name}.png"));
    let manifest_path = output_dir.join(format!("{name}.json"));

    files::save_image(&output.canvas, &image_path)?;
    let file = fs::File::create(&manifest_path)
        .with_context(|| format!("creating {}", manifest_path.display()))?;
    let mut writer = BufWriter::new(file);
    output
        .manifest
        .write_json(&mut writer)
        .with_context(|| format!("writing {}", manifest_path.display()))?;
    writer.flush().with_context(|| format!("writing {}", manifest_path.display()))?;

    log::info!(
        "wrote {}x{} atlas to {} and manifest to {}",
        output.canvas.width(),
        output.canvas.height(),
        image_path.display(),
        manifest_path.display()
    );
    Ok(())
}

fn run_extrude(input_dir: &Path, output_dir: &Path) -> Result<()> {
    ensure!(
        input_dir != output_dir,
        "input and output directories must differ ({})",
        input_dir.display()
    );
    fs::create_dir_all(output_dir).with_context(|| format!("creating {}", output_dir.display()))?;

    let images = files::files_with_extension(input_dir, "png")?;
    let total = images.len();
    for (i, path) in images.iter().enumerate() {
        let input = files::load_image(path)?;
        let output = extrude(&input).with_context(|| format!("extruding {}", path.display()))?;

        let file_name = path
            .file_name()
            .with_context(|| format!("{} has no file name", path.display()))?;
        files::save_image(&output, &output_dir.join(file_name))?;
        log::info!("{}/{total} {}", i + 1, path.display());
    }
    Ok(())
}

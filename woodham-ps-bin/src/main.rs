use woodham_ps_lib as wps;
use wps::interop::ToImage;
use wps::stereo::{self, Config};

use anyhow::Context;
use log::LevelFilter;
use std::path::PathBuf;

mod dataset;

// Default values for some of the program arguments.
const DEFAULT_OUT: &str = "normals.png";
const DEFAULT_CORRECTION: f64 = 0.0;
const DEFAULT_VERBOSITY: u32 = 2;

/// Entry point of the program.
fn main() {
    parse_args()
        .and_then(run)
        .unwrap_or_else(|err| {
            eprintln!("Error: {:?}", err);
            std::process::exit(1);
        });
}

fn display_help() {
    eprintln!(
        r#"
woodham-ps

Calibrated photometric stereo.

USAGE:
    woodham-ps [FLAGS...] IMAGES...
    IMAGES are directories, image files or glob patterns.
    Every image file must be named "name_azimuth_polar.ext",
    with the light angles in degrees.
    For example:
        woodham-ps --out normals.png --correction 5 dataset/

FLAGS:
    --help                 # Print this message and exit
    --version              # Print version and exit
    --out file.png         # Output normal map (default: {})
    --correction float     # Orientation correction at the borders, in degrees (default: {})
    --threads int          # Number of worker threads (default: number of CPUs)
    --verbosity int        # 0: error, 1: warn, 2: info, 3: debug, 4: trace (default: {})
"#,
        DEFAULT_OUT, DEFAULT_CORRECTION, DEFAULT_VERBOSITY,
    )
}

#[derive(Debug)]
/// Type holding command line arguments.
struct Args {
    config: Config,
    out: PathBuf,
    verbosity: u32,
    images: Vec<String>,
}

/// Function parsing the command line arguments and returning an Args object or an error.
fn parse_args() -> anyhow::Result<Args> {
    let mut args = pico_args::Arguments::from_env();

    // Retrieve command line arguments.
    let help = args.contains(["-h", "--help"]);
    let version = args.contains(["-v", "--version"]);

    // Check if the --help or --version flags are present.
    if help {
        display_help();
        std::process::exit(0);
    } else if version {
        println!("{}", std::env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    // Optional arguments.
    let correction_factor = args
        .opt_value_from_str("--correction")?
        .unwrap_or(DEFAULT_CORRECTION);
    let threads = args.opt_value_from_str("--threads")?;
    let verbosity = args
        .opt_value_from_str("--verbosity")?
        .unwrap_or(DEFAULT_VERBOSITY);
    let out: String = args
        .opt_value_from_str("--out")?
        .unwrap_or_else(|| DEFAULT_OUT.into());

    // Remaining arguments are the images.
    let images = args.free()?;

    Ok(Args {
        config: Config {
            correction_factor,
            threads,
        },
        out: PathBuf::from(out),
        verbosity,
        images,
    })
}

fn verbosity_filter(verbosity: u32) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Start actual program with command line arguments successfully parsed.
fn run(args: Args) -> anyhow::Result<()> {
    let level = verbosity_filter(args.verbosity).to_string().to_lowercase();
    let _logger = flexi_logger::Logger::try_with_str(level)?
        .log_to_stderr()
        .start()?;

    // Load the dataset in memory.
    let now = std::time::Instant::now();
    let paths = dataset::image_paths(&args.images)?;
    let dataset = dataset::load_dataset(&paths)?;
    log::info!("Loading took {:.1} s", now.elapsed().as_secs_f32());

    // Compute the normal map.
    let now = std::time::Instant::now();
    let normals = stereo::photometric_stereo(args.config, &dataset)?;
    log::info!("Reconstruction took {:.1} s", now.elapsed().as_secs_f32());

    // Save it as an RGB image.
    log::info!("Writing {:?}", args.out);
    normals
        .to_image()
        .save(&args.out)
        .with_context(|| format!("Cannot create file: {:?}", args.out))?;
    Ok(())
}

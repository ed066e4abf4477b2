//! Command-line driver: bench file in, reduced bench file out.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use minicirc::minimize::recipes;
use minicirc::{minimize_bench, Error};

#[derive(Parser)]
#[clap(name = "minicirc", about = "Boolean circuit minimizer for bench files")]
struct Args {
    /// Input bench file.
    #[clap(short = 'i', long = "input-path")]
    input_path: PathBuf,

    /// Output bench file.
    #[clap(short = 'o', long = "output")]
    output: PathBuf,

    /// Global seed for fresh-name generation.
    #[clap(long = "seed")]
    seed: Option<u64>,
}

fn open_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        source,
        path: path.to_path_buf(),
    }
}

fn run(args: &Args) -> minicirc::Result<()> {
    if let Some(seed) = args.seed {
        minicirc::seed::set_global_seed(seed);
    }

    let input = File::open(&args.input_path).map_err(open_error(&args.input_path))?;
    let mut output = File::create(&args.output).map_err(open_error(&args.output))?;

    minimize_bench(
        BufReader::new(input),
        &mut output,
        &recipes::default_pipeline(),
    )
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("minicirc: {error}");
            ExitCode::FAILURE
        }
    }
}

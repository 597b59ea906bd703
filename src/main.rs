use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pathtracer::runner::render_parallel;
use pathtracer::scene::Scene;
use pathtracer::wavefront::{mtl, obj};

const EXIT_BAD_ARGUMENTS: u8 = 1;
const EXIT_MISSING_INPUT: u8 = 2;
const EXIT_RENDER_ERROR: u8 = 3;

/// Render a Wavefront scene with the Monte-Carlo path tracer.
#[derive(Parser)]
#[command(version, arg_required_else_help = true)]
struct Args {
    /// Scene geometry (Wavefront OBJ)
    obj: PathBuf,
    /// Materials, lights and cameras (MTL dialect)
    mtl: PathBuf,
    /// Output image (PNG)
    out: PathBuf,
    /// Image width in pixels
    width: u32,
    /// Image height in pixels
    height: u32,
    /// Samples per pixel
    samples: u32,
    /// Worker threads
    threads: usize,
}

fn program(args: &Args) -> Result<(), Box<dyn Error>> {
    let start = Instant::now();

    let obj = obj::load(&args.obj)?;
    let mtl = mtl::load(&args.mtl)?;
    let scene = Scene::new(&obj, &mtl)?;

    let seed: u64 = rand::random();
    let buffer = render_parallel(
        &scene,
        args.width,
        args.height,
        args.samples,
        args.threads,
        seed,
    )?;
    buffer.write_png(&args.out)?;

    tracing::info!(out = %args.out.display(), elapsed = ?start.elapsed(), "done");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            let _ = error.print();
            return match error.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::from(EXIT_BAD_ARGUMENTS),
            };
        }
    };

    if args.width == 0 || args.height == 0 || args.samples == 0 || args.threads == 0 {
        eprintln!("error: width, height, samples and threads must all be positive");
        return ExitCode::from(EXIT_BAD_ARGUMENTS);
    }
    if !args.obj.is_file() {
        eprintln!("error: '{}' does not exist", args.obj.display());
        return ExitCode::from(EXIT_MISSING_INPUT);
    }
    if !args.mtl.is_file() {
        eprintln!("error: '{}' does not exist", args.mtl.display());
        return ExitCode::from(EXIT_MISSING_INPUT);
    }

    match program(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(EXIT_RENDER_ERROR)
        }
    }
}

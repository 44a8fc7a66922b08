//! Command-line mixdown tool: load one or two tracks, remix or overlay
//! them, write the result. Exercises the whole load → remix/merge → save
//! path from a shell.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Serialize;

use cadenza_core::codec::{self, SaveOptions};
use cadenza_core::{merge_audio, remix, RemixSpec, SampleBuffer, DEFAULT_MERGE_RATE};

#[derive(Debug)]
struct Args {
    input: PathBuf,
    output: PathBuf,
    merge: Option<PathBuf>,
    rate: Option<u32>,
    mono: bool,
    int16: bool,
    normalize: bool,
    manifest: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Manifest {
    input: String,
    output: String,
    channels: usize,
    frames: usize,
    sample_rate: u32,
    duration_secs: f64,
    peak: f32,
    int16: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("mixdown failed: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = parse_args()?;

    let input = codec::load(&args.input, None)
        .with_context(|| format!("loading {}", args.input.display()))?;

    let mixed = match &args.merge {
        Some(path) => {
            let other =
                codec::load(path, None).with_context(|| format!("loading {}", path.display()))?;
            merge_audio(&input, &other, args.rate.unwrap_or(DEFAULT_MERGE_RATE))
        }
        None => remix(
            &input,
            &RemixSpec {
                target_rate: args.rate,
                normalize: args.normalize,
                to_int16: args.int16,
                to_mono: args.mono,
                ..RemixSpec::default()
            },
        ),
    };

    // Save failures are reported as values; surface them as the exit error.
    if let Err(e) = codec::save(&args.output, &mixed, &SaveOptions::default()) {
        return Err(anyhow!("saving {}: {e}", args.output.display()));
    }

    println!(
        "{} -> {} ({} ch, {} frames @ {} Hz, {:.2}s)",
        args.input.display(),
        args.output.display(),
        mixed.channels(),
        mixed.frames(),
        mixed.sample_rate,
        mixed.duration_secs()
    );

    if let Some(path) = &args.manifest {
        write_manifest(path, &args, &mixed)?;
    }

    Ok(())
}

fn write_manifest(path: &PathBuf, args: &Args, mixed: &SampleBuffer) -> anyhow::Result<()> {
    let manifest = Manifest {
        input: args.input.display().to_string(),
        output: args.output.display().to_string(),
        channels: mixed.channels(),
        frames: mixed.frames(),
        sample_rate: mixed.sample_rate,
        duration_secs: mixed.duration_secs(),
        peak: mixed.peak(),
        int16: mixed.is_int16(),
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    println!("wrote manifest: {}", path.display());
    Ok(())
}

fn parse_args() -> anyhow::Result<Args> {
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut merge: Option<PathBuf> = None;
    let mut rate: Option<u32> = None;
    let mut mono = false;
    let mut int16 = false;
    let mut normalize = false;
    let mut manifest: Option<PathBuf> = None;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--input" => {
                let Some(v) = it.next() else {
                    return Err(anyhow!("missing value for --input"));
                };
                input = Some(PathBuf::from(v));
            }
            "--output" => {
                let Some(v) = it.next() else {
                    return Err(anyhow!("missing value for --output"));
                };
                output = Some(PathBuf::from(v));
            }
            "--merge" => {
                let Some(v) = it.next() else {
                    return Err(anyhow!("missing value for --merge"));
                };
                merge = Some(PathBuf::from(v));
            }
            "--rate" => {
                let Some(v) = it.next() else {
                    return Err(anyhow!("missing value for --rate"));
                };
                rate = Some(v.parse::<u32>().context("invalid value for --rate")?);
            }
            "--manifest" => {
                let Some(v) = it.next() else {
                    return Err(anyhow!("missing value for --manifest"));
                };
                manifest = Some(PathBuf::from(v));
            }
            "--mono" => mono = true,
            "--int16" => int16 = true,
            "--normalize" => normalize = true,
            "--help" | "-h" => {
                println!(
                    "Usage: mixdown --input <file> --output <file> [--merge <file>] \\
  [--rate <hz>] [--mono] [--int16] [--normalize] [--manifest <file.json>]"
                );
                std::process::exit(0);
            }
            other => return Err(anyhow!("unknown argument: {other}")),
        }
    }

    Ok(Args {
        input: input.ok_or_else(|| anyhow!("--input is required"))?,
        output: output.ok_or_else(|| anyhow!("--output is required"))?,
        merge,
        rate,
        mono,
        int16,
        normalize,
        manifest,
    })
}

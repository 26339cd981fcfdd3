// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use lyricseq::config::{ConfigEvent, ConfigWatcher, SongFile};
use lyricseq::export::{summarize_file, SmfEncoder};
use lyricseq::generate;

fn print_usage() {
    println!("lyricseq - Procedural songs from lyrics");
    println!();
    println!("Usage:");
    println!("  lyricseq generate <SONG.yaml|SONG.toml> [OPTIONS]");
    println!("  lyricseq inspect <FILE.mid>");
    println!();
    println!("Generate options:");
    println!("  --out <FILE.mid>    MIDI output (default: song path with .mid)");
    println!("  --json <FILE.json>  Also write the timeline as JSON");
    println!("  --watch             Regenerate whenever the song file changes");
    println!();
    println!("  --help              Show this help message");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=debug) for more detail.");
}

/// Options for the generate command
#[derive(Debug)]
struct GenerateArgs {
    song: PathBuf,
    out: PathBuf,
    json: Option<PathBuf>,
    watch: bool,
}

fn parse_generate_args(args: &[String]) -> Result<GenerateArgs> {
    let mut song: Option<PathBuf> = None;
    let mut out: Option<PathBuf> = None;
    let mut json: Option<PathBuf> = None;
    let mut watch = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--out" | "-o" => {
                let value = iter.next().ok_or_else(|| anyhow!("--out requires a file name"))?;
                out = Some(PathBuf::from(value));
            }
            "--json" => {
                let value = iter.next().ok_or_else(|| anyhow!("--json requires a file name"))?;
                json = Some(PathBuf::from(value));
            }
            "--watch" | "-w" => watch = true,
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            other => {
                if song.is_some() {
                    bail!("Unexpected argument: {}", other);
                }
                song = Some(PathBuf::from(other));
            }
        }
    }

    let song = song.ok_or_else(|| anyhow!("generate requires a song file"))?;
    let out = out.unwrap_or_else(|| song.with_extension("mid"));
    Ok(GenerateArgs {
        song,
        out,
        json,
        watch,
    })
}

/// Generate one song file's output
fn render(file: &SongFile, out: &Path, json: Option<&Path>) -> Result<()> {
    let timeline = generate(&file.params());

    SmfEncoder::from_config(&file.export)
        .export(&timeline, out)
        .with_context(|| format!("Failed to write MIDI file: {:?}", out))?;

    if let Some(json_path) = json {
        let text = timeline.to_json().context("Failed to serialize timeline")?;
        fs::write(json_path, text)
            .with_context(|| format!("Failed to write JSON file: {:?}", json_path))?;
    }

    println!(
        "{}: {} sections, {} bars, {} notes, {:.2}s -> {}",
        file.song.title,
        timeline.sections().len(),
        timeline.total_bars(),
        timeline.notes().len(),
        timeline.total_duration_seconds(),
        out.display()
    );
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let file = SongFile::load(&args.song)?;
    render(&file, &args.out, args.json.as_deref())?;

    if !args.watch {
        return Ok(());
    }

    let watcher = ConfigWatcher::new(&args.song, None)?;
    println!("Watching {} (press Ctrl+C to stop)...", args.song.display());

    while let Some(event) = watcher.recv() {
        match event {
            ConfigEvent::Reloaded(path, file) => {
                tracing::info!(path = ?path, "song file reloaded");
                if let Err(e) = render(&file, &args.out, args.json.as_deref()) {
                    eprintln!("Error: {:#}", e);
                }
            }
            ConfigEvent::Error(message) => eprintln!("Error: {}", message),
            ConfigEvent::FileCreated(_) | ConfigEvent::FileDeleted(_) => {}
        }
    }

    Ok(())
}

fn run_inspect(path: &str) -> Result<()> {
    let summary =
        summarize_file(path).with_context(|| format!("Failed to inspect MIDI file: {}", path))?;
    println!("{}", summary);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("lyricseq - Procedural songs from lyrics");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "generate" => {
            let generate_args = parse_generate_args(&args[2..])?;
            run_generate(generate_args)?;
        }
        "inspect" => {
            if args.len() < 3 {
                eprintln!("Error: inspect requires a MIDI file");
                std::process::exit(1);
            }
            run_inspect(&args[2])?;
        }
        "--help" | "-h" | "help" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            eprintln!("Run with --help for usage information");
            std::process::exit(1);
        }
    }

    Ok(())
}

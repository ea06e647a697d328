use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossbeam_channel::unbounded;
use log::info;

use tx7patch::{encode_bulk, Bank, CancelToken, Error, FrameReceiver, Library, Voice};

fn parse_duration(s: &str) -> Result<Duration, std::num::ParseIntError> {
    let ms: u64 = s.parse()?;
    Ok(Duration::from_millis(ms))
}

/// Command line interface for managing patches on the Yamaha DX7 and TX7
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// MIDI channel (0-15) written into encoded headers
    #[arg(long, global = true, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..16))]
    channel: u8,

    /// Log decode details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a sysex file and display its contents
    Parse {
        /// Path to the sysex file
        sysex_file: PathBuf,
    },
    /// List all voice names of all the sysex files in a directory
    List {
        /// Directory of .syx files
        folder: PathBuf,
    },
    /// Parse all sysex files in a directory and report what was found
    Test {
        /// Directory of .syx files
        folder: PathBuf,
    },
    /// List voices whose name matches a pattern
    Search {
        /// Directory of .syx files
        folder: PathBuf,
        /// Case-insensitive regular expression or substring
        pattern: String,
    },
    /// Display every field of one voice
    Show {
        /// Directory of .syx files
        folder: PathBuf,
        /// Voice number (0-indexed) in the listing
        index: usize,
        /// Index into the voices matching this pattern instead
        #[arg(long)]
        pattern: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the message that sends one voice to the synth
    Extract {
        /// Directory of .syx files
        folder: PathBuf,
        /// Voice number (0-indexed) in the listing
        index: usize,
        /// Output file
        out: PathBuf,
        /// Index into the voices matching this pattern instead
        #[arg(long)]
        pattern: Option<String>,
    },
    /// Build a 32 voice bank from the first matching voices
    Bank {
        /// Directory of .syx files
        folder: PathBuf,
        /// Output file
        out: PathBuf,
        /// Only take voices matching this pattern
        #[arg(long)]
        pattern: Option<String>,
    },
    /// Replay a raw MIDI capture and decode every SYSEX message in it
    Frames {
        /// File holding the captured bytes
        capture: PathBuf,
        /// Bytes per simulated transport chunk
        #[arg(long, default_value_t = 64)]
        chunk: usize,
        /// Give up when no frame completes within this many milliseconds
        #[arg(long, default_value = "5000", value_parser = parse_duration)]
        timeout: Duration,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match args.command {
        Commands::Parse { sysex_file } => {
            let data = read_file(&sysex_file)?;
            let bank = Bank::decode(data)
                .with_context(|| format!("'{}' is not a DX7 voice dump", sysex_file.display()))?
                .with_file_name(sysex_file.display().to_string());
            println!("{}", bank);
        }
        Commands::List { folder } => {
            let library = open_library(&folder)?;
            print_voices(&library.voices());
        }
        Commands::Test { folder } => {
            let library = open_library(&folder)?;
            println!("Files:      {}", library.file_count());
            println!("Voices:     {}", library.len());
            println!("Duplicates: {}", library.duplicates());
            println!("Skipped:    {}", library.skipped());
        }
        Commands::Search { folder, pattern } => {
            let mut library = open_library(&folder)?;
            library.search(&pattern);
            print_voices(&library.voices());
            info!("{} of {} voices match", library.voice_count(), library.len());
        }
        Commands::Show {
            folder,
            index,
            pattern,
            json,
        } => {
            let mut library = open_library(&folder)?;
            library.search(pattern.as_deref().unwrap_or(""));
            let voices = library.voices();
            let voice = voices.get(index).ok_or(Error::IndexOutOfRange {
                index,
                len: voices.len(),
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(voice)?);
            } else {
                println!("{}", voice);
            }
        }
        Commands::Extract {
            folder,
            index,
            out,
            pattern,
        } => {
            let mut library = open_library(&folder)?;
            library.search(pattern.as_deref().unwrap_or(""));
            let data = library.build_sysex(index)?;
            std::fs::write(&out, &data)
                .with_context(|| format!("Failed to write '{}'", out.display()))?;
            info!("wrote {} bytes to {}", data.len(), out.display());
        }
        Commands::Bank {
            folder,
            out,
            pattern,
        } => {
            let mut library = open_library(&folder)?;
            library.search(pattern.as_deref().unwrap_or(""));
            let voices: Vec<Voice> = library.voices().into_iter().take(32).cloned().collect();
            if voices.is_empty() {
                bail!("no voices to put in a bank");
            }
            let data = encode_bulk(&voices, args.channel)?;
            std::fs::write(&out, &data)
                .with_context(|| format!("Failed to write '{}'", out.display()))?;
            info!("wrote {} voices to {}", voices.len(), out.display());
        }
        Commands::Frames {
            capture,
            chunk,
            timeout,
        } => {
            let data = read_file(&capture)?;
            let (tx, rx) = unbounded();
            let frames = FrameReceiver::spawn(rx);
            for piece in data.chunks(chunk.max(1)) {
                tx.send(piece.to_vec())?;
            }
            drop(tx);

            let cancel = CancelToken::new();
            let mut count = 0;
            loop {
                let frame = match frames.recv_frame(timeout, &cancel) {
                    Ok(frame) => frame,
                    Err(Error::Disconnected) => break,
                    Err(e) => return Err(e.into()),
                };
                count += 1;
                match Bank::decode(frame) {
                    Ok(bank) => {
                        let names: Vec<String> = bank.voices.iter().map(Voice::name).collect();
                        println!(
                            "frame {}: format {:02X}, {} voice(s), checksum {}: {}",
                            count,
                            bank.header().format,
                            bank.voices.len(),
                            if bank.checksum_ok() { "ok" } else { "mismatch" },
                            names.join(", ")
                        );
                    }
                    Err(e) => println!("frame {}: skipped, {}", count, e),
                }
            }
            info!("{} frames in {}", count, capture.display());
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Error reading sysex file '{}'", path.display()))
}

fn open_library(folder: &Path) -> Result<Library> {
    Library::open_dir(folder)
        .with_context(|| format!("Error scanning folder '{}'", folder.display()))
}

fn print_voices(voices: &[&Voice]) {
    for (i, voice) in voices.iter().enumerate() {
        println!(
            "{:>5}  {:<10}  Bank: [{}]",
            i,
            voice.name(),
            voice.source.as_deref().unwrap_or("")
        );
    }
}

//! segflate-cli - Command-line interface for segflate
//!
//! Decodes captures of framed compressed segments. A capture is a sequence of
//! records, each a big-endian u32 compressed length followed by that many bytes,
//! with every record continuing the same zlib stream.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use segflate::{ByteSource, CursorOptions, InflateCursor, ReaderSource, SegflateError};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "segflate-cli")]
#[command(about = "A CLI tool for decoding framed zlib segment captures")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode every segment of a capture into one output file
    Decode {
        /// Input capture file
        input: PathBuf,

        /// Output file for the decoded bytes
        output: PathBuf,

        /// Decoded buffer size in bytes
        #[arg(short, long, default_value_t = segflate::DEFAULT_BUF_SIZE)]
        buffer_size: usize,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// List the segments of a capture
    Info {
        /// Capture file to analyze
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let result = match cli.command {
        Commands::Decode {
            input,
            output,
            buffer_size,
            force,
        } => decode_file(&input, &output, buffer_size, force, cli.verbose, cli.quiet),
        Commands::Info { input } => show_file_info(&input, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Read the next record header; `None` at a clean end of file
fn next_record<S: ByteSource>(source: &mut S) -> segflate::Result<Option<usize>> {
    match source.ensure_available(4, true) {
        Ok(_) => {}
        Err(SegflateError::UnexpectedEof) if source.readable().is_empty() => return Ok(None),
        Err(e) => return Err(e),
    }

    let header = &source.readable()[..4];
    let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
    source.advance(4);
    Ok(Some(len))
}

fn decode_file(
    input: &PathBuf,
    output: &PathBuf,
    buffer_size: usize,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    // Check if output file exists and force flag
    if output.exists() && !force {
        return Err(format!(
            "Output file '{}' already exists. Use --force to overwrite",
            output.display()
        )
        .into());
    }

    if verbose {
        println!("Decoding '{}' to '{}'", input.display(), output.display());
        println!("Buffer size: {} bytes", buffer_size);
    }

    let start_time = Instant::now();
    let input_size = fs::metadata(input)?.len();

    // Show progress bar for large captures
    let progress = if !quiet && input_size > 1024 * 1024 {
        let pb = ProgressBar::new(input_size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} {msg}",
                )?
                .progress_chars("#>-"),
        );
        pb.set_message("Decoding...");
        Some(pb)
    } else {
        None
    };

    let options = CursorOptions::default().with_buffer_size(buffer_size);
    let mut cursor = InflateCursor::with_options(options)?;
    let mut source = ReaderSource::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);
    let mut output_size = 0u64;
    let mut records = 0usize;

    while let Some(len) = next_record(&mut source)? {
        let mut segment = cursor.attach(&mut source, len)?;
        output_size += io::copy(&mut segment, &mut writer)?;
        segment.reset()?;
        records += 1;

        if let Some(ref pb) = progress {
            pb.inc(len as u64 + 4);
        }
    }
    writer.flush()?;
    cursor.close();

    if let Some(ref pb) = progress {
        pb.finish_with_message("Decoding complete");
    }

    let decode_time = start_time.elapsed();
    if !quiet {
        println!("✓ Decoding successful!");
        println!("  Records: {}", records);
        println!("  Input:   {} bytes", input_size);
        println!("  Output:  {} bytes", output_size);
        println!("  Time:    {:.2?}", decode_time);
    }

    Ok(())
}

fn show_file_info(input: &PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let file_size = fs::metadata(input)?.len();
    let mut cursor = InflateCursor::new();
    let mut source = ReaderSource::new(File::open(input)?);

    println!("Capture Information:");
    println!("  File: {}", input.display());
    println!("  Size: {} bytes", file_size);

    let mut index = 0usize;
    loop {
        let len = match next_record(&mut source) {
            Ok(Some(len)) => len,
            Ok(None) => break,
            Err(e) => {
                println!("  Status: ✗ Truncated record header after {} records", index);
                if verbose {
                    println!("  Error: {}", e);
                }
                return Ok(());
            }
        };

        let mut segment = cursor.attach(&mut source, len)?;
        let decoded = io::copy(&mut segment, &mut io::sink()).and_then(|decoded| {
            segment.reset()?;
            Ok(decoded)
        });

        match decoded {
            Ok(decoded) => {
                println!(
                    "  Record {:>4}: {:>8} -> {:>8} bytes",
                    index, len, decoded
                );
            }
            Err(e) => {
                println!("  Record {:>4}: {:>8} -> ✗ invalid", index, len);
                println!("  Status: ✗ Invalid or corrupted capture");
                if verbose {
                    println!("  Error: {}", e);
                }
                return Ok(());
            }
        }
        index += 1;
    }

    let stats = cursor.stats();
    println!("  Records: {}", index);
    println!("  Decoded Size: {} bytes", stats.decoded_bytes);
    if stats.decoded_bytes > 0 {
        let ratio = (stats.compressed_bytes as f64 / stats.decoded_bytes as f64) * 100.0;
        println!("  Compression Ratio: {:.1}%", ratio);
    }
    if verbose {
        println!("  Compressed Bytes: {}", stats.compressed_bytes);
        println!("  Discarded Bytes: {}", stats.discarded_bytes);
    }
    println!("  Status: ✓ Valid capture");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::fs;
    use tempfile::tempdir;

    fn write_capture(payloads: &[&[u8]]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        let mut capture = Vec::new();
        let mut taken = 0;
        for payload in payloads {
            encoder.write_all(payload).unwrap();
            encoder.flush().unwrap();
            let written = encoder.get_ref();
            capture.extend_from_slice(&((written.len() - taken) as u32).to_be_bytes());
            capture.extend_from_slice(&written[taken..]);
            taken = written.len();
        }
        capture
    }

    #[test]
    fn test_decode_capture() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let input_path = dir.path().join("capture.bin");
        let output_path = dir.path().join("decoded.bin");

        let first = b"Hello, World! This is the first rectangle.".repeat(10);
        let second = b"And this is the second one.".repeat(20);
        fs::write(&input_path, write_capture(&[&first, &second]))?;

        decode_file(&input_path, &output_path, 256, false, false, true)?;

        let result = fs::read(&output_path)?;
        assert_eq!(result, [first, second].concat());

        // Refuses to overwrite without --force
        assert!(decode_file(&input_path, &output_path, 256, false, false, true).is_err());
        decode_file(&input_path, &output_path, 256, true, false, true)?;

        show_file_info(&input_path, true)?;

        Ok(())
    }

    #[test]
    fn test_truncated_header() -> Result<(), Box<dyn std::error::Error>> {
        let mut capture = write_capture(&[b"complete record"]);
        capture.extend_from_slice(&[0, 0]);
        let mut source = ReaderSource::new(io::Cursor::new(capture));

        let len = next_record(&mut source)?.unwrap();
        source.advance(len);
        assert!(matches!(
            next_record(&mut source),
            Err(SegflateError::UnexpectedEof)
        ));

        Ok(())
    }
}

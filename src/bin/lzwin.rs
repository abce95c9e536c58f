use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use crossbeam::channel::{bounded, unbounded};
use memmap2::Mmap;

use lzwin::{
    CodecParams, CompressionLevel, EncodeOptions, Error, LzCodec, LzwCodec, LzwConfig, LzwStats,
    StreamDecoder, StreamEncoder, StreamStats, Strategy, WireFormat, NO_OUTPUT_LIMIT,
};

const EXTENSION: &str = "lzwin";
const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "lzwin")]
#[command(about = "Compress and decompress files with sliding-window or LZW coding")]
#[command(version)]
struct Args {
    /// Input files (use - for stdin)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Decompress instead of compress
    #[arg(short, long)]
    decompress: bool,

    /// Output file (single input only; use - for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Coding algorithm
    #[arg(short, long, value_enum, default_value_t = Algorithm::Lz77)]
    algorithm: Algorithm,

    /// Window size W (largest match distance)
    #[arg(long, default_value = "32768")]
    window: usize,

    /// Shortest match worth encoding
    #[arg(long, default_value = "3")]
    min_match: usize,

    /// Longest match per token
    #[arg(long, default_value = "258")]
    max_match: usize,

    /// Match search effort (1-9; 9 is exhaustive)
    #[arg(short, long, default_value = "9")]
    level: u8,

    /// Use lazy matching (one-byte deferral)
    #[arg(long)]
    lazy: bool,

    /// Width of the literal-run length field
    #[arg(long, default_value = "8")]
    literal_bits: u8,

    /// Maximum LZW code width
    #[arg(long, default_value = "12")]
    code_bits: u8,

    /// Refuse to decompress more than this many bytes per input
    #[arg(long)]
    max_output: Option<usize>,

    /// Number of threads for multiple inputs (0 = auto)
    #[arg(short = 't', long, default_value = "0")]
    threads: usize,

    /// Overwrite existing output files
    #[arg(short, long)]
    force: bool,

    /// Show verbose statistics
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    /// Sliding window with back-references
    Lz77,
    /// Growing dictionary of sequences
    Lzw,
}

/// Everything a worker needs; shared read-only across threads
#[derive(Clone, Copy, Debug)]
struct Settings {
    decompress: bool,
    algorithm: Algorithm,
    params: CodecParams,
    options: EncodeOptions,
    format: WireFormat,
    lzw: LzwConfig,
    max_output: usize,
    force: bool,
}

#[derive(Debug)]
enum Target {
    Stdout,
    File(PathBuf),
}

#[derive(Debug)]
struct Job {
    input: PathBuf,
    target: Target,
}

enum Detail {
    Tokens(StreamStats),
    Codes(LzwStats),
}

struct Report {
    input_bytes: u64,
    output_bytes: u64,
    detail: Detail,
    elapsed: Duration,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run() -> Result<u8, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let settings = Settings {
        decompress: args.decompress,
        algorithm: args.algorithm,
        params: CodecParams::new(args.window, args.min_match, args.max_match)?,
        options: EncodeOptions {
            level: CompressionLevel::from_level(args.level),
            strategy: if args.lazy { Strategy::Lazy } else { Strategy::Greedy },
            ..Default::default()
        },
        format: WireFormat { literal_bits: args.literal_bits, ..Default::default() },
        lzw: LzwConfig { max_code_bits: args.code_bits, ..Default::default() },
        max_output: args.max_output.unwrap_or(NO_OUTPUT_LIMIT),
        force: args.force,
    };
    settings.options.validate()?;
    settings.format.validate()?;
    settings.lzw.validate()?;

    if args.output.is_some() && args.inputs.len() > 1 {
        return Err("--output can only be used with a single input".into());
    }
    if args.inputs.iter().filter(|p| is_stdio(p)).count() > 1 {
        return Err("stdin can only be read once".into());
    }

    let mut jobs = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let target = match &args.output {
            Some(path) if is_stdio(path) => Target::Stdout,
            Some(path) => Target::File(path.clone()),
            None if is_stdio(input) => Target::Stdout,
            None => Target::File(default_output(input, settings.decompress)?),
        };
        jobs.push(Job { input: input.clone(), target });
    }

    let threads = match args.threads {
        0 => num_cpus::get(),
        n => n,
    }
    .clamp(1, jobs.len());

    let results = process_all(&settings, &jobs, threads)?;

    let mut failed = false;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(report) => {
                if args.verbose {
                    print_report(&settings, &job.input, &report);
                }
            }
            Err(e) => {
                eprintln!("Error: {}: {}", job.input.display(), e);
                failed = true;
            }
        }
    }

    Ok(if failed { EXIT_ERROR } else { 0 })
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn default_output(input: &Path, decompress: bool) -> lzwin::Result<PathBuf> {
    if !decompress {
        let mut name = OsString::from(input.as_os_str());
        name.push(".");
        name.push(EXTENSION);
        return Ok(PathBuf::from(name));
    }

    if input.extension().is_some_and(|ext| ext == EXTENSION) {
        Ok(input.with_extension(""))
    } else {
        Err(Error::InvalidParams {
            name: "input",
            reason: format!("{} does not end in .{}; pass --output", input.display(), EXTENSION),
        })
    }
}

/// Run every job, spreading them over `threads` workers; results come back in job order
fn process_all(
    settings: &Settings,
    jobs: &[Job],
    threads: usize,
) -> lzwin::Result<Vec<lzwin::Result<Report>>> {
    if threads == 1 {
        return Ok(jobs.iter().map(|job| process(settings, job)).collect());
    }

    let (job_tx, job_rx) = bounded::<usize>(jobs.len());
    let (result_tx, result_rx) = unbounded();

    // Use crossbeam's scoped threads so workers can borrow the job list
    let result = crossbeam::scope(|scope| {
        for _ in 0..threads {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();

            scope.spawn(move |_| {
                while let Ok(index) = job_rx.recv() {
                    let outcome = process(settings, &jobs[index]);
                    if result_tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
            });
        }

        drop(job_rx);
        drop(result_tx);

        for index in 0..jobs.len() {
            // Capacity covers every job, so this never blocks
            let _ = job_tx.send(index);
        }
        drop(job_tx);

        let mut slots: Vec<Option<lzwin::Result<Report>>> = (0..jobs.len()).map(|_| None).collect();
        for (index, outcome) in result_rx.iter() {
            slots[index] = Some(outcome);
        }
        slots
    });

    let slots = result.map_err(|_| Error::Internal("Thread panicked".to_string()))?;
    Ok(slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| Err(Error::Internal("Worker dropped a job".to_string())))
        })
        .collect())
}

fn process(settings: &Settings, job: &Job) -> lzwin::Result<Report> {
    let start = Instant::now();

    let result = match &job.target {
        Target::Stdout => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            run_job(settings, &job.input, &mut out)
        }
        Target::File(path) => {
            let mut file = create_output(path, settings.force)?;
            let result = run_job(settings, &job.input, &mut file).and_then(|report| {
                file.flush()?;
                Ok(report)
            });
            if result.is_err() {
                // Streaming decoders may have written part of the output
                let _ = fs::remove_file(path);
            }
            result
        }
    };

    result.map(|(input_bytes, output_bytes, detail)| Report {
        input_bytes,
        output_bytes,
        detail,
        elapsed: start.elapsed(),
    })
}

fn create_output(path: &Path, force: bool) -> lzwin::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    options.open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            Error::Io(io::Error::new(
                e.kind(),
                format!("{} already exists; use --force to overwrite", path.display()),
            ))
        } else {
            Error::Io(e)
        }
    })
}

/// Dispatch one input; returns (input bytes, output bytes, detail)
fn run_job<W: Write>(
    settings: &Settings,
    input: &Path,
    output: &mut W,
) -> lzwin::Result<(u64, u64, Detail)> {
    let stdin = is_stdio(input);

    match (settings.algorithm, settings.decompress) {
        (Algorithm::Lz77, false) if stdin => {
            let stats = StreamEncoder::new(settings.params)?
                .with_options(settings.options)?
                .with_format(settings.format)?
                .encode_stream(io::stdin().lock(), output)?;
            Ok((stats.input_bytes, stats.output_bytes, Detail::Tokens(stats)))
        }
        (Algorithm::Lz77, false) => with_mapped(input, |data| {
            let codec = LzCodec::new(settings.params)?
                .with_options(settings.options)?
                .with_format(settings.format)?;
            let (bytes, stats) = codec.compress_with_stats(data)?;
            output.write_all(&bytes)?;
            Ok((stats.input_bytes, stats.output_bytes, Detail::Tokens(stats)))
        }),
        (Algorithm::Lz77, true) => {
            let mut decoder = StreamDecoder::new(settings.params)?
                .with_format(settings.format)?
                .with_output_limit(settings.max_output);
            let stats = if stdin {
                decoder.decode_stream(io::stdin().lock(), output)?
            } else {
                decoder.decode_stream(BufReader::new(File::open(input)?), output)?
            };
            Ok((stats.input_bytes, stats.output_bytes, Detail::Tokens(stats)))
        }
        (Algorithm::Lzw, false) => {
            let mut codec = LzwCodec::new(settings.lzw)?;
            let stats = if stdin {
                codec.compress_stream(io::stdin().lock(), output)?
            } else {
                with_mapped(input, |data| codec.compress_stream(data, &mut *output))?
            };
            Ok((stats.input_bytes, stats.output_bytes, Detail::Codes(stats)))
        }
        (Algorithm::Lzw, true) => {
            let mut codec = LzwCodec::new(settings.lzw)?;
            let stats = if stdin {
                codec.decompress_stream(io::stdin().lock(), output, settings.max_output)?
            } else {
                with_mapped(input, |data| {
                    codec.decompress_stream(data, &mut *output, settings.max_output)
                })?
            };
            Ok((stats.input_bytes, stats.output_bytes, Detail::Codes(stats)))
        }
    }
}

/// Run `f` over the contents of `path`, memory-mapped
fn with_mapped<T>(path: &Path, f: impl FnOnce(&[u8]) -> lzwin::Result<T>) -> lzwin::Result<T> {
    let file = File::open(path)?;
    // Zero-length files cannot be mapped on every platform
    if file.metadata()?.len() == 0 {
        return f(&[]);
    }
    // SAFETY: the mapping is read-only and lives only for this call; the file
    // is not modified by this process while mapped.
    let map = unsafe { Mmap::map(&file)? };
    f(&map)
}

fn print_report(settings: &Settings, input: &Path, report: &Report) {
    let action = if settings.decompress { "Decompression" } else { "Compression" };
    eprintln!("{} complete: {}", action, input.display());
    eprintln!("  Input bytes:      {}", report.input_bytes);
    eprintln!("  Output bytes:     {}", report.output_bytes);
    match &report.detail {
        Detail::Tokens(stats) => {
            eprintln!("  Tokens:           {}", stats.tokens);
            eprintln!(
                "  Literal runs:     {} ({} bytes)",
                stats.literal_tokens, stats.literal_bytes
            );
            eprintln!("  Matches:          {} ({} bytes)", stats.match_tokens, stats.matched_bytes);
        }
        Detail::Codes(stats) => {
            eprintln!("  Codes:            {}", stats.codes);
            eprintln!("  Dictionary resets: {}", stats.resets);
        }
    }
    let (raw, packed) = if settings.decompress {
        (report.output_bytes, report.input_bytes)
    } else {
        (report.input_bytes, report.output_bytes)
    };
    if raw > 0 {
        eprintln!("  Ratio:            {:.3}", packed as f64 / raw as f64);
    }
    eprintln!("  Time:             {:.2?}", report.elapsed);
    eprintln!(
        "  Throughput:       {:.1} MB/s",
        raw as f64 / report.elapsed.as_secs_f64() / 1_000_000.0
    );
}

use clap::{App, Arg, ArgMatches};
use log::{error, info};
use mandel::config::{
    Config, DEFAULT_ITERATIONS, DEFAULT_ORIGIN, DEFAULT_SAMPLES, DEFAULT_SCALE, DEFAULT_SIZE,
};
use mandel::distributor::DEFAULT_CHUNK;
use mandel::pixmap::write_image;
use mandel::planes::MAX_SAMPLES;
use mandel::RenderError;
use num::Complex;
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_scale(s: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(f) if f.is_finite() && f > 0.0 => Ok(()),
        Ok(_) => Err("Scale must be a positive number".to_string()),
        Err(_) => Err("Could not parse scale".to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const ORIGIN: &str = "origin";
const SCALE: &str = "scale";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const SAMPLES: &str = "samples";
const CHUNK: &str = "chunk";
const SEED: &str = "seed";

fn args<'a>(defaults: &'a Defaults) -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandel")
        .version("0.1.0")
        .about("Supersampled Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("result.ppm")
                .help("Output file; a .png extension writes PNG, anything else a binary pixmap"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value(&defaults.size)
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(ORIGIN)
                .required(false)
                .long(ORIGIN)
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value(&defaults.origin)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse origin"))
                .help("Lower corner of the window on the complex plane"),
        )
        .arg(
            Arg::with_name(SCALE)
                .required(false)
                .long(SCALE)
                .takes_value(true)
                .default_value(&defaults.scale)
                .validator(|s| validate_scale(&s))
                .help("Height of the window on the complex plane"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value(&defaults.threads)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value(&defaults.iterations)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Iteration cap per sample"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .required(false)
                .long(SAMPLES)
                .short("n")
                .takes_value(true)
                .default_value(&defaults.samples)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        MAX_SAMPLES,
                        "Could not parse sample count",
                        &format!("Sample count must be between 1 and {}", MAX_SAMPLES),
                    )
                })
                .help("Jittered samples per pixel"),
        )
        .arg(
            Arg::with_name(CHUNK)
                .required(false)
                .long(CHUNK)
                .short("c")
                .takes_value(true)
                .default_value(&defaults.chunk)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value(),
                        "Could not parse chunk size",
                        "Chunk size must be at least 1",
                    )
                })
                .help("Rows handed to a thread at a time"),
        )
        .arg(
            Arg::with_name(SEED)
                .required(false)
                .long(SEED)
                .takes_value(true)
                .validator(|s| match u64::from_str(&s) {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Could not parse seed".to_string()),
                })
                .help("Seed for the sample offsets; defaults to the clock"),
        )
        .get_matches()
}

// Default values as strings, so clap can borrow them.
struct Defaults {
    size: String,
    origin: String,
    scale: String,
    threads: String,
    iterations: String,
    samples: String,
    chunk: String,
}

impl Defaults {
    fn new() -> Self {
        Defaults {
            size: format!("{}x{}", DEFAULT_SIZE.0, DEFAULT_SIZE.1),
            origin: format!("{},{}", DEFAULT_ORIGIN.0, DEFAULT_ORIGIN.1),
            scale: format!("{:e}", DEFAULT_SCALE),
            threads: num_cpus::get().to_string(),
            iterations: DEFAULT_ITERATIONS.to_string(),
            samples: DEFAULT_SAMPLES.to_string(),
            chunk: DEFAULT_CHUNK.to_string(),
        }
    }
}

// Every value has a default and has passed its validator by now.
fn config(matches: &ArgMatches) -> Option<Config> {
    let size = parse_pair::<usize>(matches.value_of(SIZE)?, 'x')?;
    Some(Config {
        origin: parse_complex(matches.value_of(ORIGIN)?)?,
        scale: f64::from_str(matches.value_of(SCALE)?).ok()?,
        size,
        iterations: usize::from_str(matches.value_of(ITERATIONS)?).ok()?,
        samples: usize::from_str(matches.value_of(SAMPLES)?).ok()?,
        threads: usize::from_str(matches.value_of(THREADS)?).ok()?,
        chunk: usize::from_str(matches.value_of(CHUNK)?).ok()?,
        seed: match matches.value_of(SEED) {
            Some(seed) => Some(u64::from_str(seed).ok()?),
            None => None,
        },
    })
}

fn run(config: &Config, output: &Path) -> Result<(), RenderError> {
    let renderer = config.renderer()?;
    let spec = renderer.spec();
    info!(
        "rendering {}x{} at {} with scale {:e}, {} iterations, {} samples",
        spec.width(),
        spec.height(),
        spec.origin(),
        spec.scale(),
        spec.iterations(),
        spec.samples()
    );
    let pixels = renderer.render()?;
    write_image(output, &pixels, (spec.width(), spec.height()))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let defaults = Defaults::new();
    let matches = args(&defaults);
    let config = match config(&matches) {
        Some(config) => config,
        None => {
            eprintln!("Could not read the render settings");
            std::process::exit(1);
        }
    };
    let output = Path::new(matches.value_of(OUTPUT).unwrap_or("result.ppm"));

    if let Err(e) = run(&config, output) {
        error!("render failed: {}", e);
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}

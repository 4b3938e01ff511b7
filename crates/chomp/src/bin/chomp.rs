// ABOUTME: CLI binary for chomp: cleans a URL, an HTML file, or raw markup and prints Markdown.
// ABOUTME: Flags mirror CleanOptions; a JSON config file may supply defaults that flags override.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chomp::{Chomp, CleanOptions, Source};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chomp")]
#[command(about = "Clean web pages into LLM-ready Markdown")]
struct Args {
    /// URL to fetch, or raw HTML markup
    #[arg()]
    source: Option<String>,

    /// HTML file to clean ("-" reads stdin). A URL SOURCE then becomes the image base.
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Keep images in the output
    #[arg(long = "images")]
    images: bool,

    /// Minimum words for a block to count as content
    #[arg(long = "min-words")]
    min_words: Option<usize>,

    /// Comma-separated top-level tags to keep (replaces the default set)
    #[arg(long = "retain-tags", value_delimiter = ',')]
    retain_tags: Option<Vec<String>>,

    /// Keep short blocks containing this keyword (repeatable)
    #[arg(long = "keyword")]
    keywords: Vec<String>,

    /// Base URL for resolving relative image sources
    #[arg(long = "base-url")]
    base_url: Option<String>,

    /// Do not insert a blank line after every line
    #[arg(long = "single-space")]
    single_space: bool,

    /// Print cleaned HTML instead of Markdown
    #[arg(long = "cleaned-html")]
    cleaned_html: bool,

    /// JSON file with cleaning options
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long = "timeout", default_value_t = 30)]
    timeout: u64,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_clean_options(args: &Args) -> Result<CleanOptions> {
    let mut opts = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {:?}", path))?;
            CleanOptions::from_json(&json).with_context(|| format!("parsing config {:?}", path))?
        }
        None => CleanOptions::default(),
    };

    if args.images {
        opts.retain_images = true;
    }
    if let Some(min) = args.min_words {
        opts.min_word_length = min;
    }
    if let Some(tags) = &args.retain_tags {
        opts.retain_tags = tags
            .iter()
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
    }
    opts.retain_keywords.extend(args.keywords.iter().cloned());
    if let Some(base) = &args.base_url {
        opts.base_url = Some(base.clone());
    }
    if args.single_space {
        opts.double_space = false;
    }
    Ok(opts)
}

fn read_html(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading HTML from stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
}

fn build_chomp(args: &Args) -> Result<Chomp> {
    let mut clean = load_clean_options(args)?;
    let mut builder = Chomp::builder().timeout(Duration::from_secs(args.timeout));

    if let Some(path) = &args.html {
        builder = builder.html(read_html(path)?);
        if let Some(Source::Url(url)) = args.source.as_deref().map(Source::detect) {
            clean.base_url.get_or_insert(url);
        }
    } else if let Some(source) = &args.source {
        builder = match Source::detect(source) {
            Source::Url(url) => builder.url(url),
            Source::Markup(markup) => builder.html(markup),
        };
    }

    Ok(builder.clean_options(clean).build())
}

fn run(args: &Args) -> Result<String> {
    let chomp = build_chomp(args)?;
    let out = if args.cleaned_html {
        chomp.clean()?
    } else {
        chomp.convert_to_markdown()?
    };
    Ok(out.to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let start = Instant::now();
    let result = run(&args);
    let elapsed = start.elapsed();

    let mut had_error = false;
    match result {
        Ok(output_str) => {
            if let Some(output_path) = &args.output {
                if let Err(e) = fs::write(output_path, &output_str) {
                    eprintln!("error writing to {:?}: {}", output_path, e);
                    had_error = true;
                }
            } else {
                println!("{}", output_str);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            had_error = true;
        }
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

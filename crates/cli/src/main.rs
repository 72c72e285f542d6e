// ABOUTME: CLI for fetching pages politely and printing their cleaned HTML or text.
// ABOUTME: Wraps scour-web's Fetcher and sanitizer; also cleans local HTML files.

mod logging;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::builder::styling::{AnsiColor, Styles};
use clap::Parser;
use scour_web::{
    document_text, parse_document, CleanOptions, Fetcher, Html, ParseOptions, Strainer,
};

use crate::logging::LogLevel;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Blue.on_default().bold())
        .usage(AnsiColor::Blue.on_default().bold())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::BrightBlack.on_default())
        .error(AnsiColor::Red.on_default().bold())
}

/// Fetch pages with a minimum delay between requests and strip scripts,
/// styles, metadata, images and comments from the HTML.
#[derive(Parser, Debug)]
#[command(name = "scour", version, styles = styles())]
#[command(about = "Fetch pages politely and print their cleaned HTML", long_about = None)]
struct Args {
    /// Page URL(s) to fetch, in order.
    #[arg(conflicts_with = "html")]
    urls: Vec<String>,

    /// Clean a local HTML file instead of fetching.
    #[arg(long)]
    html: Option<PathBuf>,

    /// Minimum seconds between consecutive requests.
    #[arg(short = 'd', long, default_value = "0.5", value_parser = parse_secs)]
    delay: Duration,

    /// Request timeout in seconds (default: none).
    #[arg(long, value_parser = parse_secs)]
    timeout: Option<Duration>,

    /// User-Agent header to send.
    #[arg(short = 'A', long)]
    user_agent: Option<String>,

    /// Extra request header as NAME:VALUE. Repeatable.
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Keep <img> elements.
    #[arg(long)]
    keep_images: bool,

    /// Keep comments, processing instructions and the doctype.
    #[arg(long)]
    keep_comments: bool,

    /// Print the parsed document without cleaning it.
    #[arg(long)]
    no_clean: bool,

    /// Only keep elements with this tag name (and their contents).
    #[arg(long, value_name = "TAG")]
    only: Option<String>,

    /// Only keep elements with this attribute value, as KEY=VALUE. Repeatable.
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attr)]
    attrs: Vec<(String, String)>,

    /// Print visible text instead of HTML.
    #[arg(long)]
    text: bool,

    /// Write output to a file instead of stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Log level for output.
    #[arg(short = 'l', long, value_enum, default_value = "info", value_name = "LVL")]
    log_level: LogLevel,
}

fn parse_secs(s: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("not a number: {}", s))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("not a valid duration: {}", s))
}

fn parse_header(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got {}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {}", s));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn parse_attr(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {}", s))?;
    if key.trim().is_empty() {
        return Err(format!("empty attribute name in {}", s));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

fn parse_options(args: &Args) -> ParseOptions {
    let mut opts = if args.no_clean {
        ParseOptions::raw()
    } else {
        ParseOptions::default().cleaning(
            CleanOptions::default()
                .remove_imgs(!args.keep_images)
                .remove_comments(!args.keep_comments),
        )
    };

    if args.only.is_some() || !args.attrs.is_empty() {
        let mut strainer = match args.only {
            Some(ref tag) => Strainer::new(tag),
            None => Strainer::any(),
        };
        for (key, value) in &args.attrs {
            strainer = strainer.attr(key, value.clone());
        }
        opts = opts.strainer(strainer);
    }

    opts
}

fn build_fetcher(args: &Args) -> Result<Fetcher> {
    let mut builder = Fetcher::builder().delay(args.delay);
    if let Some(ref ua) = args.user_agent {
        builder = builder.user_agent(ua);
    }
    if let Some(timeout) = args.timeout {
        builder = builder.timeout(timeout);
    }
    for (name, value) in &args.headers {
        builder = builder.header(name, value);
    }
    Ok(builder.build()?)
}

fn render(doc: &Html, text: bool) -> String {
    if text {
        document_text(doc)
    } else {
        doc.html()
    }
}

fn run(args: &Args) -> Result<bool> {
    if args.html.is_none() && args.urls.is_empty() {
        bail!("at least one URL is required, or use --html");
    }

    let opts = parse_options(args);
    let mut outputs: Vec<String> = Vec::new();
    let mut had_error = false;

    if let Some(ref path) = args.html {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let doc = parse_document(&text, &opts);
        outputs.push(render(&doc, args.text));
    } else {
        let fetcher = build_fetcher(args)?;
        for url in &args.urls {
            log::info!("fetching {}", url);
            match fetcher.fetch_and_clean(url, &opts) {
                Ok(doc) => outputs.push(render(&doc, args.text)),
                Err(e) => {
                    log::error!("{}", e);
                    had_error = true;
                }
            }
        }
    }

    if !outputs.is_empty() {
        let joined = outputs.join("\n\n");
        match args.output {
            Some(ref path) => fs::write(path, &joined)
                .map_err(|e| anyhow!("writing {}: {}", path.display(), e))?,
            None => println!("{}", joined),
        }
    }

    Ok(!had_error)
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.log_level);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};

use unwrapurl::{DecodeRequest, DecodeResult, Decoder, DecoderConfig, DEFAULT_ERROR_PAGE};

/// Recover original destinations from rewritten protection links
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Rewritten links to decode; read one per line from stdin when absent
    inputs: Vec<String>,

    /// Print the diagnostic page URL for inputs that fail to decode
    #[clap(long)]
    fallback: bool,

    /// Treat inputs as selected text, which may lack a scheme
    #[clap(long, conflicts_with = "origin")]
    selection: bool,

    /// Treat inputs as navigations started from this page
    #[clap(long, value_name = "URL")]
    origin: Option<String>,

    /// Exit with an error if any input failed to decode
    #[clap(long)]
    strict: bool,

    /// Diagnostic page that failed inputs are sent to
    #[clap(long, value_name = "URL", default_value = DEFAULT_ERROR_PAGE)]
    error_page: String,

    /// Domain of the rewriting service (repeatable; replaces the defaults)
    #[clap(long = "service-host", value_name = "HOST")]
    service_hosts: Vec<String>,
}

impl Args {
    fn config(&self) -> Result<DecoderConfig> {
        let mut config = DecoderConfig::new()
            .with_error_page(&self.error_page)
            .context("invalid --error-page")?;
        if !self.service_hosts.is_empty() {
            config = config.with_service_hosts(self.service_hosts.iter().cloned());
        }
        Ok(config)
    }

    fn request(&self, input: String) -> DecodeRequest {
        if let Some(origin) = &self.origin {
            DecodeRequest::Navigation {
                url: input,
                origin_url: Some(origin.clone()),
            }
        } else if self.selection {
            DecodeRequest::Selection(input)
        } else {
            DecodeRequest::Link(input)
        }
    }
}

fn main() -> Result<()> {
    let env = env_logger::Env::default()
        .filter_or("UNWRAPURL_LOG", "warn")
        .write_style_or("UNWRAPURL_LOG_STYLE", "auto");
    env_logger::init_from_env(env);

    let args = Args::parse();
    let decoder = Decoder::new(args.config()?);

    let inputs = if args.inputs.is_empty() {
        read_stdin_lines()?
    } else {
        args.inputs.clone()
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0usize;

    for input in inputs {
        let request = args.request(input);

        if request.origin_url().is_some() && decoder.is_guarded(&request) {
            info!("guarded, left unchanged: {}", request.candidate_url());
            writeln!(out, "{}", request.candidate_url()).context("failed to write output")?;
            continue;
        }

        let result = decoder.decode(&request, args.fallback);
        if let DecodeResult::Failed(failure) = &result {
            warn!("{}: {}", failure.original, failure.error);
            failures += 1;
        }
        writeln!(out, "{}", result.target()).context("failed to write output")?;
    }

    if args.strict && failures > 0 {
        bail!("{} input(s) could not be decoded", failures);
    }

    Ok(())
}

fn read_stdin_lines() -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use xmljson::convert::input_to_value;
use xmljson::{error_payload, to_string_with_config, ConvertOptions, FormatConfig, Input, XmlConfig};

#[derive(Debug, Parser)]
#[command(name = "xmljson", version, about = "Convert XML documents to JSON")]
struct Args {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Spaces per indentation level
    #[arg(long, default_value_t = 2, value_name = "N")]
    indent: u8,
    /// Write JSON on a single line
    #[arg(long, conflicts_with = "indent")]
    compact: bool,
    /// Maximum element nesting depth (0 for unlimited)
    #[arg(long, default_value_t = 128, value_name = "N")]
    max_depth: u16,
    /// Maximum input size in bytes (0 for unlimited)
    #[arg(long, default_value_t = 10 * 1024 * 1024, value_name = "BYTES")]
    max_size: usize,
}

impl Args {
    fn options(&self) -> ConvertOptions {
        let format = if self.compact {
            FormatConfig::compact()
        } else {
            FormatConfig::with_indent(usize::from(self.indent))
        };
        ConvertOptions {
            xml: XmlConfig::new(self.max_depth, self.max_size),
            max_depth: self.max_depth,
            format,
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    run(&Args::parse())
}

fn run(args: &Args) -> Result<ExitCode> {
    let data = read_input(args.input.as_deref())?;
    let filename = args
        .input
        .as_deref()
        .map_or_else(|| "<stdin>".into(), Path::to_string_lossy);
    let input = Input::from_bytes(&data).with_filename(&filename);
    let options = args.options();

    let (value, code) = match input_to_value(&input, &options) {
        Ok(value) => (value, ExitCode::SUCCESS),
        Err(err) => {
            warn!(file = %filename, "conversion failed: {err}");
            (error_payload(&err), ExitCode::FAILURE)
        }
    };

    let mut text = to_string_with_config(&value, options.format);
    text.push('\n');
    write_output(args.output.as_deref(), text.as_bytes())?;
    debug!(bytes = text.len(), "wrote output");
    Ok(code)
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data).context("failed to write stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_flags() {
        let args = Args::parse_from(["xmljson", "--compact", "--max-depth", "4"]);
        let options = args.options();
        assert_eq!(options.format, FormatConfig::compact());
        assert_eq!(options.max_depth, 4);
        assert_eq!(options.xml.max_depth, 4);
    }

    #[test]
    fn test_default_options() {
        let options = Args::parse_from(["xmljson"]).options();
        assert_eq!(options, ConvertOptions::default());
    }
}

use clap::{Args, Parser, Subcommand};
use hexviewlib::{HexView, RenderConfig, SearchType, WordWidth};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{EnvFilter, fmt};

/// Hex dump of binary files loaded at arbitrary addresses.
#[derive(Parser, Debug)]
#[command(name = "hexdump", version)]
#[command(about = "Hex dump with word grouping, byte order and selection marks")]
struct Cli {
    /// Log library activity to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dump of all inputs, in the order given
    Dump {
        #[command(flatten)]
        inputs: Inputs,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Print the highlight spans of an address range as `line offset count`
    Mark {
        #[command(flatten)]
        inputs: Inputs,

        #[command(flatten)]
        render: RenderArgs,

        /// First selected address (hex, optional 0x prefix)
        #[arg(long, value_parser = parse_address)]
        start: u64,

        /// Number of selected bytes
        #[arg(long)]
        len: usize,
    },
    /// Print the address of every match
    Search {
        #[command(flatten)]
        inputs: Inputs,

        #[command(flatten)]
        pattern: PatternArgs,
    },
}

#[derive(Args, Debug)]
struct Inputs {
    /// Input files as `<file>[:<hex address>]`. Without an address a file is
    /// placed right after the previous one (the first one at 0x0).
    #[arg(required = true, value_parser = parse_input)]
    inputs: Vec<InputSpec>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Word width in bits: 8, 16, 32 or 64
    #[arg(short, long, default_value = "8", value_parser = parse_width)]
    width: WordWidth,

    /// Show each word in little-endian byte order
    #[arg(short, long)]
    little_endian: bool,
}

impl RenderArgs {
    const fn config(&self) -> RenderConfig {
        RenderConfig::new(self.width, self.little_endian)
    }
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct PatternArgs {
    /// Byte pattern in hex, e.g. "deadbeef" or "de ad be ef"
    #[arg(long)]
    hex: Option<String>,

    /// Literal ASCII text
    #[arg(long)]
    ascii: Option<String>,

    /// Regular expression over raw bytes
    #[arg(long)]
    regex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InputSpec {
    path: PathBuf,
    address: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Dump { inputs, render } => {
            let view = load_view(&inputs.inputs)?;
            print!("{}", view.render_all(render.config()));
            Ok(())
        }
        Command::Mark {
            inputs,
            render,
            start,
            len,
        } => {
            let view = load_view(&inputs.inputs)?;
            for span in view.mark_regions(start, len, render.config())? {
                println!("{} {} {}", span.line, span.char_offset, span.char_count);
            }
            Ok(())
        }
        Command::Search { inputs, pattern } => {
            let view = load_view(&inputs.inputs)?;
            let search_type = if let Some(hex) = pattern.hex {
                SearchType::Hex(parse_hex_bytes(&hex)?)
            } else if let Some(ascii) = pattern.ascii {
                SearchType::Ascii(ascii)
            } else if let Some(re) = pattern.regex {
                SearchType::Regex(re)
            } else {
                return Err("Missing search pattern".into());
            };

            for addr in view.search(&search_type) {
                println!("0x{addr:016x}");
            }
            Ok(())
        }
    }
}

/// Load every input file as one block of a fresh view
fn load_view(inputs: &[InputSpec]) -> Result<HexView, Box<dyn std::error::Error>> {
    let mut view = HexView::new();
    let mut next_free: u64 = 0;

    for input in inputs {
        let path = validate_exists(&input.path)?;
        let data = std::fs::read(&path)?;
        let len = data.len() as u64;
        let base_address = input.address.unwrap_or(next_free);

        view.add_data(data, base_address)
            .map_err(|e| format!("{}: {e}", path.display()))?;

        next_free = base_address.saturating_add(len);
    }

    Ok(view)
}

// =============================== HELPER FUNCTIONS ===============================

/// Parse a string as a hex number (with optional 0x prefix)
fn parse_address(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    u64::from_str_radix(digits, 16).map_err(|_e| format!("Invalid address: {s}"))
}

/// Parse a word width given in bits
fn parse_width(s: &str) -> Result<WordWidth, String> {
    let bits: u32 = s
        .trim()
        .parse()
        .map_err(|_e| format!("Invalid word width: {s}"))?;
    WordWidth::try_from(bits).map_err(|e| e.kind().to_string())
}

/// Parse `<file>[:<hex address>]`. A suffix that is not a hex address is part of the path.
fn parse_input(s: &str) -> Result<InputSpec, String> {
    if let Some((path, addr)) = s.rsplit_once(':')
        && !path.is_empty()
        && let Ok(address) = parse_address(addr)
    {
        return Ok(InputSpec {
            path: PathBuf::from(path),
            address: Some(address),
        });
    }

    Ok(InputSpec {
        path: PathBuf::from(s),
        address: None,
    })
}

/// Parse a hex byte string, ignoring whitespace and an optional 0x prefix
fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, String> {
    let digits: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);

    if digits.is_empty() || digits.len() % 2 != 0 {
        return Err(format!("Invalid hex pattern: {s}"));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| format!("Invalid hex pattern: {s}"))
        })
        .collect()
}

/// Validate that a path exists and is a file. Returns absolute path.
fn validate_exists(path: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()).into());
    }
    // Return absolute path
    Ok(std::fs::canonicalize(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_address_suffix() {
        // Act
        let plain = parse_input("data.bin");
        let addressed = parse_input("data.bin:0x1000");
        let colon_in_name = parse_input("dir/a:b.bin");
        let colon_and_address = parse_input("dir/a:b.bin:20");

        // Assert
        let spec = |path: &str, address| InputSpec {
            path: PathBuf::from(path),
            address,
        };
        assert_eq!(plain, Ok(spec("data.bin", None)));
        assert_eq!(addressed, Ok(spec("data.bin", Some(0x1000))));
        assert_eq!(colon_in_name, Ok(spec("dir/a:b.bin", None)));
        assert_eq!(colon_and_address, Ok(spec("dir/a:b.bin", Some(0x20))));
    }
}

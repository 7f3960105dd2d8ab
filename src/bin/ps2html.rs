//! ps2html - render algorithm pseudocode to HTML

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};

#[cfg(feature = "cli")]
use pseudotex::{Options, PseudotexError};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "ps2html")]
#[command(version)]
#[command(about = "Render LaTeX-style algorithm pseudocode as HTML", long_about = None)]
struct Cli {
    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// JSON file with options (camelCase keys); flags override it
    #[arg(long)]
    config: Option<String>,

    /// Block indentation, e.g. "1.2em"
    #[arg(long)]
    indent_size: Option<String>,

    /// Text placed before comments
    #[arg(long)]
    comment_delimiter: Option<String>,

    /// Number code lines
    #[arg(short = 'n', long)]
    line_number: bool,

    /// Punctuation after line numbers
    #[arg(long)]
    line_number_punc: Option<String>,

    /// Omit `end ...` lines
    #[arg(long)]
    no_end: bool,

    /// Draw scope lines beside blocks
    #[arg(long)]
    scope_lines: bool,

    /// Number the first caption after this value
    #[arg(long)]
    caption_count: Option<usize>,

    /// Keyword before caption numbers
    #[arg(long)]
    title_prefix: Option<String>,

    /// Print the parse tree instead of rendering
    #[arg(long)]
    dump_tree: bool,

    /// Wrap the markup in a minimal HTML page
    #[arg(long)]
    standalone: bool,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(feature = "cli")]
impl Cli {
    fn flag_options(&self) -> Options {
        Options {
            indent_size: self.indent_size.clone(),
            comment_delimiter: self.comment_delimiter.clone(),
            line_number: self.line_number.then_some(true),
            line_number_punc: self.line_number_punc.clone(),
            no_end: self.no_end.then_some(true),
            scope_lines: self.scope_lines.then_some(true),
            caption_count: self.caption_count,
            title_prefix: self.title_prefix.clone(),
        }
    }
}

#[cfg(feature = "cli")]
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder.init();
    log::debug!("logging initialized");
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn run(cli: &Cli) -> Result<(), PseudotexError> {
    // Read input
    let input = match cli.input_file {
        Some(ref path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let output = if cli.dump_tree {
        pseudotex::parse(&input)?.to_string()
    } else {
        let file_options = match cli.config {
            Some(ref path) => Options::from_json(&fs::read_to_string(path)?)?,
            None => Options::default(),
        };
        let options = file_options.merge(cli.flag_options()).resolve()?;
        let markup = pseudotex::render_to_string(&input, &options)?;
        if cli.standalone {
            standalone_page(&markup)
        } else {
            markup
        }
    };

    // Write output
    match cli.output {
        Some(ref path) => fs::write(path, output)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            if !output.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn standalone_page(markup: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Pseudocode</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        markup
    )
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install pseudotex --features cli");
    eprintln!("  ps2html [OPTIONS] [INPUT_FILE]");
}

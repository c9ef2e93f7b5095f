use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;

use docxide_html::{ConvertOptions, convert, converters};

#[derive(Parser)]
#[command(name = "docxide-html")]
#[command(version, about = "Convert DOCX documents to semantic HTML fragments", long_about = None)]
#[command(after_help = "EXAMPLES:
    docxide-html report.docx                  Print HTML to stdout
    docxide-html report.docx report.html      Write HTML to a file
    docxide-html --abiword notes.odt          Convert through AbiWord first")]
struct Cli {
    /// Input file (DOCX, HTML, or anything the converter understands)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Directory to extract embedded images into (defaults to the input's directory)
    #[arg(long, value_name = "DIR")]
    media_dir: Option<PathBuf>,

    /// Treat paragraphs in a larger than usual font as headings
    #[arg(long)]
    detect_font_size: bool,

    /// Convert non-DOCX input with AbiWord
    #[arg(long)]
    abiword: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let _ = env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .try_init();

    let options = ConvertOptions {
        converter: cli
            .abiword
            .then(|| Arc::new(converters::abiword) as docxide_html::Converter),
        detect_font_size: cli.detect_font_size,
        media_dir: cli.media_dir.clone(),
        ..Default::default()
    };

    match run(&cli, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, options: &ConvertOptions) -> docxide_html::Result<()> {
    let t0 = Instant::now();
    let html = convert(&cli.input, options)?;
    match &cli.output {
        Some(path) => std::fs::write(path, &html)?,
        None => std::io::stdout().write_all(html.as_bytes())?,
    }
    log::info!(
        "Converted {} in {:.1}ms ({} bytes)",
        cli.input.display(),
        t0.elapsed().as_secs_f64() * 1000.0,
        html.len(),
    );
    Ok(())
}

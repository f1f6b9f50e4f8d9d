//! CLI tool for converting PowerPoint slides into a plain-text Word document.

use anyhow::{Context, Result};
use clap::Parser;
use slidetext_convert::{ConversionForm, ConversionRequest, Converter, DEFAULT_HEADING_LABEL};
use slidetext_core::{FONT_CHOICES, DEFAULT_FONT_FAMILY};
use std::path::PathBuf;

/// Copy the text of every slide into a Word document, one heading per slide.
#[derive(Parser, Debug)]
#[command(name = "pptx2docx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file (.pptx)
    input: PathBuf,

    /// Output Word document (default: input path with a .docx extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Font family for the text paragraphs
    #[arg(short, long, default_value = DEFAULT_FONT_FAMILY)]
    font: String,

    /// Font size in points
    #[arg(short, long, default_value = "12")]
    size: String,

    /// Label placed before each slide number in headings
    #[arg(long, default_value = DEFAULT_HEADING_LABEL)]
    heading_label: String,

    /// Print the extracted outline to stdout instead of writing a document
    #[arg(short, long)]
    print: bool,

    /// Print a JSON summary of the conversion
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut form = ConversionForm::new();
    form.select_source(args.input.to_string_lossy());
    if let Some(output) = &args.output {
        form.output_path = output.to_string_lossy().into_owned();
    }
    form.font_family = args.font.clone();
    form.font_size = args.size.clone();

    let request = form.validate()?;
    if !request.font.is_known_family() {
        log::warn!(
            "Font '{}' is not one of the usual choices ({}); it is used as given",
            request.font.family,
            FONT_CHOICES.join(", ")
        );
    }

    let converter = Converter::new(request.font.clone()).with_heading_label(&args.heading_label);

    if args.print {
        return print_outline(&converter, &request);
    }

    if args.verbose {
        eprintln!("Processing: {}", request.source.display());
    }

    let report = converter
        .run(&request.source, &request.output)
        .with_context(|| format!("Error converting {}", request.source.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        eprintln!(
            "Converted {} slides ({} paragraphs) to {}",
            report.slides,
            report.paragraphs,
            report.output.display()
        );
    }

    Ok(())
}

/// Print the document outline as plain text.
fn print_outline(converter: &Converter, request: &ConversionRequest) -> Result<()> {
    let presentation = converter
        .load(&request.source)
        .with_context(|| format!("Error reading {}", request.source.display()))?;
    let document = converter.build_document(&presentation);
    print!("{}", document.to_plain_text());
    Ok(())
}

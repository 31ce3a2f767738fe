//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use docforge_files::{delete_directory, delete_file, DeleteMode};
use docforge_model::{from_plain_text, parse};
use docforge_ooxml::{compare, inspect, DocxEditor, DocxWriter, EditOperation};

/// Output format for structured results
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for LLM/tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "docforge")]
#[command(author, version, about = "Word document generation and inspection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON document description to DOCX
    Render {
        /// Input JSON description file
        input: PathBuf,

        /// Output DOCX file (defaults to the input name with .docx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a plain text file to DOCX, one paragraph per line
    Convert {
        /// Input text file
        input: PathBuf,

        /// Output DOCX file (defaults to the input name with .docx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the structural fingerprint of a DOCX file
    Inspect {
        /// Input DOCX file
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Compare the structure of two DOCX files
    Compare {
        /// First DOCX file
        doc1: PathBuf,

        /// Second DOCX file
        doc2: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Apply paragraph edit operations to an existing DOCX
    Edit {
        /// DOCX file to edit in place
        input: PathBuf,

        /// JSON file with an array of edit operations
        #[arg(short, long)]
        operations: PathBuf,
    },

    /// Delete a file (trash or permanent, confirmation required)
    DeleteFile {
        /// File to delete
        path: PathBuf,

        /// Literal confirmation token: "CORBEILLE" or "SUPPRESSION DÉFINITIVE"
        #[arg(long)]
        confirm: String,
    },

    /// Delete an empty directory (trash or permanent, confirmation required)
    DeleteDir {
        /// Directory to delete (must be empty)
        path: PathBuf,

        /// Literal confirmation token: "CORBEILLE" or "SUPPRESSION DÉFINITIVE"
        #[arg(long)]
        confirm: String,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { input, output } => render_command(&input, output.as_deref()),
        Commands::Convert { input, output } => convert_command(&input, output.as_deref()),
        Commands::Inspect { input, format } => inspect_command(&input, format),
        Commands::Compare { doc1, doc2, format } => compare_command(&doc1, &doc2, format),
        Commands::Edit { input, operations } => edit_command(&input, &operations),
        Commands::DeleteFile { path, confirm } => delete_file_command(&path, &confirm),
        Commands::DeleteDir { path, confirm } => delete_dir_command(&path, &confirm),
    }
}

/// Render a JSON description file to a DOCX file.
pub fn render_command(input: &Path, output: Option<&Path>) -> Result<()> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("failed to read description: {}", input.display()))?;
    let description = parse(&raw).with_context(|| "invalid document description")?;

    let output = resolve_output(input, output);
    DocxWriter::render_to_path(&description, &output)
        .with_context(|| format!("failed to render {}", output.display()))?;

    println!("Rendered {} -> {}", input.display(), output.display());
    Ok(())
}

/// Convert a plain text file to a DOCX file.
pub fn convert_command(input: &Path, output: Option<&Path>) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("failed to read text file: {}", input.display()))?;
    let description = from_plain_text(&content);

    let output = resolve_output(input, output);
    DocxWriter::render_to_path(&description, &output)
        .with_context(|| format!("failed to render {}", output.display()))?;

    println!("Converted {} -> {}", input.display(), output.display());
    Ok(())
}

/// Print the structural fingerprint of a document.
pub fn inspect_command(input: &Path, format: OutputFormat) -> Result<()> {
    let fingerprint =
        inspect(input).with_context(|| format!("failed to inspect {}", input.display()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&fingerprint)?),
        OutputFormat::Text => {
            println!("File: {}", input.display());
            println!("Tables: {}", fingerprint.table_count);
            for (i, table) in fingerprint.tables.iter().enumerate() {
                println!(
                    "  table {}: {} columns x {} data rows, widths {:?}",
                    i + 1,
                    table.column_count,
                    table.row_count,
                    table.column_widths
                );
            }
            println!("Paragraphs: {}", fingerprint.paragraph_count);
            println!("Header: {}", fingerprint.has_header);
            println!("Footer: {}", fingerprint.has_footer);
        }
    }
    Ok(())
}

/// Compare the structure of two documents.
pub fn compare_command(doc1: &Path, doc2: &Path, format: OutputFormat) -> Result<()> {
    let fp1 = inspect(doc1).with_context(|| format!("failed to inspect {}", doc1.display()))?;
    let fp2 = inspect(doc2).with_context(|| format!("failed to inspect {}", doc2.display()))?;
    let result = compare(&fp1, &fp2);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => {
            println!("{}", result.summary());
            for diff in &result.differences {
                println!(
                    "  {}: {} != {}",
                    diff.field, diff.value_in_doc1, diff.value_in_doc2
                );
            }
        }
    }
    Ok(())
}

/// Apply edit operations from a JSON file to a document.
pub fn edit_command(input: &Path, operations: &Path) -> Result<()> {
    let raw = fs::read_to_string(operations)
        .with_context(|| format!("failed to read operations: {}", operations.display()))?;
    let operations: Vec<EditOperation> =
        serde_json::from_str(&raw).with_context(|| "invalid edit operations")?;

    let mut editor =
        DocxEditor::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    editor.apply_all(&operations)?;
    editor.save()?;

    println!("Edited {}", input.display());
    Ok(())
}

/// Delete a file under the confirmation contract.
pub fn delete_file_command(path: &Path, confirm: &str) -> Result<()> {
    let Some(mode) = DeleteMode::parse(confirm) else {
        return Err(docforge_files::FileOpError::InvalidConfirmation.into());
    };
    let report = delete_file(path, mode)?;
    println!(
        "Deleted {} ({} bytes, {})",
        report.path, report.size, report.method
    );
    Ok(())
}

/// Delete an empty directory under the confirmation contract.
pub fn delete_dir_command(path: &Path, confirm: &str) -> Result<()> {
    let Some(mode) = DeleteMode::parse(confirm) else {
        return Err(docforge_files::FileOpError::InvalidConfirmation.into());
    };
    let report = delete_directory(path, mode)?;
    println!("Deleted directory {} ({})", report.path, report.method);
    Ok(())
}

fn resolve_output(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("docx"),
    }
}

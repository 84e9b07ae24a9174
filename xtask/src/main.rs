//! Build automation tasks for ProtLens
//!
//! - Generating the CLI reference from the clap definitions

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for ProtLens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<protlens_cli::Cli>();

    let content = format!(
        r#"# ProtLens CLI Reference

Generated from the CLI source code on {}.

ProtLens looks up a protein by gene symbol (e.g. `INS`) or UniProt accession
(e.g. `P01308`) and shows its function, subunit structure, recent literature
and the 3D models available for it.

## Quick Start

```bash
# Search by gene symbol
protlens search INS

# Pick a specific model and write an HTML page
protlens search P01308 --structure 1a7f --html insulin.html --open

# List available models
protlens structures TP53

# Interactive session
protlens shell
```

## Commands

{}

## Environment Variables

- `PROTLENS_UNIPROT_URL` - UniProtKB REST base URL (default: `https://rest.uniprot.org/uniprotkb`)
- `PROTLENS_STRUCTURES_URL` - 3D-Beacons summary base URL (default: `https://www.ebi.ac.uk/pdbe/pdbe-kb/3dbeacons/api/uniprot/summary`)
- `PROTLENS_SYMBOL_MAP` - CSV file of `SYMBOL,ACCESSION` rows replacing the bundled table
- `PROTLENS_HTTP_TIMEOUT_SECS` - Request timeout in seconds
- `PROTLENS_LOADING_TRAILING_MS` - How long the loading indicator lingers after a search
- `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT` - Logging overrides

---

*To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());

    Ok(())
}

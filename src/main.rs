use clap::{Parser, Subcommand};
use sheet_translator::cli;
use sheet_translator::config::CliOverrides;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheet-translate")]
#[command(about = "Translate Excel workbooks while keeping formatting, merges and macros")]
#[command(long_about = "Sheet Translator - translate the text of an Excel workbook
Formatting, merged cells, column widths, row heights and VBA macros are kept.

COMMANDS:
  translate   - Translate every sheet into a new workbook
  inspect     - Show sheets, layout and translatable text without changing anything

EXAMPLES:
  sheet-translate translate Mapa.xlsm                  # pt → en, writes Mapa_translated.xlsm
  sheet-translate translate report.xlsx -s es -t fr -o report_fr.xlsx
  sheet-translate translate Mapa.xlsm --config job.yaml
  sheet-translate inspect Mapa.xlsm")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Translate a workbook into a new file.

The input is copied byte for byte first, so macros and parts the
spreadsheet model does not understand survive. Then, sheet by sheet:
  1. layout (widths, heights, merges) is read from the untouched input
  2. every distinct text is translated once (cached per sheet)
  3. translations and cell styles are written into the copy
  4. merges and layout are restored and the copy is saved

A text that still fails after all retries is kept unchanged.

DURABILITY:
  The output is saved after every sheet. If a later sheet fails, the
  output is kept and the completed sheets are listed. Use
  --discard-partial to delete it instead.

JOB FILE (--config, YAML):
  source_lang: pt
  target_lang: en
  retry: { max_retries: 3, delay_ms: 1000 }
  settle: { kill_ms: 2000, remove_ms: 1000 }
  kill_process: true
  process_name: EXCEL.EXE

Command-line flags take precedence over the job file.")]
    /// Translate a workbook into a new file
    Translate {
        /// Workbook to translate (.xlsx, .xlsm, or .json dump)
        input: PathBuf,

        /// Output path (default: <name>_translated.<ext> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source language code (default: pt)
        #[arg(short, long)]
        source: Option<String>,

        /// Target language code (default: en)
        #[arg(short, long)]
        target: Option<String>,

        /// Attempts per text before keeping it unchanged (default: 3)
        #[arg(long)]
        max_retries: Option<u32>,

        /// Pause after each request in milliseconds; failures back off by multiples of it (default: 1000)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// YAML job file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Do not close running spreadsheet applications first
        #[arg(long)]
        no_kill: bool,

        /// Delete the output if any sheet fails, even after checkpoints
        #[arg(long)]
        discard_partial: bool,

        /// Google Cloud Translation API key (keyless endpoint when unset)
        #[arg(long, env = "GOOGLE_TRANSLATE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Show every translation and debug logs
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show sheets, layout and translatable text counts
    Inspect {
        /// Workbook to inspect
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Translate {
            input,
            output,
            source,
            target,
            max_retries,
            delay_ms,
            config,
            no_kill,
            discard_partial,
            api_key,
            verbose,
        } => {
            init_tracing(verbose);
            let overrides = CliOverrides {
                output,
                source_lang: source,
                target_lang: target,
                max_retries,
                delay_ms,
                no_kill,
                discard_partial,
            };
            cli::translate(input, config, overrides, api_key, verbose)?;
        }

        Commands::Inspect { input, json } => {
            init_tracing(false);
            cli::inspect(input, json)?;
        }
    }

    Ok(())
}

//! recipe-slim CLI - Trim a raw recipe CSV into a mobile-friendly JSON file
//!
//! # Main Command
//!
//! ```bash
//! recipe-slim                              # RAW_recipes.csv -> hazir_tarifler.json (5000 recipes)
//! recipe-slim transform -i raw.csv -o app.json -n 500
//! recipe-slim -i raw.csv -o app.json -n 500
//! recipe-slim --config options.json --validate
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! recipe-slim parse RAW_recipes.csv        # Load + select columns, dump raw rows as JSON
//! recipe-slim nutrition "[1, 2, 3, 4, 5, 6, 7]"
//! recipe-slim validate hazir_tarifler.json # Check an output file against the record schema
//! ```

use clap::{Args, Parser, Subcommand};
use recipe_slim::logs::{log_error, log_info, log_success, LOGGER};
use recipe_slim::{
    format_delimiter, load_table_file, parse_nutrition, transform_csv, validate_records,
    FieldOutcome, OptionOverrides, TransformOptions,
};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "recipe-slim", version)]
#[command(about = "Trim a raw recipe CSV into a mobile-friendly JSON file", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    transform: TransformArgs,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Options for the transform run. Unset flags fall back to the
/// environment, then the options file, then built-in defaults.
#[derive(Args, Debug)]
struct TransformArgs {
    /// Input CSV file [default: RAW_recipes.csv]
    #[arg(short, long, env = "RECIPE_SLIM_INPUT")]
    input: Option<PathBuf>,

    /// Output JSON file [default: hazir_tarifler.json]
    #[arg(short, long, env = "RECIPE_SLIM_OUTPUT")]
    output: Option<PathBuf>,

    /// Maximum number of recipes to keep [default: 5000]
    #[arg(short = 'n', long, env = "RECIPE_SLIM_LIMIT")]
    limit: Option<usize>,

    /// JSON options file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Indent the output JSON
    #[arg(long)]
    pretty: bool,

    /// Check the written file against the record schema
    #[arg(long)]
    validate: bool,
}

impl TransformArgs {
    fn into_overrides(self) -> (Option<PathBuf>, OptionOverrides) {
        let overrides = OptionOverrides {
            input_path: self.input,
            output_path: self.output,
            limit: self.limit,
            pretty: self.pretty,
            validate_output: self.validate,
        };
        (self.config, overrides)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full transformation (same as running without a subcommand)
    Transform(TransformArgs),

    /// Load a CSV file, select the recipe columns and output raw rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how a raw nutrition cell is parsed
    Nutrition {
        /// Raw cell text, e.g. "[51.5, 0.0, 13.0, 0.0, 2.0, 0.0, 4.0]"
        text: String,
    },

    /// Validate an output JSON file against the record schema
    Validate {
        /// Input JSON file (array of records)
        input: PathBuf,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(parse_exit_code(&e));
    });
    LOGGER.set_quiet(cli.quiet);

    let result = match cli.command {
        None => cmd_transform(cli.transform),

        Some(Commands::Transform(args)) => cmd_transform(args),

        Some(Commands::Parse { input, output }) => cmd_parse(&input, output.as_deref()),

        Some(Commands::Nutrition { text }) => cmd_nutrition(&text),

        Some(Commands::Validate { input }) => cmd_validate(&input),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Help and version output exit 0; every rejected command line exits 1.
fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

fn build_options(args: TransformArgs) -> Result<TransformOptions, Box<dyn std::error::Error>> {
    let (config, overrides) = args.into_overrides();
    Ok(TransformOptions::resolve(config.as_deref(), overrides)?)
}

fn cmd_transform(args: TransformArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(args)?;
    transform_csv(&options)?;
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("📄 Parsing CSV: {}", input.display()));

    let result = load_table_file(input)?;

    log_info(format!("Encoding: {}", result.encoding));
    log_info(format!("Delimiter: '{}'", format_delimiter(result.delimiter)));
    log_info(format!("Columns: {}", result.headers.join(", ")));
    log_success(format!("Parsed {} rows", result.rows.len()));

    let json = serde_json::to_string_pretty(&result.rows)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_nutrition(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (status, info) = match parse_nutrition(Some(text)) {
        FieldOutcome::Parsed(info) => ("parsed", info),
        FieldOutcome::Fallback(info) => ("fallback", info),
    };

    let json = json!({ "status": status, "nutrition_info": info });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("✔️  Validating: {}", input.display()));

    let content = fs::read_to_string(input)?;
    let document: Value = serde_json::from_str(&content)?;
    let report = validate_records(&document)?;

    for (i, errors) in report.errors.iter().take(5) {
        log_error(format!("Record {} invalid:", i));
        for err in errors.iter().take(3) {
            log_error(format!("   - {}", err));
        }
    }

    log_info(format!("📊 Results: {} valid, {} invalid", report.valid, report.invalid));
    report.into_result()?;

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            log_success(format!("💾 Output written to: {}", p.display()));
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use fracture_screen::patient::{PatientInput, Sex, BMD_NOT_PROVIDED};
use fracture_screen::scoring::{ScreeningModel, ScreeningResult};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
    Csv,
}

#[derive(Args, Debug)]
struct PatientArgs {
    /// Age in years (40-100)
    #[arg(long)]
    age: u32,

    /// Female or Male
    #[arg(long)]
    sex: Sex,

    /// Weight in kg (30-200)
    #[arg(long = "weight", allow_negative_numbers = true)]
    weight_kg: f64,

    /// Height in cm (120-220)
    #[arg(long = "height", allow_negative_numbers = true)]
    height_cm: f64,

    /// Femoral neck BMD in g/cm² (0.4-1.6); omit if not measured
    #[arg(long = "bmd", default_value_t = BMD_NOT_PROVIDED, allow_negative_numbers = true)]
    femoral_neck_bmd: f64,

    /// Prior fragility fracture
    #[arg(long)]
    prior_fracture: bool,

    /// Parental hip fracture
    #[arg(long)]
    parent_hip_fracture: bool,

    /// Current smoker
    #[arg(long)]
    current_smoker: bool,

    /// Long-term systemic glucocorticoids
    #[arg(long)]
    glucocorticoids: bool,

    /// Rheumatoid arthritis
    #[arg(long)]
    rheumatoid_arthritis: bool,

    /// Secondary causes of osteoporosis
    #[arg(long)]
    secondary_osteoporosis: bool,

    /// Alcohol >= 3 units/day
    #[arg(long)]
    alcohol: bool,

    /// One or more falls in last year
    #[arg(long)]
    fall: bool,

    /// Prolonged immobility / wheelchair-bound
    #[arg(long)]
    immobility: bool,
}

impl From<PatientArgs> for PatientInput {
    fn from(args: PatientArgs) -> Self {
        PatientInput {
            age: args.age,
            sex: args.sex,
            weight_kg: args.weight_kg,
            height_cm: args.height_cm,
            femoral_neck_bmd: args.femoral_neck_bmd,
            prior_fracture: args.prior_fracture,
            parent_hip_fracture: args.parent_hip_fracture,
            current_smoker: args.current_smoker,
            glucocorticoids: args.glucocorticoids,
            rheumatoid_arthritis: args.rheumatoid_arthritis,
            secondary_osteoporosis: args.secondary_osteoporosis,
            alcohol_3_or_more_per_day: args.alcohol,
            fall_in_last_year: args.fall,
            immobility: args.immobility,
        }
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Show how each factor moved the linear predictor
    #[arg(long)]
    explain: bool,

    /// Show the exported data row as a table
    #[arg(long)]
    show_row: bool,

    /// Save the result as CSV (defaults to fracture_screening_result.csv)
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = fracture_screen::export::DEFAULT_FILE_NAME
    )]
    export: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a patient from command-line flags
    Score {
        #[command(flatten)]
        patient: PatientArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Enter patient details interactively
    Form {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show the effective model weights and bands
    Model,
    /// Write a config file with the built-in model weights
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "fracture-screen")]
#[command(about = "Heuristic fracture-risk screening index (not a validated FRAX probability)", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/fracture-screen/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Load and validate the model, exiting on any config problem.
fn load_model(config_path: Option<PathBuf>) -> ScreeningModel {
    let config = match fracture_screen::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let model_config = config.model.unwrap_or_default();
    if let Err(errors) = fracture_screen::scoring::validate_model(&model_config) {
        eprintln!("Model config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let model = ScreeningModel::from_config(&model_config);
    log::debug!("Effective model: {:?}", model);
    model
}

fn score_and_render(input: &PatientInput, model: &ScreeningModel, output: &OutputArgs) {
    if let Err(errors) = input.validate() {
        eprintln!("Input errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_INPUT);
    }

    let result = fracture_screen::scoring::compute_screening(input, model);
    let record = fracture_screen::export::ScreeningRecord::today(input, &result);

    match output.format {
        Format::Text => print_text(&result, &record, output),
        Format::Json => match fracture_screen::output::format_json(input, &result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize result: {}", e);
                std::process::exit(EXIT_IO);
            }
        },
        Format::Csv => print!("{}", record.to_csv()),
    }

    if let Some(ref path) = output.export {
        if let Err(e) = fracture_screen::export::save_csv(path, &record) {
            eprintln!("Export failed: {:#}", e);
            std::process::exit(EXIT_IO);
        }
        eprintln!(
            "Saved result to {} ({})",
            path.display(),
            fracture_screen::export::CSV_MIME_TYPE
        );
    }
}

fn print_text(
    result: &ScreeningResult,
    record: &fracture_screen::export::ScreeningRecord,
    output: &OutputArgs,
) {
    let use_colors = fracture_screen::output::should_use_colors();
    println!("{}", fracture_screen::output::format_result(result, use_colors));

    if output.explain {
        println!();
        println!("{}", fracture_screen::output::format_breakdown(result));
    }

    if output.show_row {
        println!();
        println!("{}", fracture_screen::output::format_record_table(record));
    }
}

fn main() {
    // Argument errors count as invalid input; clap would exit 2, which is EXIT_IO
    let cli = match Cli::try_parse() {
        Ok(c) => c,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_INPUT } else { EXIT_SUCCESS };
            if let Err(print_err) = e.print() {
                eprintln!("{}", print_err);
            }
            std::process::exit(code);
        }
    };
    init_logging(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    match cli.command {
        Commands::Score { patient, output } => {
            let model = load_model(config_path);
            let input = PatientInput::from(patient);
            score_and_render(&input, &model, &output);
        }
        Commands::Form { output } => {
            let model = load_model(config_path);
            // Banner and prompts go to stderr so stdout carries only the result
            let use_colors = std::io::stderr().is_terminal();
            eprintln!("{}", fracture_screen::output::format_banner(use_colors));
            eprintln!("{}", fracture_screen::output::rule());

            let stdin = std::io::stdin();
            let mut prompter =
                fracture_screen::form::Prompter::new(stdin.lock(), std::io::stderr());
            let input = match fracture_screen::form::collect_patient(&mut prompter) {
                Ok(i) => i,
                Err(e) => {
                    eprintln!("Form error: {:#}", e);
                    std::process::exit(EXIT_IO);
                }
            };
            eprintln!();
            score_and_render(&input, &model, &output);
        }
        Commands::Model => {
            let model = load_model(config_path);
            println!("{}", fracture_screen::output::format_model(&model));
        }
        Commands::Init { force } => {
            let path = match config_path {
                Some(p) => p,
                None => match fracture_screen::config::get_config_path() {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("Config error: {:#}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                },
            };
            if let Err(e) = fracture_screen::config::write_default_config(&path, force) {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Config written to {}", path.display());
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

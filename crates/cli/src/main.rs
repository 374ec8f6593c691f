use cardio_core::{resolve_model_dir, CoreConfig, RiskService};
use cardio_types::{
    ChestPainType, ClinicalInput, ExerciseAngina, FastingBloodSugar, RestingEcg, Sex, StSlope,
};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

const MODEL_DIR_ENV: &str = "CARDIO_MODEL_DIR";
const CLASSIFIER_PATH_ENV: &str = "CARDIO_CLASSIFIER_PATH";
const SCALER_PATH_ENV: &str = "CARDIO_SCALER_PATH";
const SCHEMA_PATH_ENV: &str = "CARDIO_SCHEMA_PATH";

const GENERIC_FAILURE: &str =
    "Prediction is unavailable: the risk model could not be used. See the log for details.";

#[derive(Parser)]
#[command(name = "cardio")]
#[command(about = "Heart disease risk assessment CLI")]
struct Cli {
    /// Directory holding the model artifacts (default: models/)
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,
    /// Classifier artifact path (overrides the model directory)
    #[arg(long, global = true)]
    classifier: Option<PathBuf>,
    /// Scaler artifact path (overrides the model directory)
    #[arg(long, global = true)]
    scaler: Option<PathBuf>,
    /// Feature schema path, JSON or YAML (overrides the model directory)
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess heart disease risk for one patient
    Predict {
        #[command(flatten)]
        vitals: VitalsArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the feature row the model would receive
    Encode {
        #[command(flatten)]
        vitals: VitalsArgs,
        /// Print the row as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarise the loaded model artifacts
    Inspect,
}

/// Patient vitals, defaulting to the intake form's starting values.
#[derive(Args, Clone)]
struct VitalsArgs {
    /// Age in years (18-100)
    #[arg(long, default_value_t = 40)]
    age: u32,
    /// Sex (M, F)
    #[arg(long, default_value_t = Sex::Male)]
    sex: Sex,
    /// Chest pain type (ATA, NAP, TA, ASY)
    #[arg(long, default_value_t = ChestPainType::AtypicalAngina)]
    chest_pain: ChestPainType,
    /// Resting blood pressure in mm Hg (80-200)
    #[arg(long, default_value_t = 120)]
    resting_bp: u32,
    /// Cholesterol in mg/dL (100-600)
    #[arg(long, default_value_t = 200)]
    cholesterol: u32,
    /// Fasting blood sugar > 120 mg/dL (0, 1)
    #[arg(long, default_value_t = FastingBloodSugar::Normal)]
    fasting_bs: FastingBloodSugar,
    /// Resting ECG (Normal, ST, LVH)
    #[arg(long, default_value_t = RestingEcg::Normal)]
    resting_ecg: RestingEcg,
    /// Maximum heart rate (60-220)
    #[arg(long, default_value_t = 150)]
    max_hr: u32,
    /// Exercise-induced angina (Y, N)
    #[arg(long, default_value_t = ExerciseAngina::No)]
    exercise_angina: ExerciseAngina,
    /// Oldpeak, ST depression (0.0-6.0)
    #[arg(long, default_value_t = 1.0)]
    oldpeak: f64,
    /// ST slope (Up, Flat, Down)
    #[arg(long, default_value_t = StSlope::Up)]
    st_slope: StSlope,
}

impl From<VitalsArgs> for ClinicalInput {
    fn from(args: VitalsArgs) -> Self {
        Self {
            age: args.age,
            sex: args.sex,
            chest_pain_type: args.chest_pain,
            resting_bp: args.resting_bp,
            cholesterol: args.cholesterol,
            fasting_bs: args.fasting_bs,
            resting_ecg: args.resting_ecg,
            max_hr: args.max_hr,
            exercise_angina: args.exercise_angina,
            oldpeak: args.oldpeak,
            st_slope: args.st_slope,
        }
    }
}

/// Process exit code for a successful command.
const EXIT_OK: u8 = 0;
/// Process exit code when the model bundle cannot be loaded or applied.
const EXIT_FAILURE: u8 = 1;
/// Process exit code when the patient vitals fail boundary validation.
const EXIT_INVALID_INPUT: u8 = 2;

/// Entry point for the `cardio` CLI.
///
/// Configuration is resolved once here and passed into the core:
/// - `.env` is loaded if present
/// - artifact locations come from flags, then `CARDIO_*` environment variables, then `models/`
///
/// Input errors are reported in full. Any fault inside the core is logged and replaced by a
/// generic message on stderr.
fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cardio=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let paths = ArtifactPaths::from_cli(&cli);
    let Some(command) = cli.command else {
        println!("Use 'cardio --help' for commands");
        return Ok(ExitCode::SUCCESS);
    };

    Ok(ExitCode::from(run(command, &paths)))
}

/// Run one command and return the process exit code.
fn run(command: Commands, paths: &ArtifactPaths) -> u8 {
    match command {
        Commands::Predict { vitals, json } => {
            let Some(input) = checked_input(vitals) else {
                return EXIT_INVALID_INPUT;
            };
            with_service(paths, |service| {
                let result = service.assess(&input)?;
                Ok(if json {
                    render::prediction_json(&result)?
                } else {
                    render::prediction_text(&result)
                })
            })
        }
        Commands::Encode { vitals, json } => {
            let Some(input) = checked_input(vitals) else {
                return EXIT_INVALID_INPUT;
            };
            with_service(paths, |service| {
                let row = service.encode(&input)?;
                Ok(if json {
                    render::row_json(&row)?
                } else {
                    render::row_text(&row)
                })
            })
        }
        Commands::Inspect => {
            with_service(paths, |service| Ok(render::artifacts_summary(service.artifacts())))
        }
    }
}

/// Validate vitals at the boundary, printing the reason on failure.
fn checked_input(vitals: VitalsArgs) -> Option<ClinicalInput> {
    let input = ClinicalInput::from(vitals);
    match input.validate() {
        Ok(()) => Some(input),
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            None
        }
    }
}

/// Load the model bundle, render with it and print the output.
///
/// Every failure past input validation is logged and reported with the same generic message.
fn with_service<F>(paths: &ArtifactPaths, render: F) -> u8
where
    F: FnOnce(&RiskService) -> anyhow::Result<String>,
{
    let service = match resolve_config(paths)
        .and_then(|cfg| RiskService::load(&cfg).map_err(anyhow::Error::from))
    {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("failed to load model artifacts: {:#}", e);
            eprintln!("{}", GENERIC_FAILURE);
            return EXIT_FAILURE;
        }
    };

    match render(&service) {
        Ok(text) => {
            println!("{}", text);
            EXIT_OK
        }
        Err(e) => {
            tracing::error!("risk assessment failed: {:#}", e);
            eprintln!("{}", GENERIC_FAILURE);
            EXIT_FAILURE
        }
    }
}

/// Artifact locations gathered from flags and the environment.
struct ArtifactPaths {
    model_dir: Option<PathBuf>,
    classifier: Option<PathBuf>,
    scaler: Option<PathBuf>,
    schema: Option<PathBuf>,
}

impl ArtifactPaths {
    fn from_cli(cli: &Cli) -> Self {
        Self::from_cli_with_env(cli, |key| std::env::var_os(key))
    }

    /// Flags win; `env` is consulted for anything left unset.
    fn from_cli_with_env<E>(cli: &Cli, env: E) -> Self
    where
        E: Fn(&str) -> Option<OsString>,
    {
        let env_path = |key: &str| env(key).map(PathBuf::from);
        Self {
            model_dir: cli.model_dir.clone().or_else(|| env_path(MODEL_DIR_ENV)),
            classifier: cli
                .classifier
                .clone()
                .or_else(|| env_path(CLASSIFIER_PATH_ENV)),
            scaler: cli.scaler.clone().or_else(|| env_path(SCALER_PATH_ENV)),
            schema: cli.schema.clone().or_else(|| env_path(SCHEMA_PATH_ENV)),
        }
    }
}

/// Build the core configuration; the model directory is only resolved when some artifact
/// has no explicit path.
fn resolve_config(paths: &ArtifactPaths) -> anyhow::Result<CoreConfig> {
    if let (Some(classifier), Some(scaler), Some(schema)) =
        (&paths.classifier, &paths.scaler, &paths.schema)
    {
        return Ok(CoreConfig::new(
            classifier.clone(),
            scaler.clone(),
            schema.clone(),
        ));
    }

    let model_dir = resolve_model_dir(paths.model_dir.clone())?;
    let mut cfg = CoreConfig::from_model_dir(&model_dir);
    if let Some(path) = &paths.classifier {
        cfg = cfg.with_classifier_path(path.clone());
    }
    if let Some(path) = &paths.scaler {
        cfg = cfg.with_scaler_path(path.clone());
    }
    if let Some(path) = &paths.schema {
        cfg = cfg.with_schema_path(path.clone());
    }
    Ok(cfg)
}

//! Stress CLI - Command-line interface for Synheart Stress
//!
//! Commands:
//! - screen: Screen intake forms and emit reports (batch mode)
//! - validate: Validate intake forms against the field domains
//! - doctor: Diagnose model and configuration health
//! - schema: Print schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use synheart_stress::classifier::{
    BandTable, ClassifierConfig, BMI_REVISED, BMI_STANDARD, BODY_TEMPERATURE_CLINICAL,
    BODY_TEMPERATURE_LEGACY,
};
use synheart_stress::fields::FIELD_SPECS;
use synheart_stress::model::ThresholdModel;
use synheart_stress::normalizer;
use synheart_stress::pipeline::StressProcessor;
use synheart_stress::types::ScreeningReport;
use synheart_stress::{IntakeForm, PRODUCER_NAME, REPORT_VERSION, SCHEMA_VERSION, STRESS_VERSION};

/// Stress - On-device stress screening from sleep physiology
#[derive(Parser)]
#[command(name = "stress")]
#[command(author = "Synheart AI Inc")]
#[command(version = STRESS_VERSION)]
#[command(about = "Screen sleep physiology intakes for stress levels", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen intake forms and emit reports (batch mode)
    Screen {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "auto")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Threshold model definition file (defaults to the built-in model)
        #[arg(long)]
        model: Option<PathBuf>,

        /// BMI band table
        #[arg(long, default_value = "standard")]
        bmi_table: BmiTable,

        /// Body-temperature band table
        #[arg(long, default_value = "clinical")]
        temperature_table: TemperatureTable,

        /// Write the session history CSV to this file after screening
        #[arg(long)]
        export_history: Option<PathBuf>,
    },

    /// Validate intake forms against the field domains
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "auto")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose model and configuration health
    Doctor {
        /// Check a threshold model definition file
        #[arg(long)]
        model: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (intake or report)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Detect NDJSON, JSON array, or single object
    Auto,
    /// Newline-delimited JSON (one form per line)
    Ndjson,
    /// JSON array of forms, or a single form object
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one report per line)
    Ndjson,
    /// JSON array of reports
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum BmiTable {
    /// Normal weight caps at 24.9
    Standard,
    /// Revised 25/30/35 cut points
    Revised,
}

impl BmiTable {
    fn table(&self) -> &'static BandTable {
        match self {
            BmiTable::Standard => &BMI_STANDARD,
            BmiTable::Revised => &BMI_REVISED,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum TemperatureTable {
    /// Clinical bands around 97.0-99.5 °F
    Clinical,
    /// Wide legacy 80-100 °F band
    Legacy,
}

impl TemperatureTable {
    fn table(&self) -> &'static BandTable {
        match self {
            TemperatureTable::Clinical => &BODY_TEMPERATURE_CLINICAL,
            TemperatureTable::Legacy => &BODY_TEMPERATURE_LEGACY,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Intake schema (stress.intake.v1)
    Intake,
    /// Report schema (ssr.v1)
    Report,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), StressCliError> {
    match cli.command {
        Commands::Screen {
            input,
            output,
            input_format,
            output_format,
            model,
            bmi_table,
            temperature_table,
            export_history,
        } => cmd_screen(
            &input,
            &output,
            input_format,
            output_format,
            model.as_deref(),
            bmi_table,
            temperature_table,
            export_history.as_deref(),
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor { model, json } => cmd_doctor(model.as_deref(), json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_screen(
    input: &PathBuf,
    output: &PathBuf,
    input_format: InputFormat,
    output_format: OutputFormat,
    model: Option<&Path>,
    bmi_table: BmiTable,
    temperature_table: TemperatureTable,
    export_history: Option<&Path>,
) -> Result<(), StressCliError> {
    // Read input
    let input_data = read_input(input)?;

    // Parse forms
    let forms = parse_forms(&input_data, input_format)?;

    if forms.is_empty() {
        return Err(StressCliError::NoForms);
    }

    // Create processor with the selected tables
    let config = ClassifierConfig {
        bmi: bmi_table.table(),
        body_temperature: temperature_table.table(),
    };
    let mut processor = StressProcessor::new().with_config(config);

    // Load a model definition if provided
    if let Some(model_path) = model {
        let model_json = fs::read_to_string(model_path)?;
        let loaded = ThresholdModel::from_json(&model_json)?;
        processor = processor.with_model(Box::new(loaded));
    }

    // Screen each form through the pipeline
    let mut reports: Vec<ScreeningReport> = Vec::new();
    for form in &forms {
        reports.push(processor.screen(form)?);
    }

    // Export the session history if requested
    if let Some(history_path) = export_history {
        let csv_text = processor.export_history_csv()?;
        fs::write(history_path, csv_text)?;
    }

    // Write output
    let output_data = format_output(&reports, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(
    input: &PathBuf,
    input_format: InputFormat,
    json: bool,
) -> Result<(), StressCliError> {
    // Read input
    let input_data = read_input(input)?;

    // Parse forms
    let forms = parse_forms(&input_data, input_format)?;

    // Validate each form
    let rejections = normalizer::validate_batch(&forms);

    let report = ValidationReport {
        total_forms: forms.len(),
        valid_forms: forms.len() - rejections.len(),
        invalid_forms: rejections.len(),
        errors: rejections
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                message: r.failure.to_string(),
                violations: r
                    .failure
                    .violations()
                    .iter()
                    .map(|v| v.to_string())
                    .collect(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total forms:   {}", report.total_forms);
        println!("Valid forms:   {}", report.valid_forms);
        println!("Invalid forms: {}", report.invalid_forms);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Form {}:", err.index);
                for violation in &err.violations {
                    println!("      {}", violation);
                }
            }
        }
    }

    if report.invalid_forms > 0 {
        Err(StressCliError::ValidationFailed(report.invalid_forms))
    } else {
        Ok(())
    }
}

fn cmd_doctor(model: Option<&Path>, json: bool) -> Result<(), StressCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    // Check library version
    checks.push(DoctorCheck {
        name: "stress_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Stress version {}", STRESS_VERSION),
    });

    // Check schema versions
    checks.push(DoctorCheck {
        name: "schema_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Intake schema: {}", SCHEMA_VERSION),
    });
    checks.push(DoctorCheck {
        name: "report_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Report schema: {}", REPORT_VERSION),
    });

    // Check model definition if provided
    if let Some(model_path) = model {
        if model_path.exists() {
            match fs::read_to_string(model_path) {
                Ok(content) => match ThresholdModel::from_json(&content) {
                    Ok(loaded) => {
                        checks.push(DoctorCheck {
                            name: "model".to_string(),
                            status: CheckStatus::Ok,
                            message: format!(
                                "Model '{}' valid ({} rules, default class {})",
                                loaded.name,
                                loaded.rules.len(),
                                loaded.default_class
                            ),
                        });
                    }
                    Err(e) => {
                        checks.push(DoctorCheck {
                            name: "model".to_string(),
                            status: CheckStatus::Error,
                            message: format!("Invalid model definition: {}", e),
                        });
                    }
                },
                Err(e) => {
                    checks.push(DoctorCheck {
                        name: "model".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Cannot read model file: {}", e),
                    });
                }
            }
        } else {
            checks.push(DoctorCheck {
                name: "model".to_string(),
                status: CheckStatus::Warning,
                message: "Model file does not exist".to_string(),
            });
        }
    } else {
        checks.push(DoctorCheck {
            name: "model".to_string(),
            status: CheckStatus::Ok,
            message: "Using built-in sleep-threshold-v1 model".to_string(),
        });
    }

    // Check stdin is available (for piped input)
    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (batch mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: STRESS_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Stress Doctor Report");
        println!("====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(StressCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), StressCliError> {
    match schema_type {
        SchemaType::Intake => {
            if json_schema {
                println!("{}", get_intake_json_schema());
            } else {
                println!("Intake Schema: {}", SCHEMA_VERSION);
                println!();
                println!("One form per subject, twelve fields:");
                println!();
                for spec in FIELD_SPECS.iter() {
                    let domain = match spec.domain {
                        Some(d) => format!("{} to {}", d.min, d.max),
                        None => "yes/no or male/female".to_string(),
                    };
                    let unit = spec.unit.unwrap_or("-");
                    let note = if spec.blank_to_zero {
                        " (free text, blank reads as 0)"
                    } else {
                        ""
                    };
                    println!(
                        "  {:<18} {:<12} {}{}",
                        spec.field.as_str(),
                        unit,
                        domain,
                        note
                    );
                }
                println!();
                println!("All domain bounds are inclusive. Out-of-range values reject the form.");
            }
        }
        SchemaType::Report => {
            if json_schema {
                println!("{}", get_report_json_schema());
            } else {
                println!("Report Schema: {}", REPORT_VERSION);
                println!();
                println!("A screening report contains:");
                println!();
                println!("- report_version: Schema version (ssr.v1)");
                println!("- producer: {{ name, version, instance_id }}");
                println!("- computed_at_utc: Report timestamp (RFC 3339)");
                println!("- stress: {{ class, level, label }}");
                println!("- marital_status, gender: Human-readable strings");
                println!("- readings: One entry per banded field:");
                println!("  - field, value, label, severity");
                println!("- defaulted_fields: Free-text fields that read as 0");
                println!("- features: The validated feature vector");
                println!("- recommendations: Guidance lines for the stress level");
            }
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &PathBuf) -> Result<String, StressCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_forms(input_data: &str, format: InputFormat) -> Result<Vec<IntakeForm>, StressCliError> {
    let forms = match format {
        InputFormat::Auto => IntakeForm::parse_batch(input_data)?,
        InputFormat::Ndjson => IntakeForm::parse_ndjson(input_data)?,
        InputFormat::Json => {
            if input_data.trim_start().starts_with('[') {
                serde_json::from_str::<Vec<IntakeForm>>(input_data)?
            } else {
                vec![IntakeForm::parse_json(input_data)?]
            }
        }
    };
    Ok(forms)
}

fn format_output(
    reports: &[ScreeningReport],
    format: &OutputFormat,
) -> Result<String, StressCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for report in reports {
                lines.push(serde_json::to_string(report)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(reports)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(reports)?),
    }
}

fn get_intake_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://synheart.ai/schemas/stress.intake.v1.json",
        "title": "stress.intake.v1",
        "description": "Synheart stress screening intake schema",
        "type": "object",
        "required": [
            "age", "marital_status", "gender", "bmi", "respiration_rate",
            "body_temperature", "blood_oxygen", "sleeping_hours", "heart_rate"
        ],
        "additionalProperties": false,
        "properties": {
            "age": { "type": "integer", "minimum": 18, "maximum": 80 },
            "marital_status": { "type": "string", "enum": ["yes", "no"] },
            "gender": { "type": "string", "enum": ["male", "female"] },
            "bmi": { "type": "number", "minimum": 18, "maximum": 40 },
            "snoring_rate": {
                "type": "string",
                "description": "Free text; blank or unparsable reads as 0. Valid range 0-50."
            },
            "respiration_rate": { "type": "number", "minimum": 0, "maximum": 50 },
            "body_temperature": { "type": "number", "minimum": 60, "maximum": 110 },
            "limb_movement": {
                "type": "string",
                "description": "Free text; blank or unparsable reads as 0. Valid range 0-35."
            },
            "blood_oxygen": { "type": "number", "minimum": 60, "maximum": 110 },
            "eye_movement": {
                "type": "string",
                "description": "Free text; blank or unparsable reads as 0. Valid range 0-35."
            },
            "sleeping_hours": { "type": "number", "minimum": 0, "maximum": 24 },
            "heart_rate": { "type": "number", "minimum": 30, "maximum": 100 }
        }
    })
    .to_string()
}

fn get_report_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://synheart.ai/schemas/ssr.v1.json",
        "title": "ssr.v1",
        "description": "Synheart stress screening report schema",
        "type": "object",
        "required": [
            "report_version", "producer", "computed_at_utc", "stress",
            "marital_status", "gender", "readings", "defaulted_fields",
            "features", "recommendations"
        ],
        "properties": {
            "report_version": { "type": "string", "const": "ssr.v1" },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "computed_at_utc": { "type": "string", "format": "date-time" },
            "stress": {
                "type": "object",
                "properties": {
                    "class": { "type": "integer" },
                    "level": {
                        "type": "string",
                        "enum": ["no_stress", "low", "moderate", "high", "max", "unknown"]
                    },
                    "label": { "type": "string" }
                }
            },
            "marital_status": { "type": "string" },
            "gender": { "type": "string" },
            "readings": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "field": { "type": "string" },
                        "value": { "type": "number" },
                        "label": { "type": "string" },
                        "severity": {
                            "type": "string",
                            "enum": ["critical", "warning", "normal", "neutral"]
                        }
                    }
                }
            },
            "defaulted_fields": { "type": "array", "items": { "type": "string" } },
            "features": { "type": "object" },
            "recommendations": { "type": "array", "items": { "type": "string" } }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum StressCliError {
    Io(io::Error),
    Screen(synheart_stress::ScreenError),
    Json(serde_json::Error),
    NoForms,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for StressCliError {
    fn from(e: io::Error) -> Self {
        StressCliError::Io(e)
    }
}

impl From<synheart_stress::ScreenError> for StressCliError {
    fn from(e: synheart_stress::ScreenError) -> Self {
        StressCliError::Screen(e)
    }
}

impl From<serde_json::Error> for StressCliError {
    fn from(e: serde_json::Error) -> Self {
        StressCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<StressCliError> for CliError {
    fn from(e: StressCliError) -> Self {
        use synheart_stress::ScreenError;

        match e {
            StressCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            StressCliError::Screen(e) => {
                let (code, hint) = match &e {
                    ScreenError::Rejected(_) => (
                        "VALIDATION_ERROR",
                        "Run 'stress validate' for the full violation list",
                    ),
                    ScreenError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
                    ScreenError::ParseError(_) => (
                        "PARSE_ERROR",
                        "Ensure input matches the stress.intake.v1 schema",
                    ),
                    ScreenError::ModelError(_) | ScreenError::InvalidModel(_) => {
                        ("MODEL_ERROR", "Check the model definition file")
                    }
                    ScreenError::CsvError(_) | ScreenError::ExportError(_) => {
                        ("EXPORT_ERROR", "Check the export path and contents")
                    }
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            StressCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            StressCliError::NoForms => CliError {
                code: "NO_FORMS".to_string(),
                message: "No intake forms found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            StressCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} forms failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            StressCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_forms: usize,
    valid_forms: usize,
    invalid_forms: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    message: String,
    violations: Vec<String>,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

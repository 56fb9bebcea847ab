use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vb_blend::BlendStatus;
use vb_project::evaluate::{BlendOutcome, ExtrapolationOutcome, LineOutcome};
use vb_project::{
    DecimalSeparator, ExtrapolateRequest, Language, MeasurementDef, MixturePartDef, MixtureRequest,
    NumericInput, Outcome, Preferences, ProjectError, PropertyKind, Request, TwoBasesRequest,
    TwoPointRequest, ViscosityIndexRequest, evaluate, format_number, format_with,
};

#[derive(Parser)]
#[command(name = "vb-cli")]
#[command(about = "Viscoblend CLI - Walther viscosity calculations and blend solving", long_about = None)]
struct Cli {
    /// Decimals shown for results
    #[arg(long, global = true)]
    decimals: Option<u32>,
    /// Use a decimal comma in output
    #[arg(long, global = true)]
    comma: bool,
    /// Output language defaults
    #[arg(long, global = true, value_enum)]
    lang: Option<LangArg>,
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walther line through two measurements
    Walther {
        /// Viscosity at the first temperature [mm²/s]
        v1: String,
        /// First temperature [°C]
        t1: String,
        /// Viscosity at the second temperature [mm²/s]
        v2: String,
        /// Second temperature [°C]
        t2: String,
        /// Also evaluate the line at this temperature [°C]
        #[arg(long)]
        at: Option<String>,
    },
    /// Viscosity index (ASTM D2270)
    Vi {
        /// Kinematic viscosity at 40 °C [mm²/s]
        kv40: String,
        /// Kinematic viscosity at 100 °C [mm²/s]
        kv100: String,
    },
    /// Viscosity of a blend with known shares
    Mix {
        /// Components as VISCOSITY:PERCENT, e.g. 100:60 10:40
        #[arg(required = true)]
        parts: Vec<String>,
    },
    /// Split between two bases that reaches a target viscosity
    TwoBases {
        /// Target blend viscosity [mm²/s]
        target: String,
        /// Base A viscosity [mm²/s]
        base_a: String,
        /// Base B viscosity [mm²/s]
        base_b: String,
        /// Additional component with a known share, as VISCOSITY:PERCENT
        #[arg(long = "known")]
        known: Vec<String>,
    },
    /// Extrapolate a property to another temperature
    Extrapolate {
        /// Measurement as TEMPERATURE:VALUE (repeat at least twice)
        #[arg(long = "point", required = true)]
        points: Vec<String>,
        /// Target temperature [°C]
        #[arg(long)]
        target: String,
        /// Property being fitted
        #[arg(long, value_enum, default_value_t = PropertyArg::Viscosity)]
        property: PropertyArg,
    },
    /// Run every request in a YAML or JSON document
    Solve {
        /// Path to the request document
        path: PathBuf,
    },
    /// Validate a request document without running it
    Validate {
        /// Path to the request document
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LangArg {
    En,
    Fr,
}

#[derive(Clone, Copy, ValueEnum)]
enum PropertyArg {
    Viscosity,
    Density,
    Other,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error("Invalid argument {arg}: {reason}")]
    InvalidArgument { arg: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let request = match &cli.command {
        Commands::Solve { path } => return cmd_solve(&cli, path),
        Commands::Validate { path } => return cmd_validate(path),
        Commands::Walther { v1, t1, v2, t2, at } => Request::TwoPoint(TwoPointRequest {
            first: measurement(t1, v1),
            second: measurement(t2, v2),
            evaluate_at: at.as_deref().map(NumericInput::from),
        }),
        Commands::Vi { kv40, kv100 } => Request::ViscosityIndex(ViscosityIndexRequest::Standard {
            kv40: kv40.as_str().into(),
            kv100: kv100.as_str().into(),
        }),
        Commands::Mix { parts } => Request::Mixture(MixtureRequest {
            components: parse_parts("parts", parts)?,
        }),
        Commands::TwoBases {
            target,
            base_a,
            base_b,
            known,
        } => Request::TwoBases(TwoBasesRequest {
            target: target.as_str().into(),
            base_a: base_a.as_str().into(),
            base_b: base_b.as_str().into(),
            known: parse_parts("known", known)?,
        }),
        Commands::Extrapolate {
            points,
            target,
            property,
        } => Request::Extrapolate(ExtrapolateRequest {
            property: match property {
                PropertyArg::Viscosity => PropertyKind::KinematicViscosity,
                PropertyArg::Density => PropertyKind::Density,
                PropertyArg::Other => PropertyKind::Other,
            },
            points: points
                .iter()
                .map(|p| {
                    let (t, v) = split_pair("point", p)?;
                    Ok(measurement(t, v))
                })
                .collect::<CliResult<Vec<_>>>()?,
            target_temperature: target.as_str().into(),
            sweep: None,
        }),
    };

    let prefs = preferences(&cli, Preferences::default());
    run_request(&request, &prefs, cli.json)
}

fn preferences(cli: &Cli, base: Preferences) -> Preferences {
    let mut prefs = match cli.lang {
        Some(LangArg::En) => Preferences::for_language(Language::En).with_decimals(base.decimals),
        Some(LangArg::Fr) => Preferences::for_language(Language::Fr).with_decimals(base.decimals),
        None => base,
    };
    if let Some(decimals) = cli.decimals {
        prefs.decimals = decimals;
    }
    if cli.comma {
        prefs.decimal_separator = DecimalSeparator::Comma;
    }
    prefs
}

fn measurement(temperature: &str, value: &str) -> MeasurementDef {
    MeasurementDef {
        temperature: temperature.into(),
        value: value.into(),
    }
}

fn split_pair<'a>(arg: &str, text: &'a str) -> CliResult<(&'a str, &'a str)> {
    text.split_once(':').ok_or_else(|| CliError::InvalidArgument {
        arg: arg.to_string(),
        reason: format!("expected A:B, got {text:?}"),
    })
}

fn parse_parts(arg: &str, parts: &[String]) -> CliResult<Vec<MixturePartDef>> {
    parts
        .iter()
        .map(|p| {
            let (viscosity, percent) = split_pair(arg, p)?;
            Ok(MixturePartDef {
                viscosity: viscosity.into(),
                percent: percent.into(),
            })
        })
        .collect()
}

fn cmd_validate(path: &Path) -> CliResult<()> {
    println!("Validating request document: {}", path.display());
    let doc = vb_project::load(path)?;
    println!("✓ Document is valid ({} requests)", doc.requests.len());
    Ok(())
}

fn cmd_solve(cli: &Cli, path: &Path) -> CliResult<()> {
    let doc = vb_project::load(path)?;
    info!(path = %path.display(), requests = doc.requests.len(), "loaded request document");
    let prefs = preferences(cli, doc.preferences);

    if let Some(name) = &doc.name {
        if !cli.json {
            println!("{name}");
        }
    }
    for (i, request) in doc.requests.iter().enumerate() {
        debug!(index = i, kind = request.kind(), "running request");
        if !cli.json {
            println!("\n[{}] {}", i + 1, request.kind());
        }
        run_request(request, &prefs, cli.json)?;
    }
    Ok(())
}

fn run_request(request: &Request, prefs: &Preferences, json: bool) -> CliResult<()> {
    let outcome = evaluate(request)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render(&outcome, prefs);
    }
    Ok(())
}

fn render(outcome: &Outcome, prefs: &Preferences) {
    let n = |v: f64| format_number(v, prefs);
    match outcome {
        Outcome::TwoPoint(line) => render_line(line, prefs),
        Outcome::Extrapolate(ex) => render_extrapolation(ex, prefs),
        Outcome::ViscosityIndex(vi) => {
            println!("Viscosity index: {}", format_with(vi.index, 1, prefs));
            println!("  KV40  = {} mm²/s", n(vi.kv40));
            println!("  KV100 = {} mm²/s", n(vi.kv100));
        }
        Outcome::Mixture(m) => {
            println!("Blend viscosity: {} mm²/s", n(m.viscosity));
            println!("  Total: {} %", format_with(m.total_percent, 1, prefs));
        }
        Outcome::TwoBases(split) => {
            println!("Base A: {} %", n(split.percent_a));
            println!("Base B: {} %", n(split.percent_b));
        }
        Outcome::Blend(blend) => render_blend(blend, prefs),
    }
}

fn render_line(line: &LineOutcome, prefs: &Preferences) {
    println!("Walther line: {}", line.equation);
    println!("  slope     = {}", format_with(line.slope, 4, prefs));
    println!("  intercept = {}", format_with(line.intercept, 4, prefs));
    if let Some((t, v)) = line.evaluated {
        println!(
            "  KV({} °C) = {} mm²/s",
            format_number(t, prefs),
            format_number(v, prefs)
        );
    }
}

fn render_extrapolation(ex: &ExtrapolationOutcome, prefs: &Preferences) {
    let unit = match ex.property {
        PropertyKind::KinematicViscosity => " mm²/s",
        PropertyKind::Density => " kg/m³",
        PropertyKind::Other => "",
    };
    println!("Fit: {}", ex.equation);
    println!(
        "  Value at {} °C: {}{unit}",
        format_number(ex.target_temperature, prefs),
        format_with(ex.value, 4, prefs)
    );
    if let Some(beta) = ex.expansion_coefficient {
        println!("  Thermal expansion coefficient: {beta:.3e} 1/K");
    }
    println!("  {:>10}  {:>14}", "T [°C]", "value");
    for (t, v) in &ex.table {
        println!(
            "  {:>10}  {:>14}",
            format_with(*t, 1, prefs),
            format_with(*v, 4, prefs)
        );
    }
}

fn render_blend(blend: &BlendOutcome, prefs: &Preferences) {
    let solution = &blend.solution;
    let status = match solution.status {
        BlendStatus::Unique => "unique",
        BlendStatus::Multiple => "multiple solutions",
    };
    println!(
        "Blend viscosity: {} mm²/s ({status})",
        format_with(solution.viscosity, 3, prefs)
    );
    let width = blend.names.iter().map(|s| s.len()).max().unwrap_or(0);
    for (i, (name, fraction)) in blend.names.iter().zip(&solution.fractions).enumerate() {
        let range = match solution.range_for(i) {
            Some(r) => format!(
                "possible {} % to {} %",
                format_with(r.min, 1, prefs),
                format_with(r.max, 1, prefs)
            ),
            None => "fixed".to_string(),
        };
        println!(
            "  {name:<width$}  {:>8} %   {range}",
            format_with(*fraction, 2, prefs)
        );
    }
    if solution.diagnostics.enumeration_capped() {
        println!(
            "  note: {} component pairs were not enumerated",
            solution.diagnostics.skipped_pairs
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_split_on_colon() {
        let parts = parse_parts("parts", &["100:60".to_string(), "10,5:40".to_string()]).unwrap();
        assert_eq!(parts[1].viscosity.value(), Some(10.5));
        assert_eq!(parts[1].percent.value(), Some(40.0));
        assert!(parse_parts("parts", &["100".to_string()]).is_err());
    }

    #[test]
    fn flags_override_document_preferences() {
        let cli = Cli::parse_from(["vb-cli", "--decimals", "4", "--comma", "vi", "46", "6,8"]);
        let prefs = preferences(&cli, Preferences::default());
        assert_eq!(prefs.decimals, 4);
        assert_eq!(prefs.decimal_separator, DecimalSeparator::Comma);

        let cli = Cli::parse_from(["vb-cli", "--lang", "fr", "solve", "blend.yaml"]);
        let prefs = preferences(&cli, Preferences::default().with_decimals(3));
        assert_eq!(prefs.language, Language::Fr);
        assert_eq!(prefs.decimals, 3);
        assert_eq!(prefs.decimal_separator, DecimalSeparator::Comma);
    }
}

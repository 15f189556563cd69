#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use duty_roster::{
    config::{export_config_json, load_config_from_file, RosterConfig},
    encode::{encode_solutions, mark_holidays},
    io,
    scheduler::{detect_violations, enumerate, SolutionSet},
    DEFAULT_SPACING,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération de tableaux de garde mensuels
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Écrire une configuration de départ (répartition égale)
    Init {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// liste "nom1,nom2,..."
        #[arg(long)]
        facilities: String,
        #[arg(long, default_value = "roster-config.json")]
        out: String,
    },

    /// Énumérer des rosters valides
    Generate {
        /// Configuration JSON
        #[arg(long, conflicts_with = "facilities_csv")]
        config: Option<String>,
        /// CSV `name,required[,excluded]` (avec --year/--month)
        #[arg(long, requires_all = ["year", "month"])]
        facilities_csv: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        max_patterns: Option<usize>,
        #[arg(long)]
        time_budget_secs: Option<u64>,
        /// Répertoire de sortie (un CSV par motif + manifest.json)
        #[arg(long)]
        out_dir: Option<String>,
        /// Répertoire recevant `<bundle>.zip` (un CSV par motif)
        #[arg(long)]
        out_zip: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Vérifier un roster CSV contre une configuration
    Check {
        #[arg(long)]
        config: String,
        #[arg(long)]
        roster: String,
        /// Export CSV des violations (optionnel)
        #[arg(long)]
        report: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Init {
            year,
            month,
            facilities,
            out,
        } => {
            let names: Vec<&str> = facilities
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            let config = RosterConfig::even_split(year, month, &names)?;
            export_config_json(&out, &config)?;
            println!("Config written to {out} ({} facilities)", config.facilities.len());
            0
        }
        Commands::Generate {
            config,
            facilities_csv,
            year,
            month,
            max_patterns,
            time_budget_secs,
            out_dir,
            out_zip,
            out_json,
        } => {
            let mut config = match (config, facilities_csv, year, month) {
                (Some(path), _, _, _) => load_config_from_file(path)?,
                (None, Some(csv), Some(year), Some(month)) => RosterConfig {
                    year,
                    month,
                    facilities: io::import_facilities_csv(csv)?,
                    max_patterns: 10,
                    time_budget_secs: 20,
                    spacing: DEFAULT_SPACING,
                    holidays: Default::default(),
                },
                _ => bail!("either --config or --facilities-csv with --year/--month is required"),
            };
            if let Some(n) = max_patterns {
                config.max_patterns = n;
            }
            if let Some(secs) = time_budget_secs {
                config.time_budget_secs = secs;
            }

            let model = config.build_model()?;
            let set = enumerate(&model, &config.search_options())?;
            let mut bundle = encode_solutions(&model, &set);
            mark_holidays(&mut bundle, &config.holidays);

            if let Some(dir) = out_dir {
                let paths = io::export_bundle_dir(&dir, &bundle)?;
                println!("{} file(s) written under {dir}", paths.len());
            }
            if let Some(dir) = out_zip {
                let path = io::export_bundle_zip(&dir, &bundle)?;
                println!("Archive written to {}", path.display());
            }
            if let Some(path) = out_json {
                io::export_bundle_json(path, &bundle)?;
            }

            // impression compacte
            if let Some(first) = bundle.rosters.first() {
                let labels: Vec<String> = first.entries.iter().map(|e| e.display_label()).collect();
                println!("dates | {}", labels.join(","));
            }
            for roster in &bundle.rosters {
                let line: Vec<&str> = roster.entries.iter().map(|e| e.facility.as_str()).collect();
                println!("{} | {}", roster.name, line.join(","));
            }

            generate_exit_code(&set)
        }
        Commands::Check {
            config,
            roster,
            report,
        } => {
            let config = load_config_from_file(config)?;
            let model = config.build_model()?;
            let assignment = io::import_roster_csv(roster, &model)?;
            let violations = detect_violations(&model, &assignment);
            if violations.is_empty() {
                println!("OK: no violations");
                0
            } else {
                eprintln!("Found {} violation(s)", violations.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["kind", "facility", "date", "other_date"])?;
                    for v in &violations {
                        let facility = v
                            .facility
                            .and_then(|f| model.facility_name(f))
                            .unwrap_or("");
                        let date = v
                            .day
                            .and_then(|d| model.date_of(d))
                            .map(|d| d.to_string())
                            .unwrap_or_default();
                        let other = v
                            .other_day
                            .and_then(|d| model.date_of(d))
                            .map(|d| d.to_string())
                            .unwrap_or_default();
                        w.write_record([v.kind.as_str(), facility, date.as_str(), other.as_str()])?;
                    }
                    w.flush()?;
                }
                2
            }
        }
    };

    std::process::exit(code);
}

/// 0 = recherche terminée avec résultats, 2 = résultat possiblement incomplet,
/// 3 = aucun roster n'existe.
fn generate_exit_code(set: &SolutionSet) -> i32 {
    let reason = set.termination.as_str();
    if set.is_infeasible() {
        eprintln!("No feasible roster found ({reason})");
        3
    } else if set.is_empty() {
        eprintln!("No roster found before the search stopped ({reason})");
        2
    } else if set.is_possibly_incomplete() {
        eprintln!("{} roster(s) found before the search stopped ({reason})", set.len());
        2
    } else {
        println!("{} roster(s) found ({reason})", set.len());
        0
    }
}

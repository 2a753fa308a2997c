use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use launch_parsers::advice::{self, Benchmarks};
use launch_parsers::export::{self, ReaderOptions};
use launch_parsers::library::{PipelineConfig, ShotLibrary};
use launch_parsers::normalize::NormalizeConfig;
use launch_parsers::stats::OutlierConfig;
use launch_parsers::xlsx;
use launch_parsers::{canonical_club, sort_shots, ClubStats, Metric};

#[derive(Parser)]
#[command(name = "launch-parsers")]
#[command(about = "Read launch monitor CSV exports and summarize shots by club", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand
#[derive(Args, Debug)]
struct PipelineArgs {
    /// Launch monitor CSV exports
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Field delimiter (`,` `;` `|` or `tab`)
    #[arg(long, env = "LAUNCH_DELIMITER", default_value = ",")]
    delimiter: String,

    /// Files have no units line under the header
    #[arg(long)]
    no_units_row: bool,

    /// Reject shots carrying less than this many yards
    #[arg(long, env = "LAUNCH_MIN_CARRY", default_value_t = 5.0)]
    min_carry: f64,

    /// Reject shots with a ball speed below this (mph)
    #[arg(long, env = "LAUNCH_MIN_BALL_SPEED", default_value_t = 10.0)]
    min_ball_speed: f64,

    /// Fraction of shortest carries trimmed per club
    #[arg(long, env = "LAUNCH_LOW_TRIM", default_value_t = 0.10)]
    low_trim: f64,

    /// Fraction of longest carries trimmed per club
    #[arg(long, env = "LAUNCH_HIGH_TRIM", default_value_t = 0.10)]
    high_trim: f64,

    /// IQR fence multiplier
    #[arg(long, env = "LAUNCH_IQR_MULTIPLIER", default_value_t = 1.5)]
    iqr_multiplier: f64,

    /// Only use the sessions from these input files (1-based position)
    #[arg(long, value_delimiter = ',')]
    session: Vec<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-club averages and carry ranges
    Summary {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// List every accepted shot
    Shots {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Sort by a metric (e.g. carry, spin_rate, "Launch Dir")
        #[arg(long)]
        sort: Option<Metric>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },

    /// Low, average and high of every metric for one club
    Drilldown {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Club to inspect (e.g. "7 Iron" or 7I)
        #[arg(long)]
        club: String,
    },

    /// List sessions, newest first
    Sessions {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Coaching notes for the bag or a single club
    Advice {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Only report on this club (e.g. "7 Iron" or 7I)
        #[arg(long)]
        club: Option<String>,

        /// CSV of benchmarks (club,carry,ball_speed,spin,smash,apex,land_area)
        #[arg(long)]
        benchmarks: Option<PathBuf>,
    },

    /// Write club statistics to xlsx, or the shot log to csv
    Export {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Output file (.xlsx or .csv)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Count accepted and rejected rows per file
    Validate {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { pipeline } => summary(&pipeline)?,
        Commands::Shots { pipeline, sort, desc } => shots(&pipeline, sort, desc)?,
        Commands::Drilldown { pipeline, club } => drilldown(&pipeline, &club)?,
        Commands::Sessions { pipeline } => sessions(&pipeline)?,
        Commands::Advice { pipeline, club, benchmarks } => {
            advise(&pipeline, club.as_deref(), benchmarks.as_deref())?;
        }
        Commands::Export { pipeline, output } => export_file(&pipeline, &output)?,
        Commands::Validate { pipeline } => validate(&pipeline)?,
    }

    Ok(())
}

impl PipelineArgs {
    fn config(&self) -> Result<PipelineConfig> {
        let delimiter = ReaderOptions::parse_delimiter(&self.delimiter)
            .context("Invalid --delimiter")?;

        Ok(PipelineConfig {
            reader: ReaderOptions {
                delimiter,
                units_row: !self.no_units_row,
            },
            normalize: NormalizeConfig {
                min_carry: self.min_carry,
                min_ball_speed: self.min_ball_speed,
            },
            outliers: OutlierConfig {
                low_trim: self.low_trim,
                high_trim: self.high_trim,
                iqr_multiplier: self.iqr_multiplier,
                ..Default::default()
            },
        })
    }

    fn read_files(&self) -> Result<Vec<String>> {
        self.files
            .iter()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))
            })
            .collect()
    }
}

/// Ingest every file, report failures, and apply the `--session` selection
fn load(args: &PipelineArgs) -> Result<ShotLibrary> {
    let mut library = ShotLibrary::new(args.config()?);
    let texts = args.read_files()?;

    let mut session_ids: Vec<Option<String>> = Vec::with_capacity(texts.len());
    for (path, result) in args.files.iter().zip(library.ingest_many(&texts)) {
        match result {
            Ok(report) => {
                println!(
                    "{}: {} shots ({} rejected)",
                    path.display(),
                    report.shots,
                    report.rejected()
                );
                session_ids.push(Some(report.session_id));
            }
            Err(e) => {
                log::warn!("{}: {}", path.display(), e);
                println!("{}: skipped ({})", path.display(), e);
                session_ids.push(None);
            }
        }
    }

    if library.shots().is_empty() {
        anyhow::bail!("No valid shots in any input file");
    }

    if !args.session.is_empty() {
        library.toggle_all();
        for &position in &args.session {
            let id = position
                .checked_sub(1)
                .and_then(|i| session_ids.get(i))
                .and_then(|id| id.as_deref())
                .with_context(|| format!("No accepted session at position {}", position))?;
            if !library.is_selected(id) {
                library.toggle_session(id);
            }
        }
    }

    Ok(library)
}

fn summary(args: &PipelineArgs) -> Result<()> {
    let library = load(args)?;
    let stats = library.club_stats();

    println!();
    println!(
        "{:<8} {:>9} {:>7} {:>7} {:>7} {:>6} {:>8} {:>15}",
        "Club", "Shots", "Carry", "Total", "Ball", "Spin", "Offline", "Carry Range"
    );
    for club in &stats {
        let range = format!(
            "{:.0}-{:.0}",
            club.lows.carry_distance, club.highs.carry_distance
        );
        println!(
            "{:<8} {:>9} {:>7} {:>7} {:>7} {:>6} {:>8} {:>15}",
            club.club,
            format!("{}/{}", club.count, club.raw_count()),
            Metric::CarryDistance.format_value(club.averages.carry_distance),
            Metric::TotalDistance.format_value(club.averages.total_distance),
            Metric::BallSpeed.format_value(club.averages.ball_speed),
            Metric::SpinRate.format_value(club.averages.spin_rate),
            Metric::Offline.format_value(club.averages.offline),
            range
        );
    }

    Ok(())
}

fn shots(args: &PipelineArgs, sort: Option<Metric>, descending: bool) -> Result<()> {
    let library = load(args)?;
    let mut shots = library.active_shots();
    if let Some(metric) = sort {
        sort_shots(&mut shots, metric, descending);
    }

    println!();
    println!(
        "{:<26} {:<8} {:>7} {:>7} {:>7} {:>6} {:>6} {:>8}",
        "Timestamp", "Club", "Carry", "Total", "Ball", "Back", "Side", "Offline"
    );
    for shot in &shots {
        println!(
            "{:<26} {:<8} {:>7} {:>7} {:>7} {:>6} {:>6} {:>8}",
            shot.timestamp,
            shot.club,
            Metric::CarryDistance.format_value(shot.carry_distance),
            Metric::TotalDistance.format_value(shot.total_distance),
            Metric::BallSpeed.format_value(shot.ball_speed),
            Metric::BackSpin.format_value(shot.back_spin),
            Metric::SideSpin.format_value(shot.side_spin),
            Metric::Offline.format_value(shot.offline),
        );
    }

    Ok(())
}

/// Stats for one club, by any accepted spelling of its name
fn find_club<'a>(stats: &'a [ClubStats], name: &str) -> Result<&'a ClubStats> {
    let code = canonical_club(name).with_context(|| format!("Invalid club: {:?}", name))?;
    stats
        .iter()
        .find(|s| s.club == code)
        .with_context(|| format!("No shots recorded with {}", code))
}

fn drilldown(args: &PipelineArgs, club: &str) -> Result<()> {
    let library = load(args)?;
    let stats = library.club_stats();
    let club_stats = find_club(&stats, club)?;

    println!();
    println!(
        "{} ({} of {} shots after filtering)",
        club_stats.club,
        club_stats.count,
        club_stats.raw_count()
    );
    println!(
        "{:<16} {:>9} {:>9} {:>9}  {}",
        "Metric", "Low", "Average", "High", "Unit"
    );
    for range in club_stats.ranges() {
        let metric = range.metric;
        println!(
            "{:<16} {:>9} {:>9} {:>9}  {}",
            metric.label(),
            metric.format_value(range.low),
            metric.format_value(range.average),
            metric.format_value(range.high),
            metric.unit()
        );
    }

    Ok(())
}

fn sessions(args: &PipelineArgs) -> Result<()> {
    let library = load(args)?;

    println!();
    for session in library.sessions() {
        let marker = if library.is_selected(&session.id) { '*' } else { ' ' };
        println!(
            "{} {:<32} {:<26} {:>4} shots, avg carry {:.1}",
            marker, session.id, session.date, session.shot_count, session.avg_carry
        );
    }

    Ok(())
}

fn advise(args: &PipelineArgs, club: Option<&str>, benchmarks: Option<&Path>) -> Result<()> {
    let library = load(args)?;
    let stats = library.club_stats();

    let benchmarks = match benchmarks {
        Some(path) => Benchmarks::from_csv_path(path)
            .with_context(|| format!("Failed to load benchmarks from {}", path.display()))?,
        None => Benchmarks::pga_tour(),
    };

    println!();
    match club {
        Some(name) => {
            let club_stats = find_club(&stats, name)?;
            println!("{}", advice::analyze_club(club_stats, &benchmarks));
        }
        None => {
            println!("{}", advice::analyze_session(&stats));
            for club_stats in &stats {
                println!("== {} ==", club_stats.club);
                println!("{}", advice::analyze_club(club_stats, &benchmarks));
            }
        }
    }

    Ok(())
}

fn export_file(args: &PipelineArgs, output: &Path) -> Result<()> {
    let library = load(args)?;
    let shots = library.active_shots();

    let output_ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match output_ext.as_str() {
        "xlsx" => {
            println!("Writing Excel file: {}", output.display());
            let stats = library.club_stats();
            xlsx::write_club_stats_to_xlsx(&stats, &shots, output)
                .context("Failed to write Excel file")?;
        }
        "csv" => {
            println!("Writing CSV file: {}", output.display());
            export::write_shots_csv_file(&shots, output).context("Failed to write CSV file")?;
        }
        _ => {
            anyhow::bail!("Unsupported output format: {}", output_ext);
        }
    }

    println!("Done!");
    Ok(())
}

fn validate(args: &PipelineArgs) -> Result<()> {
    let config = args.config()?;
    let texts = args.read_files()?;
    let mut library = ShotLibrary::new(config);

    let mut failures = 0;
    for (path, text) in args.files.iter().zip(&texts) {
        match library.ingest(text) {
            Ok(report) => {
                println!(
                    "{}: OK, {} rows, {} accepted, {} rejected",
                    path.display(),
                    report.rows,
                    report.shots,
                    report.rejected()
                );
            }
            Err(e) => {
                failures += 1;
                println!("{}: FAILED, {}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed validation", failures, args.files.len());
    }
    Ok(())
}

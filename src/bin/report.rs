use chrono::NaiveDate;
use clap::Parser;
use colored::Colorize;
use eco_dashboard::analytics::goal_progress::GoalStatus;
use eco_dashboard::analytics::ranking::RankingWeights;
use eco_dashboard::analytics::reporting::{DateRange, SchoolReport};
use eco_dashboard::dashboard_service::DashboardService;
use eco_dashboard::database_factory::{DatabaseConfig, DatabaseFactory};
use eco_dashboard::entries::ConsumptionType;
use eco_dashboard::error::{DashboardError, DashboardResult};
use eco_dashboard::export::{ChartOptions, render_monthly_recycling, report_to_csv, report_to_pdf};
use eco_dashboard::format::{format_amount, format_change, format_cost, format_kg};
use eco_dashboard::local_store::MemoryStore;
use eco_dashboard::materials::material_label;
use eco_dashboard::month::Month;
use log::warn;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Prints or exports one school's sustainability report
#[derive(Parser, Debug)]
#[command(name = "report")]
#[command(about = "Summarize and export a school's recycling and consumption data")]
struct ReportArgs {
    /// Path to the SQLite database file
    database: PathBuf,

    #[arg(long, help = "School id to report on")]
    school: i64,

    #[arg(long, value_name = "YYYY-MM", help = "First month included")]
    from: Option<String>,

    #[arg(long, value_name = "YYYY-MM", help = "Last month included")]
    to: Option<String>,

    #[arg(long, value_name = "PATH", help = "Write the report as CSV")]
    csv: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Write the report as PDF")]
    pdf: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Write the monthly recycling chart as PNG")]
    chart: Option<PathBuf>,

    #[arg(long, help = "Disable colored output")]
    no_color: bool,

    #[arg(long, help = "Also print the ranking of all schools")]
    ranking: bool,

    #[arg(long, default_value_t = 0.5, help = "Ranking weight of recycled kg")]
    recycled_weight: f64,

    #[arg(long, default_value_t = 10.0, help = "Ranking weight of CO2 kg")]
    co2_weight: f64,

    #[arg(long, value_name = "DATE", help = "Override current date (YYYY-MM-DD format)")]
    override_date: Option<String>,
}

fn parse_month(text: &Option<String>) -> DashboardResult<Option<Month>> {
    text.as_deref().map(|t| t.parse::<Month>()).transpose()
}

fn rule() -> String {
    "-".repeat(60)
}

fn status_text(status: GoalStatus) -> String {
    match status {
        GoalStatus::OnTrack => status.label().green().bold().to_string(),
        GoalStatus::Improving => status.label().yellow().to_string(),
        GoalStatus::NeedsImprovement => status.label().red().to_string(),
    }
}

fn print_report(report: &SchoolReport) {
    let title = format!("Sustainability Report: {}", report.school.name);
    println!("{}", title.bold());
    println!("{}", "=".repeat(title.chars().count()));
    println!("Period: {}", report.range.describe());
    println!("Generated: {}", report.generated_on);
    println!();

    println!("{}", "Recycling".bold());
    println!("{}", rule());
    println!(
        "  Total recycled: {} ({} entries)",
        format_kg(report.recycling.total_kg),
        report.recycling.entry_count
    );
    println!("  CO2 avoided:    {}", format_kg(report.recycling.total_co2_kg));
    if !report.materials.is_empty() {
        println!();
        println!(
            "  {:<14} {:>12} {:>12} {:>8}",
            "Material", "Quantity", "CO2 saved", "Share"
        );
        for material in &report.materials {
            println!(
                "  {:<14} {:>12} {:>12} {:>7.1}%",
                material_label(&material.material),
                format_kg(material.kg),
                format_kg(material.co2_kg),
                material.share_percent
            );
        }
    }
    println!();

    println!("{}", "Consumption".bold());
    println!("{}", rule());
    for kind in ConsumptionType::ALL {
        let summary = report.consumption(kind);
        if summary.months == 0 {
            println!("  {}: no readings", kind.label());
            continue;
        }
        println!(
            "  {}: {} over {} month(s), {}, avg {}/month, last change {}",
            kind.label(),
            format_amount(summary.total_consumption, kind.unit()),
            summary.months,
            format_cost(summary.total_cost),
            format_amount(summary.average_monthly, kind.unit()),
            format_change(summary.latest_change_percent)
        );
    }
    println!();

    println!("{}", "Goals".bold());
    println!("{}", rule());
    if report.goals.is_empty() {
        println!("  No goals set");
    }
    for goal in &report.goals {
        let kind = goal.consumption_type;
        match report.progress_for(kind) {
            Some(progress) => println!(
                "  {}: goal {:.0}%, reduced {:.1}% ({} -> {}) {}",
                kind.label(),
                goal.reduction_percentage,
                progress.reduction_percent,
                progress.previous_month,
                progress.latest_month,
                status_text(progress.status)
            ),
            None => println!(
                "  {}: goal {:.0}%, not enough readings",
                kind.label(),
                goal.reduction_percentage
            ),
        }
    }
}

fn run(args: &ReportArgs) -> DashboardResult<()> {
    if !args.database.exists() {
        return Err(DashboardError::NotFound(format!(
            "Database file {}",
            args.database.display()
        )));
    }

    let mut builder = DatabaseConfig::builder().path(args.database.to_string_lossy());
    if let Some(date) = &args.override_date {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            DashboardError::Validation(format!(
                "Invalid date format for --override-date: '{}'. Expected YYYY-MM-DD",
                date
            ))
        })?;
        builder = builder.date(date);
    }
    let db = DatabaseFactory::create(builder.build())?;
    let service = DashboardService::new(Arc::new(db), Arc::new(MemoryStore::new()));

    let range = DateRange::new(parse_month(&args.from)?, parse_month(&args.to)?)?;
    let report = service.report(args.school, range)?;

    let chart = if (args.chart.is_some() || args.pdf.is_some())
        && !report.monthly_recycling.is_empty()
    {
        Some(render_monthly_recycling(
            &report.monthly_recycling,
            &ChartOptions::default(),
        ))
    } else {
        None
    };

    let mut exported = false;
    if let Some(path) = &args.csv {
        fs::write(path, report_to_csv(&report)?)?;
        println!("Wrote CSV to {}", path.display());
        exported = true;
    }
    if let Some(path) = &args.pdf {
        // A chart that fails to draw is left out of the PDF
        let pdf_chart = match &chart {
            Some(Ok(chart)) => Some(chart),
            Some(Err(e)) => {
                warn!("Exporting PDF without chart: {}", e);
                None
            }
            None => None,
        };
        fs::write(path, report_to_pdf(&report, pdf_chart)?)?;
        println!("Wrote PDF to {}", path.display());
        exported = true;
    }
    if let Some(path) = &args.chart {
        match chart {
            Some(chart) => {
                chart?.save_png(path)?;
                println!("Wrote chart to {}", path.display());
            }
            None => eprintln!("No recycling entries in range, chart skipped"),
        }
        exported = true;
    }

    if !exported {
        print_report(&report);
    }

    if args.ranking {
        let weights = RankingWeights {
            recycled_weight: args.recycled_weight,
            co2_weight: args.co2_weight,
        };
        let ranking = service.ranking(&weights, range)?;
        println!();
        println!("{}", "Ranking".bold());
        println!("{}", rule());
        for entry in ranking {
            println!(
                "  {:>2}. {:<24} {:>12} {:>12} score {:.1}",
                entry.rank,
                entry.school_name,
                format_kg(entry.recycled_kg),
                format_kg(entry.co2_kg),
                entry.score
            );
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let args = ReportArgs::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

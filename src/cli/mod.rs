//! Maintenance CLI over the locally stored book.
//!
//! The mobile app is the primary interface; this binary exists for
//! inspection, CSV export, and the destructive round-close action (which
//! prompts for confirmation before touching anything).

use std::fs::File;

use chrono::{Datelike, Utc};
use colored::Colorize;
use dialoguer::Confirm;

use crate::calendar::thai_display_date;
use crate::config::ConfigManager;
use crate::core::services::{ForecastService, QuotaService, RecordService, SummaryService};
use crate::domain::{QuotaSettings, RecordBook};
use crate::errors::CliError;
use crate::export;
use crate::forecast::MultiplierPolicy;
use crate::storage::{JsonStorage, StorageBackend};
use crate::utils::build_info;

pub fn run_cli() -> Result<(), CliError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("status");

    let storage = JsonStorage::new_default()?;
    let book = storage.load_book()?;
    let quota = storage.load_quota()?;

    match command {
        "status" => show_status(&book, &quota),
        "history" => show_history(&quota),
        "forecast" => show_forecast(&book, args.contains(&"--lucky".to_string())),
        "export" => export_csv(&book, args.get(1).map(String::as_str)),
        "next-round" => {
            start_next_round(&storage, &book, &quota, parse_target(args.get(1))?, confirmed(&args))
        }
        "set-target" => set_target(&storage, &quota, parse_target(args.get(1))?),
        "version" => {
            show_version();
            Ok(())
        }
        "help" | "--help" => {
            print_help();
            Ok(())
        }
        other => Err(CliError::Input(format!("unknown command `{other}`"))),
    }
}

fn confirmed(args: &[String]) -> bool {
    args.iter().any(|arg| arg == "--yes")
}

fn parse_target(raw: Option<&String>) -> Result<f64, CliError> {
    let raw = raw.ok_or_else(|| CliError::Input("missing target tonnage".into()))?;
    raw.parse()
        .map_err(|_| CliError::Input(format!("`{raw}` is not a tonnage")))
}

fn show_status(book: &RecordBook, quota: &QuotaSettings) -> Result<(), CliError> {
    let progress = QuotaService::round_progress(&book.records, quota);
    let today_label = thai_display_date(Utc::now().date_naive());
    let trips_today = SummaryService::trips_on(&book.records, &today_label);

    println!(
        "{} {}",
        "Round".bold(),
        quota.current_round().to_string().bold()
    );
    println!(
        "  target    {:.0} t\n  achieved  {:.2} t ({:.1}%)\n  remaining {:.2} t",
        quota.target_tons, progress.achieved_tons, progress.percentage, progress.remaining_tons
    );
    if progress.achieved {
        println!("  {}", "goal reached, start the next round".green().bold());
    }
    println!(
        "  lifetime  {:.2} t over {} records, {} trips today",
        SummaryService::lifetime_weight_tons(&book.records),
        book.record_count(),
        trips_today
    );
    Ok(())
}

fn show_history(quota: &QuotaSettings) -> Result<(), CliError> {
    if quota.history.is_empty() {
        println!("no completed rounds yet");
        return Ok(());
    }
    for entry in &quota.history {
        println!(
            "round {:>2}  {:.2}/{:.0} t  closed {}",
            entry.round, entry.achieved_tons, entry.target_tons, entry.completed_date
        );
    }
    Ok(())
}

fn show_forecast(book: &RecordBook, lucky: bool) -> Result<(), CliError> {
    let config = ConfigManager::new()?.load()?;
    let today = Utc::now().date_naive();
    let end_date = config.season_end(today.year());
    let outlook = if lucky {
        ForecastService::project_with_lucky_days(
            &book.records,
            today,
            end_date,
            None,
            MultiplierPolicy::default(),
        )
    } else {
        ForecastService::project(&book.records, today, end_date)
    };
    let outlook = match outlook {
        Some(outlook) => outlook,
        None => {
            println!("no records yet, nothing to forecast");
            return Ok(());
        }
    };
    println!(
        "{} (until {})",
        "Season forecast".bold(),
        thai_display_date(end_date)
    );
    println!(
        "  working days {}  holidays {}",
        outlook.outcome.working_days, outlook.outcome.holiday_count
    );
    println!(
        "  rate {:.2} t/day at {:.0} baht/t average",
        outlook.stats.avg_weight_per_day, outlook.stats.avg_price_per_ton
    );
    println!(
        "  projected +{:.1} t / +{:.0} baht",
        outlook.outcome.projected_extra_weight, outlook.outcome.projected_extra_income
    );
    let season_total = format!(
        "{:.1} t / {:.0} baht",
        outlook.outcome.final_weight, outlook.outcome.final_income
    );
    println!("  season total {}", season_total.green());
    Ok(())
}

fn export_csv(book: &RecordBook, path: Option<&str>) -> Result<(), CliError> {
    if book.records.is_empty() {
        return Err(CliError::Command("no records to export".into()));
    }
    let records: Vec<_> = RecordService::list_chronological(book)
        .into_iter()
        .cloned()
        .collect();
    let file_name = export::export_file_name(Utc::now().date_naive());
    let path = path.unwrap_or(&file_name);
    let file = File::create(path).map_err(crate::errors::CoreError::from)?;
    export::write_csv(&records, file).map_err(CliError::Core)?;
    println!("exported {} records to {}", records.len(), path.bold());
    Ok(())
}

fn start_next_round(
    storage: &JsonStorage,
    book: &RecordBook,
    quota: &QuotaSettings,
    new_target: f64,
    assume_yes: bool,
) -> Result<(), CliError> {
    let progress = QuotaService::round_progress(&book.records, quota);
    if !progress.achieved {
        return Err(CliError::Command(format!(
            "round {} is at {:.1}%, close it only once the target is met",
            quota.current_round(),
            progress.percentage
        )));
    }
    // Closing a round is irreversible; make the user say so.
    let proceed = assume_yes
        || Confirm::new()
            .with_prompt(format!(
                "Close round {} at {:.2} t and start a {:.0} t round?",
                quota.current_round(),
                progress.achieved_tons,
                new_target
            ))
            .default(false)
            .interact()
            .map_err(|err| CliError::Command(err.to_string()))?;
    if !proceed {
        println!("kept the current round");
        return Ok(());
    }
    let next = QuotaService::start_next_round(quota, &book.records, new_target, Utc::now())
        .map_err(|err| CliError::Command(err.to_string()))?;
    storage.save_quota(&next)?;
    println!(
        "{} round {} open at {:.0} t",
        "started".green().bold(),
        next.current_round(),
        next.target_tons
    );
    Ok(())
}

fn set_target(
    storage: &JsonStorage,
    quota: &QuotaSettings,
    new_target: f64,
) -> Result<(), CliError> {
    let updated = QuotaService::update_target(quota, new_target)
        .map_err(|err| CliError::Command(err.to_string()))?;
    storage.save_quota(&updated)?;
    println!("target set to {:.0} t", updated.target_tons);
    Ok(())
}

fn show_version() {
    let meta = build_info::current();
    println!(
        "cane_core {} ({} {}, {}, {})",
        meta.version, meta.git_hash, meta.git_status, meta.profile, meta.target
    );
}

fn print_help() {
    println!(
        "cane_core_cli <command>\n\n\
         commands:\n\
         \u{20}\u{20}status              active round progress and lifetime totals\n\
         \u{20}\u{20}history             completed rounds, newest first\n\
         \u{20}\u{20}forecast [--lucky]  season projection (optionally lucky-day shaped)\n\
         \u{20}\u{20}export [path]       write the CSV export\n\
         \u{20}\u{20}next-round <tons>   close the achieved round and open the next (asks first)\n\
         \u{20}\u{20}set-target <tons>   adjust the active round's target\n\
         \u{20}\u{20}version             build metadata"
    );
}

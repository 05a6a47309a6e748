mod common;

use chrono::NaiveDate;

use cane_core::core::services::ForecastService;
use cane_core::forecast::MultiplierPolicy;
use cane_core::pricing;

use common::{priced_record, record};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn moisture_twenty_two_prices_a_twenty_ton_load_at_17540() {
    let record = priced_record("15/2/2568", 20_000.0, 22.0, 1);
    assert_eq!(record.cane_price, Some(877.0));
    assert_eq!(record.total_value, Some(17_540.0));
    assert_eq!(pricing::price_for_moisture(22.0), 877.0);
}

#[test]
fn songkran_week_contributes_nothing() {
    // 13–16 April are all holidays; a window covering only them projects zero.
    let records = vec![priced_record("1/4/2568", 30_000.0, 25.0, 1)];
    let outlook = ForecastService::project(&records, date(2025, 4, 12), date(2025, 4, 16))
        .expect("outlook");
    assert_eq!(outlook.outcome.working_days, 0);
    assert_eq!(outlook.outcome.holiday_count, 4);
    assert_eq!(outlook.outcome.projected_extra_weight, 0.0);
    assert_eq!(outlook.outcome.final_weight, outlook.stats.total_weight_tons);
    assert_eq!(outlook.outcome.final_income, outlook.stats.total_income);
}

#[test]
fn projection_extends_history_at_the_average_rate() {
    // Two worked days, 15 t each: 15 t/day average.
    let records = vec![
        record("1/3/2568", 15_000.0, 1),
        record("2/3/2568", 15_000.0, 2),
    ];
    let outlook = ForecastService::project(&records, date(2025, 3, 2), date(2025, 3, 7))
        .expect("outlook");
    assert_eq!(outlook.stats.avg_weight_per_day, 15.0);
    assert_eq!(outlook.outcome.working_days, 5);
    assert_eq!(outlook.outcome.projected_extra_weight, 75.0);
    assert_eq!(outlook.outcome.final_weight, 105.0);
    // No priced records: income projects at the 900 default.
    assert_eq!(outlook.outcome.projected_extra_income, 75.0 * 900.0);
}

#[test]
fn forecasts_are_reproducible() {
    let records = vec![
        priced_record("1/3/2568", 18_000.0, 24.0, 1),
        record("3/3/2568", 12_000.0, 2),
    ];
    let run = || {
        ForecastService::project_with_lucky_days(
            &records,
            date(2025, 3, 5),
            date(2025, 4, 30),
            Some(12.0),
            MultiplierPolicy::default(),
        )
        .expect("outlook")
    };
    assert_eq!(run(), run());
}

#[test]
fn lucky_calendar_boosts_good_days_and_damps_bad_ones() {
    let records = vec![record("1/3/2568", 10_000.0, 1)];
    // 26/3 is a bad day, 27/3 a good one; neither is a holiday.
    let outlook = ForecastService::project_with_lucky_days(
        &records,
        date(2025, 3, 25),
        date(2025, 3, 27),
        Some(10.0),
        MultiplierPolicy::default(),
    )
    .expect("outlook");
    assert_eq!(outlook.outcome.working_days, 2);
    assert!((outlook.outcome.projected_extra_weight - (5.0 + 12.0)).abs() < 1e-9);
}

#[test]
fn trend_chart_connects_history_to_the_projection() {
    let records = vec![
        record("1/3/2568", 10_000.0, 1),
        record("2/3/2568", 12_000.0, 2),
    ];
    let series = ForecastService::trend_series(&records, date(2025, 3, 10), date(2025, 4, 30));
    let history: Vec<_> = series.iter().filter(|p| p.actual.is_some()).collect();
    let forecast: Vec<_> = series.iter().filter(|p| p.actual.is_none()).collect();
    assert_eq!(history.len(), 2);
    assert!(!forecast.is_empty());
    // Projected values never dip below the accumulated history.
    let history_total = history.last().unwrap().projected;
    assert!(forecast.iter().all(|p| p.projected >= history_total));
}

//! Monthly and weekly RAF buckets

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use raftrack_core::{columns, MonthlyRaf, RafCalendar, RafMonth, RafWeek, RafYear, Table};
use tracing::debug;

#[derive(Default)]
struct WeekAcc {
    first_day: u32,
    last_day: u32,
    total: f64,
}

#[derive(Default)]
struct MonthAcc {
    total: f64,
    weeks: BTreeMap<u32, WeekAcc>,
}

/// Year → month → ISO-week breakdown of the "RAF" column by "Date de MEP".
///
/// Rows with an unparseable date or a blank RAF are ignored. Months and
/// weeks whose RAF sums to exactly zero are left out; negative sums stay.
pub fn raf_calendar(deployments: &Table) -> RafCalendar {
    let mut buckets: BTreeMap<(i32, u32), MonthAcc> = BTreeMap::new();
    let mut skipped = 0usize;

    for row in 0..deployments.len() {
        let (Some(date), Some(raf)) = (
            deployments.get(row, columns::DATE_MEP).as_date(),
            deployments.get(row, columns::RAF).as_f64(),
        ) else {
            skipped += 1;
            continue;
        };
        add(&mut buckets, date, raf);
    }
    debug!(skipped, months = buckets.len(), "RAF rows bucketed");

    let mut years: Vec<RafYear> = Vec::new();
    for ((year, month), acc) in buckets {
        if acc.total == 0.0 {
            continue;
        }

        let mut weeks: Vec<RafWeek> = acc
            .weeks
            .into_iter()
            .filter(|(_, w)| w.total != 0.0)
            .map(|(iso_week, w)| RafWeek {
                iso_week,
                first_day: w.first_day,
                last_day: w.last_day,
                total: w.total,
            })
            .collect();
        weeks.sort_by_key(|w| w.first_day);

        let month = RafMonth {
            month,
            total: acc.total,
            weeks,
        };
        match years.last_mut() {
            Some(last) if last.year == year => last.months.push(month),
            _ => years.push(RafYear {
                year,
                months: vec![month],
            }),
        }
    }

    RafCalendar { years }
}

fn add(buckets: &mut BTreeMap<(i32, u32), MonthAcc>, date: NaiveDate, raf: f64) {
    let month = buckets.entry((date.year(), date.month())).or_default();
    month.total += raf;

    let day = date.day();
    let week = month
        .weeks
        .entry(date.iso_week().week())
        .or_insert_with(|| WeekAcc {
            first_day: day,
            last_day: day,
            total: 0.0,
        });
    week.first_day = week.first_day.min(day);
    week.last_day = week.last_day.max(day);
    week.total += raf;
}

/// Flat `{Year, Month, Month Name, Total RAF}` rows.
///
/// Empty when the date or RAF column is missing.
pub fn calculate_monthly_raf(deployments: &Table) -> Vec<MonthlyRaf> {
    if !deployments.has_column(columns::DATE_MEP) || !deployments.has_column(columns::RAF) {
        return Vec::new();
    }
    raf_calendar(deployments).monthly()
}

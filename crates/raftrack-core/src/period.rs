//! RAF period buckets
//!
//! Buckets are sparse: only periods with a non-zero RAF sum exist.

use chrono::Month;
use serde::Serialize;

/// English month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("", |m| m.name())
}

/// One row of the flat monthly RAF table
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlyRaf {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub total_raf: f64,
}

/// RAF of one ISO week, restricted to the days of a single month
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RafWeek {
    pub iso_week: u32,
    /// Smallest day-of-month with a deployment in this week
    pub first_day: u32,
    /// Largest day-of-month with a deployment in this week
    pub last_day: u32,
    pub total: f64,
}

impl RafWeek {
    /// `Week 5 (03 to 07)`, or `Week 5 (03)` for a single day
    pub fn label(&self) -> String {
        if self.first_day == self.last_day {
            format!("Week {} ({:02})", self.iso_week, self.first_day)
        } else {
            format!(
                "Week {} ({:02} to {:02})",
                self.iso_week, self.first_day, self.last_day
            )
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RafMonth {
    pub month: u32,
    pub total: f64,
    /// Weeks in chronological order
    pub weeks: Vec<RafWeek>,
}

impl RafMonth {
    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RafYear {
    pub year: i32,
    /// Months in calendar order
    pub months: Vec<RafMonth>,
}

/// Year → month → week breakdown of RAF
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RafCalendar {
    /// Years in ascending order
    pub years: Vec<RafYear>,
}

impl RafCalendar {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Sum of every month total
    pub fn total(&self) -> f64 {
        self.years
            .iter()
            .flat_map(|y| &y.months)
            .map(|m| m.total)
            .sum()
    }

    /// Flatten to one row per month
    pub fn monthly(&self) -> Vec<MonthlyRaf> {
        self.years
            .iter()
            .flat_map(|y| {
                y.months.iter().map(move |m| MonthlyRaf {
                    year: y.year,
                    month: m.month,
                    month_name: m.name().to_string(),
                    total_raf: m.total,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn week_labels() {
        let week = RafWeek {
            iso_week: 5,
            first_day: 3,
            last_day: 7,
            total: 2.0,
        };
        assert_eq!(week.label(), "Week 5 (03 to 07)");

        let single = RafWeek {
            last_day: 3,
            ..week
        };
        assert_eq!(single.label(), "Week 5 (03)");
    }

    #[test]
    fn calendar_flattens_to_monthly_rows() {
        let calendar = RafCalendar {
            years: vec![RafYear {
                year: 2023,
                months: vec![
                    RafMonth {
                        month: 1,
                        total: 1.0,
                        weeks: vec![],
                    },
                    RafMonth {
                        month: 3,
                        total: -2.5,
                        weeks: vec![],
                    },
                ],
            }],
        };
        let monthly = calendar.monthly();
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month_name, "January");
        assert_eq!(monthly[1].month_name, "March");
        assert_eq!(calendar.total(), -1.5);
    }
}

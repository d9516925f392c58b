//! Public holiday rules.
//!
//! A [`HolidayProvider`] answers "which dates are holidays in this country and year".
//! [`BuiltinHolidays`] carries rule tables for the countries the tool reports for;
//! [`StaticHolidays`] wraps an externally sourced list.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Holidays of one country for one year, keyed by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySet {
    entries: BTreeMap<NaiveDate, String>,
}

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, name: impl Into<String>) {
        self.entries.insert(date, name.into());
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&str> {
        self.entries.get(&date).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Holidays in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &str)> {
        self.entries.iter().map(|(date, name)| (*date, name.as_str()))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }
}

impl Extend<(NaiveDate, String)> for HolidaySet {
    fn extend<T: IntoIterator<Item = (NaiveDate, String)>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl FromIterator<(NaiveDate, String)> for HolidaySet {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for HolidaySet {
    type Item = (NaiveDate, String);
    type IntoIter = btree_map::IntoIter<NaiveDate, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Source of holiday rules. Must be a pure function of its inputs.
pub trait HolidayProvider: Send + Sync {
    fn holidays(&self, year: i32, country: &str) -> HolidaySet;

    fn supports(&self, _country: &str) -> bool {
        true
    }
}

/// Rule tables for Colombia (`CO`) and the United States (`US`).
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinHolidays;

impl BuiltinHolidays {
    pub const COUNTRIES: [&'static str; 2] = ["CO", "US"];

    /// Year Ley 51 de 1983 (moving holidays to Monday) took effect.
    const EMILIANI_SINCE: i32 = 1984;

    fn colombia(year: i32) -> HolidaySet {
        let mut set = HolidaySet::new();
        let emiliani = year >= Self::EMILIANI_SINCE;
        let movable = |month: u32, day: u32| {
            let date = NaiveDate::from_ymd_opt(year, month, day);
            if emiliani { date.map(next_monday) } else { date }
        };

        let fixed = [
            (1, 1, "New Year's Day"),
            (5, 1, "Labor Day"),
            (7, 20, "Independence Day"),
            (8, 7, "Battle of Boyacá"),
            (12, 8, "Immaculate Conception"),
            (12, 25, "Christmas Day"),
        ];
        for (month, day, name) in fixed {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                set.insert(date, name);
            }
        }

        let moved = [
            (1, 6, "Epiphany"),
            (3, 19, "Saint Joseph's Day"),
            (6, 29, "Saint Peter and Saint Paul's Day"),
            (8, 15, "Assumption Day"),
            (10, 12, "Columbus Day"),
            (11, 1, "All Saints' Day"),
            (11, 11, "Independence of Cartagena"),
        ];
        for (month, day, name) in moved {
            if let Some(date) = movable(month, day) {
                set.insert(date, name);
            }
        }

        if let Some(easter) = easter_sunday(year) {
            set.insert(easter - Duration::days(3), "Maundy Thursday");
            set.insert(easter - Duration::days(2), "Good Friday");
            // Thursday feasts observed on the following Monday.
            let relative: [(i64, i64, &str); 3] = [
                (39, 43, "Ascension Day"),
                (60, 64, "Corpus Christi"),
                (68, 71, "Sacred Heart"),
            ];
            for (original, observed, name) in relative {
                let offset = if emiliani { observed } else { original };
                set.insert(easter + Duration::days(offset), name);
            }
        }
        set
    }

    /// First year Juneteenth was a federal holiday.
    const JUNETEENTH_SINCE: i32 = 2021;

    fn united_states(year: i32) -> HolidaySet {
        let mut set = HolidaySet::new();
        let mut fixed = vec![
            (1, 1, "New Year's Day"),
            (7, 4, "Independence Day"),
            (11, 11, "Veterans Day"),
            (12, 25, "Christmas Day"),
        ];
        if year >= Self::JUNETEENTH_SINCE {
            fixed.push((6, 19, "Juneteenth National Independence Day"));
        }
        for (month, day, name) in fixed {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            set.insert(date, name);
            // New Year's on a Saturday is observed in the previous year.
            if let Some(observed) = observed_weekday(date).filter(|d| d.year() == year) {
                set.insert(observed, format!("{name} (observed)"));
            }
        }
        if let Some(observed) = NaiveDate::from_ymd_opt(year + 1, 1, 1)
            .and_then(observed_weekday)
            .filter(|d| d.year() == year)
        {
            set.insert(observed, "New Year's Day (observed)");
        }

        let floating = [
            (nth_weekday(year, 1, Weekday::Mon, 3), "Martin Luther King Jr. Day"),
            (nth_weekday(year, 2, Weekday::Mon, 3), "Presidents' Day"),
            (last_weekday(year, 5, Weekday::Mon), "Memorial Day"),
            (nth_weekday(year, 9, Weekday::Mon, 1), "Labor Day"),
            (nth_weekday(year, 10, Weekday::Mon, 2), "Columbus Day"),
            (nth_weekday(year, 11, Weekday::Thu, 4), "Thanksgiving"),
        ];
        for (date, name) in floating {
            if let Some(date) = date {
                set.insert(date, name);
            }
        }
        set
    }
}

impl HolidayProvider for BuiltinHolidays {
    fn holidays(&self, year: i32, country: &str) -> HolidaySet {
        match country.trim().to_ascii_uppercase().as_str() {
            "CO" => Self::colombia(year),
            "US" => Self::united_states(year),
            _ => HolidaySet::new(),
        }
    }

    fn supports(&self, country: &str) -> bool {
        let code = country.trim().to_ascii_uppercase();
        Self::COUNTRIES.contains(&code.as_str())
    }
}

/// Provider backed by a fixed list of dated holidays, independent of country.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidays {
    entries: BTreeMap<NaiveDate, String>,
}

impl StaticHolidays {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, S)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(date, name)| (date, name.into()))
                .collect(),
        }
    }
}

impl HolidayProvider for StaticHolidays {
    fn holidays(&self, year: i32, _country: &str) -> HolidaySet {
        self.entries
            .iter()
            .filter(|(date, _)| date.year() == year)
            .map(|(date, name)| (*date, name.clone()))
            .collect()
    }
}

/// Gregorian Easter Sunday (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// The date itself when it is a Monday, otherwise the following Monday.
fn next_monday(date: NaiveDate) -> NaiveDate {
    let ahead = (7 - date.weekday().num_days_from_monday()) % 7;
    date + Duration::days(i64::from(ahead))
}

/// Weekday a weekend holiday is observed on: Saturday moves to Friday, Sunday to Monday.
fn observed_weekday(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => date.pred_opt(),
        Weekday::Sun => date.succ_opt(),
        _ => None,
    }
}

/// The nth occurrence of a weekday in a month.
fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

/// The last occurrence of a weekday in a month.
fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let mut date = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    date = date - Duration::days(1);

    while date.weekday() != weekday {
        date = date - Duration::days(1);
    }
    Some(date)
}

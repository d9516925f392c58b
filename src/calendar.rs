use crate::error::ScheduleError;
use crate::holidays::{BuiltinHolidays, HolidayProvider, HolidaySet};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Business-day calendar for one country.
///
/// A date is a business day when it is Monday to Friday and not a holiday. Holiday sets
/// are computed once per year and memoized, so the calendar can be shared across threads.
pub struct WorkCalendar {
    provider: Arc<dyn HolidayProvider>,
    country: String,
    non_working_days: HashSet<Weekday>,
    extra_holidays: BTreeMap<NaiveDate, String>,
    memo: RwLock<HashMap<i32, Arc<HolidaySet>>>,
}

impl fmt::Debug for WorkCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkCalendar")
            .field("country", &self.country)
            .field("extra_holidays", &self.extra_holidays)
            .field("cached_years", &self.memo.read().len())
            .finish()
    }
}

impl Clone for WorkCalendar {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            country: self.country.clone(),
            non_working_days: self.non_working_days.clone(),
            extra_holidays: self.extra_holidays.clone(),
            memo: RwLock::new(self.memo.read().clone()),
        }
    }
}

impl WorkCalendar {
    pub fn new<P>(provider: P, country: impl Into<String>) -> Result<Self, ScheduleError>
    where
        P: HolidayProvider + 'static,
    {
        Self::with_shared_provider(Arc::new(provider), country)
    }

    pub fn with_shared_provider(
        provider: Arc<dyn HolidayProvider>,
        country: impl Into<String>,
    ) -> Result<Self, ScheduleError> {
        let country = country.into().trim().to_ascii_uppercase();
        if country.is_empty() {
            return Err(ScheduleError::config("country code must not be empty"));
        }
        if !provider.supports(&country) {
            return Err(ScheduleError::config(format!(
                "no holiday rules for country '{country}'"
            )));
        }

        Ok(Self {
            provider,
            country,
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
            extra_holidays: BTreeMap::new(),
            memo: RwLock::new(HashMap::new()),
        })
    }

    /// Calendar using the built-in holiday rules.
    pub fn builtin(country: impl Into<String>) -> Result<Self, ScheduleError> {
        Self::new(BuiltinHolidays, country)
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Add a company-specific holiday on top of the provider's rules.
    pub fn add_holiday(&mut self, date: NaiveDate, name: impl Into<String>) {
        self.extra_holidays.insert(date, name.into());
        self.memo.get_mut().remove(&date.year());
    }

    /// Add multiple holidays at once
    pub fn add_holidays<I, S>(&mut self, holidays: I)
    where
        I: IntoIterator<Item = (NaiveDate, S)>,
        S: Into<String>,
    {
        for (date, name) in holidays {
            self.add_holiday(date, name);
        }
    }

    /// Holidays for `year`, computed on first use.
    pub fn holidays(&self, year: i32) -> Arc<HolidaySet> {
        if let Some(set) = self.memo.read().get(&year) {
            return Arc::clone(set);
        }

        let mut set = self.provider.holidays(year, &self.country);
        set.extend(
            self.extra_holidays
                .range(year_start(year)..)
                .take_while(|(date, _)| date.year() == year)
                .map(|(date, name)| (*date, name.clone())),
        );
        tracing::debug!(year, country = %self.country, count = set.len(), "computed holidays");

        let set = Arc::new(set);
        self.memo
            .write()
            .entry(year)
            .or_insert_with(|| Arc::clone(&set))
            .clone()
    }

    /// Warm the memo for every year that will be queried.
    pub fn prefetch<I: IntoIterator<Item = i32>>(&self, years: I) {
        for year in years {
            self.holidays(year);
        }
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        if self.non_working_days.contains(&date.weekday()) {
            return false;
        }
        !self.holidays(date.year()).contains(date)
    }

    /// First and last calendar date of a month.
    pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), ScheduleError> {
        let invalid = || ScheduleError::config(format!("invalid month {year}-{month:02}"));
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        Ok((first, next_month - Duration::days(1)))
    }

    /// Business days of a month in ascending order. May be empty.
    pub fn business_days_in_month(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<NaiveDate>, ScheduleError> {
        let (first, last) = Self::month_bounds(year, month)?;
        Ok(self.business_days_in_range(first, last))
    }

    /// Get all business days in an inclusive date range
    pub fn business_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter(|date| self.is_business_day(*date))
            .collect()
    }

    /// Count business days in an inclusive date range
    pub fn count_business_days(&self, start: NaiveDate, end: NaiveDate) -> usize {
        start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter(|date| self.is_business_day(*date))
            .count()
    }

    /// Next business day strictly after `from`.
    pub fn next_business_day(&self, from: NaiveDate) -> Option<NaiveDate> {
        from.iter_days().skip(1).find(|date| self.is_business_day(*date))
    }
}

fn year_start(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

use chrono::{Datelike, Days, NaiveDate};

/// Premier jour du mois, `None` si le couple année/mois est invalide.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Nombre de jours calendaires du mois.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = month_start(year, month)?;
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

pub(crate) fn nth_day(start: NaiveDate, offset: usize) -> Option<NaiveDate> {
    start.checked_add_days(Days::new(u64::try_from(offset).ok()?))
}

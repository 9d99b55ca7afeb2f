use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday};

/// Wall-clock timing of the daily cycle, in exchange-local time.
///
/// Signals are staged `stage_lead_minutes` before the open, orders go out
/// `rebalance_offset_minutes` after the open, and the day is recorded at
/// the close. Trading days are Monday to Friday; exchange holidays are not
/// modelled, the feed simply has no closes for them.
#[derive(Debug, Clone)]
pub struct DailySchedule {
    pub market_open: NaiveTime,
    pub market_close: NaiveTime,
    pub utc_offset: FixedOffset,
    pub stage_lead_minutes: i64,
    pub rebalance_offset_minutes: i64,
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self {
            market_open: NaiveTime::from_hms_opt(9, 30, 0).expect("valid open time"),
            market_close: NaiveTime::from_hms_opt(16, 0, 0).expect("valid close time"),
            utc_offset: FixedOffset::west_opt(5 * 3600).expect("valid UTC offset"),
            stage_lead_minutes: 30,
            rebalance_offset_minutes: 60,
        }
    }
}

impl DailySchedule {
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// First trading day strictly after `date`.
    pub fn next_trading_day(&self, date: NaiveDate) -> NaiveDate {
        let mut d = date + Duration::days(1);
        while !self.is_trading_day(d) {
            d += Duration::days(1);
        }
        d
    }

    /// Last trading day strictly before `date`; its close is the as-of
    /// data for the signal staged on `date`.
    pub fn previous_session(&self, date: NaiveDate) -> NaiveDate {
        let mut d = date - Duration::days(1);
        while !self.is_trading_day(d) {
            d -= Duration::days(1);
        }
        d
    }

    pub fn stage_at(&self, date: NaiveDate) -> DateTime<Utc> {
        self.at(date, self.market_open) - Duration::minutes(self.stage_lead_minutes)
    }

    pub fn rebalance_at(&self, date: NaiveDate) -> DateTime<Utc> {
        self.at(date, self.market_open) + Duration::minutes(self.rebalance_offset_minutes)
    }

    pub fn close_at(&self, date: NaiveDate) -> DateTime<Utc> {
        self.at(date, self.market_close)
    }

    /// The trading day whose rebalance is still ahead of `now`.
    pub fn next_cycle_day(&self, now: DateTime<Utc>) -> NaiveDate {
        let mut d = now.with_timezone(&self.utc_offset).date_naive();
        while !self.is_trading_day(d) || self.rebalance_at(d) <= now {
            d += Duration::days(1);
        }
        d
    }

    fn at(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let local = date.and_time(time);
        (local - Duration::seconds(self.utc_offset.local_minus_utc() as i64)).and_utc()
    }
}

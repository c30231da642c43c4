use chrono::{Local, NaiveDate, Utc};

/// Source of "today" for date-relative views
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    /// Unix timestamp in seconds
    fn now_timestamp(&self) -> i64;
}

/// Wall clock in the local timezone
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_timestamp(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock pinned to one day, for tests and reproducible reports
pub struct FixedClock {
    pub today: NaiveDate,
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_timestamp(&self) -> i64 {
        self.today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default()
    }
}

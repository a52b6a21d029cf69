use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Seasonal fare adjustment: departures inside `[start_date, end_date]` pay `peak_ratio` percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakTime {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub peak_ratio: i32,
}

impl PeakTime {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

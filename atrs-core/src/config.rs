use serde::Deserialize;

/// Business thresholds for ticket reservation, read once at startup.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TicketRules {
    /// Passengers younger than this pay the child fare
    #[serde(default = "default_adult_passenger_min_age")]
    pub adult_passenger_min_age: u32,
    /// Child fare as a percentage of the basic fare
    #[serde(default = "default_child_fare_rate")]
    pub child_fare_rate: i32,
    #[serde(default = "default_representative_min_age")]
    pub representative_min_age: u32,
    /// How many days ahead of today a flight may be booked
    #[serde(default = "default_limit_day")]
    pub limit_day: i64,
    /// Minutes required between outbound arrival and return departure
    #[serde(default = "default_reserve_interval_time")]
    pub reserve_interval_time: i64,
}

fn default_adult_passenger_min_age() -> u32 { 12 }
fn default_child_fare_rate() -> i32 { 50 }
fn default_representative_min_age() -> u32 { 18 }
fn default_limit_day() -> i64 { 355 }
fn default_reserve_interval_time() -> i64 { 20 }

impl Default for TicketRules {
    fn default() -> Self {
        Self {
            adult_passenger_min_age: default_adult_passenger_min_age(),
            child_fare_rate: default_child_fare_rate(),
            representative_min_age: default_representative_min_age(),
            limit_day: default_limit_day(),
            reserve_interval_time: default_reserve_interval_time(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let rules: TicketRules = serde_json::from_str(r#"{ "representative_min_age": 20 }"#).unwrap();
        assert_eq!(rules.representative_min_age, 20);
        assert_eq!(rules.adult_passenger_min_age, 12);
        assert_eq!(rules.child_fare_rate, 50);
    }
}

//! Season classification from live temperature and the current month
//!
//! The primary rule is an OR-cascade evaluated top to bottom, first hit wins:
//!
//! | Order | month OR temperature (°C)   | Season |
//! |-------|-----------------------------|--------|
//! | 1     | 3..=5  OR 15.0..=25.0       | spring |
//! | 2     | 6..=8  OR > 25.0            | summer |
//! | 3     | 9..=11 OR 10.0..=15.0       | fall   |
//! | 4     | otherwise                   | winter |
//!
//! Because the temperature clause is not gated by month, 20 °C in December
//! is "spring". When the weather lookup fails the month-only rule applies.
//! Classification never fails.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

use super::weather_client::{Coordinate, WeatherProvider};

/// Coarse calendar season (northern hemisphere months)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Month-only rule with non-overlapping ranges
pub fn season_from_month(month: u32) -> Season {
    match month {
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Fall,
        _ => Season::Winter,
    }
}

/// Month-or-temperature cascade
pub fn season_from_reading(month: u32, temp_c: f64) -> Season {
    if (3..=5).contains(&month) || (15.0..=25.0).contains(&temp_c) {
        Season::Spring
    } else if (6..=8).contains(&month) || temp_c > 25.0 {
        Season::Summer
    } else if (9..=11).contains(&month) || (10.0..=15.0).contains(&temp_c) {
        Season::Fall
    } else {
        Season::Winter
    }
}

/// Current month (1-12) from the server's local clock
pub fn current_month() -> u32 {
    chrono::Local::now().month()
}

/// Classify the season at `coord` right now
pub async fn classify(provider: &dyn WeatherProvider, coord: Coordinate) -> Season {
    classify_at(provider, coord, current_month()).await
}

/// Classify with an explicit month
pub async fn classify_at(provider: &dyn WeatherProvider, coord: Coordinate, month: u32) -> Season {
    match provider.current_temperature(coord).await {
        Ok(temp_c) => season_from_reading(month, temp_c),
        Err(e) => {
            error!(
                error = %e,
                latitude = coord.latitude,
                longitude = coord.longitude,
                "Error fetching weather data, using month-based season"
            );
            season_from_month(month)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::weather_client::WeatherError;
    use async_trait::async_trait;

    struct FixedTemperature(f64);

    #[async_trait]
    impl WeatherProvider for FixedTemperature {
        async fn current_temperature(&self, _coord: Coordinate) -> Result<f64, WeatherError> {
            Ok(self.0)
        }
    }

    struct Unreachable;

    #[async_trait]
    impl WeatherProvider for Unreachable {
        async fn current_temperature(&self, _coord: Coordinate) -> Result<f64, WeatherError> {
            Err(WeatherError::Network("connection refused".to_string()))
        }
    }

    fn somewhere() -> Coordinate {
        Coordinate::new(28.6, 77.2)
    }

    #[test]
    fn test_month_rule_boundaries() {
        assert_eq!(season_from_month(1), Season::Winter);
        assert_eq!(season_from_month(2), Season::Winter);
        assert_eq!(season_from_month(3), Season::Spring);
        assert_eq!(season_from_month(5), Season::Spring);
        assert_eq!(season_from_month(6), Season::Summer);
        assert_eq!(season_from_month(8), Season::Summer);
        assert_eq!(season_from_month(9), Season::Fall);
        assert_eq!(season_from_month(11), Season::Fall);
        assert_eq!(season_from_month(12), Season::Winter);
    }

    #[test]
    fn test_month_rule_out_of_range_is_winter() {
        assert_eq!(season_from_month(0), Season::Winter);
        assert_eq!(season_from_month(13), Season::Winter);
    }

    #[test]
    fn test_temperature_overrides_month() {
        assert_eq!(season_from_reading(12, 20.0), Season::Spring);
        assert_eq!(season_from_reading(1, 30.0), Season::Summer);
        assert_eq!(season_from_reading(2, 12.0), Season::Fall);
    }

    #[test]
    fn test_spring_month_beats_hot_temperature() {
        assert_eq!(season_from_reading(4, 35.0), Season::Spring);
    }

    #[test]
    fn test_temperature_boundaries() {
        assert_eq!(season_from_reading(1, 25.0), Season::Spring);
        assert_eq!(season_from_reading(1, 25.1), Season::Summer);
        assert_eq!(season_from_reading(1, 15.0), Season::Spring);
        assert_eq!(season_from_reading(1, 14.9), Season::Fall);
        assert_eq!(season_from_reading(1, 10.0), Season::Fall);
        assert_eq!(season_from_reading(1, 9.9), Season::Winter);
    }

    #[test]
    fn test_cold_summer_month_is_summer() {
        assert_eq!(season_from_reading(7, 5.0), Season::Summer);
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(Season::Fall.to_string(), "fall");
        assert_eq!(serde_json::to_string(&Season::Winter).unwrap(), "\"winter\"");
        let parsed: Season = serde_json::from_str("\"summer\"").unwrap();
        assert_eq!(parsed, Season::Summer);
    }

    #[tokio::test]
    async fn test_classify_primary_path() {
        let season = classify_at(&FixedTemperature(20.0), somewhere(), 12).await;
        assert_eq!(season, Season::Spring);
    }

    #[tokio::test]
    async fn test_classify_fallback_april_is_spring() {
        let season = classify_at(&Unreachable, somewhere(), 4).await;
        assert_eq!(season, Season::Spring);
    }

    #[tokio::test]
    async fn test_classify_fallback_december_is_winter() {
        let season = classify_at(&Unreachable, somewhere(), 12).await;
        assert_eq!(season, Season::Winter);
    }

    #[tokio::test]
    async fn test_classify_uses_current_month_on_fallback() {
        let season = classify(&Unreachable, somewhere()).await;
        assert_eq!(season, season_from_month(current_month()));
    }
}

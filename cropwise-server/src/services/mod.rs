//! Domain services and external API clients

pub mod nutrients;
pub mod season;
pub mod vision_client;
pub mod weather_client;

pub use nutrients::{extract, NutrientReading, NutrientValue};
pub use season::{classify, classify_at, Season};
pub use vision_client::{TextRecognizer, VisionClient, VisionError};
pub use weather_client::{Coordinate, OpenWeatherClient, WeatherError, WeatherProvider};

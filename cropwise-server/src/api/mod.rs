//! HTTP API handlers for cropwise-server

pub mod health;
pub mod ocr;
pub mod planner;

pub use health::health_routes;
pub use ocr::ocr_routes;
pub use planner::planner_routes;

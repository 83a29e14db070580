// Application layer - Use cases over the fleet dataset
pub mod activity_log;
pub mod fleet_service;
pub mod report_generator;
pub mod report_service;

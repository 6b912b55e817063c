pub mod analytics;
pub mod coverage;
pub mod roster;
pub mod scheduled;

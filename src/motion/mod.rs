pub mod ease;
pub mod planner;

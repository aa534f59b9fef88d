pub mod address;
pub mod cost;
pub mod report;
pub mod route;

pub mod aircraft;
pub mod catalog;
pub mod error;
pub mod leg;
pub mod logger;
pub mod planner;
pub mod rotation;
pub mod store;
pub mod time;
pub mod timeline;
pub mod view;

pub mod address;
pub mod authorization;
pub mod browse_history;
pub mod email;
pub mod user;

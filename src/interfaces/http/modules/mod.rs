pub mod developers;
pub mod events;
pub mod health;
pub mod matches;
pub mod metrics;
pub mod players;
pub mod request_id;
pub mod stats;
pub mod teams;
pub mod venues;

//! sea-orm entities for the users service database.

pub mod addresses;
pub mod outbox_events;
pub mod skus;
pub mod users;

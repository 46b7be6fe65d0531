pub mod account;
pub mod events;
pub mod holding;
pub mod ids;
pub mod order;
pub mod quote;
pub mod summary;

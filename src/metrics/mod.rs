pub mod collector;
pub mod column;
pub mod notifier;
pub mod pairing;
pub mod shared;
pub mod store;

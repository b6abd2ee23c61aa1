pub mod user;

pub use user::{EmailSearchQuery, NameSearchQuery, UserDto};

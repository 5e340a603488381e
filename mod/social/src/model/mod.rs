mod account;
mod relationship;

pub use account::*;
pub use relationship::*;

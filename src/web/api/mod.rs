pub mod countdown;
pub mod error;
pub mod pass;

pub mod config;
pub mod countdown;
pub mod error;
pub mod futsal;
pub mod history;
pub mod logging;
pub mod notify;
pub mod persist;
pub mod score;
pub mod state;
pub mod volleyball;

//! Command line front-end of mixroute: loads route files, prints encoded paths and trade quotes.
pub mod cli;
pub mod config;

pub use config::{CliError, RouteFile};

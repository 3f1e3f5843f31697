pub mod cli;
pub mod commands;
pub mod fixer;
pub mod model;
pub mod policy;
pub mod report;
pub mod store;
pub mod util;
pub mod validator;

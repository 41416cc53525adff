// Library for tests to access modules

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod evaluator;
pub mod mailer;
pub mod models;
pub mod registry;
pub mod routes;
pub mod sysinfo_repo;
pub mod version;
pub mod worker;

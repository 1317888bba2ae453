// Commands module

pub mod endpoint;
pub mod run;

pub use endpoint::execute_endpoint;
pub use run::execute_run;

mod connection;
mod global;
mod report;

pub use connection::ConnectionArgs;
pub use global::GlobalArgs;
pub use report::ReportArgs;

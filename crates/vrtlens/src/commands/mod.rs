mod analyze;
mod compare;
mod init;
mod suite;

pub use self::analyze::analyze;
pub use self::compare::compare;
pub use self::init::init;
pub use self::suite::{SuiteArgs, suite};

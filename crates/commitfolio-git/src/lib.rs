mod checkout;
mod error;
mod git;
mod log;

pub use checkout::TransientCheckout;
pub use error::{Error, Result};
pub use git::{GitCli, VcsTransport};
pub use log::{author_args, parse_log, LogRecord, LOG_FORMAT};

//! EC2 fleet access

mod ec2;
mod error;
mod ops;

pub use ec2::Ec2Fleet;
pub use error::{classify_anyhow_error, AwsError};
pub use ops::Ec2Ops;

mod config_errors;
mod encode_errors;
mod storage_errors;
mod validation_errors;

pub use config_errors::*;
pub use encode_errors::*;
pub use storage_errors::*;
pub use validation_errors::*;

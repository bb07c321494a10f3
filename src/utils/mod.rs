pub mod constants;
pub mod logging;
pub mod url_utils;

pub use constants::*;
pub use logging::init_logging;
pub use url_utils::{Origin, host_with_port, is_valid_url, normalize_url};

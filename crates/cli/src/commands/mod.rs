pub mod check;
pub mod config;
pub mod util;
pub mod version;

pub use check::*;
pub use config::*;
pub use util::*;
pub use version::*;

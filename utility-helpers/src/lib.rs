pub mod macros;
pub mod types;

pub const SHOW_LOGS: bool = true;

pub mod fixtures;
pub mod logging;

pub use fixtures::{covered_case, f_int_unit};

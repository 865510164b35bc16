pub mod eval;
pub mod ordering;
#[allow(clippy::module_inception)]
pub mod search;
pub mod tt;

pub mod check;
pub mod limit;
pub mod value;
pub mod verdict;

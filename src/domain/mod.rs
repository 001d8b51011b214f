pub mod phone;
pub mod verdict;

pub use phone::PhoneNumber;
pub use verdict::{ScamCategory, Verdict};

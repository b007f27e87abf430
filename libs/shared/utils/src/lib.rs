pub mod phone;
pub mod test_utils;

pub use phone::normalize_phone;

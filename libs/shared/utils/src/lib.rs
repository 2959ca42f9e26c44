pub mod extractor;
pub mod state;
pub mod test_utils;

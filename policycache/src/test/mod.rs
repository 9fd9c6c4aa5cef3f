mod cache_tests;
mod tests;

#[cfg(test)]
mod catalog_test;

pub mod dto;
pub mod model;
pub mod service;

#[cfg(test)]
pub mod test_support;

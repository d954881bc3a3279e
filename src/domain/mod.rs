pub mod kubernetes;
pub mod system;

pub mod kubernetes;
pub mod stream;
pub mod system;

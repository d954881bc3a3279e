pub mod system_response;

pub mod kubernetes_response;
pub mod log_stream_request;
pub mod scale_deployment_request;
pub mod switch_context_request;

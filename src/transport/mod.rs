//! HTTP transport abstraction.
//!
//! The client talks to the API through the [`Transport`] trait:
//! - [`ReqwestTransport`] for real HTTP
//! - [`MockTransport`] for testing

pub mod http;
pub mod mock;
pub mod traits;

pub use http::ReqwestTransport;
pub use mock::MockTransport;
pub use traits::{HttpRequest, HttpResponse, Method, Params, Transport};

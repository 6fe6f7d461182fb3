//! Extraction strategies for the host frameworks this crate supports.
//!
//! | Strategy | Request type |
//! |----------|--------------|
//! | [`http_request_strategy`] | `http::Request<Bytes>` (axum, hyper, tower services after buffering the body) |
//! | [`azure_functions_strategy`] | Azure Functions custom-handler [`InvocationRequest`] |

mod azure_functions;
mod http;

pub use self::azure_functions::{
    azure_functions_strategy, AzureFunctionsStrategy, HttpTriggerBinding, InvocationRequest,
    DEFAULT_HTTP_BINDING,
};
pub use self::http::{attributes_from_header_map, http_request_strategy};

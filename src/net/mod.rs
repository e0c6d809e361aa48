//! Network layer: wire types, the transport seam, and the typed API client.

pub mod api;
pub mod reqwest_transport;
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use reqwest_transport::ReqwestTransport;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method};

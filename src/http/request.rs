//! Request identification.
//!
//! # Responsibilities
//! - Assign an `x-request-id` to every request that arrives without one
//! - Echo the id back on the response
//! - Decode the request path used for routing
//!
//! # Design Decisions
//! - Ids are UUID v4 (tower-http `MakeRequestUuid`)
//! - The id is set before the trace span opens so every log line can carry it

use axum::http::{HeaderName, Uri};
use percent_encoding::percent_decode_str;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request id.
pub const X_REQUEST_ID: &str = "x-request-id";

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Layer generating an id for requests that lack one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(request_id_header(), MakeRequestUuid)
}

/// Layer copying the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(request_id_header())
}

/// Percent-decoded request path; invalid UTF-8 is replaced lossily.
///
/// Routing, group prefixes and the 404 body all see this form, so
/// `/caf%C3%A9` matches a route registered as `/café`.
pub fn decoded_path(uri: &Uri) -> String {
    percent_decode_str(uri.path()).decode_utf8_lossy().into_owned()
}

//! Request ID handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) early in the stack
//! - Propagate the ID onto responses for correlation
//!
//! # Design Decisions
//! - Existing x-request-id values from the client are kept, matching the
//!   trust we already place in the load balancer's forwarded headers

use axum::http::{HeaderValue, Request};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Layer that assigns an x-request-id when the request has none.
pub fn set_request_id_layer() -> SetRequestIdLayer<UuidRequestId> {
    SetRequestIdLayer::x_request_id(UuidRequestId)
}

/// Layer that copies x-request-id from the request onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn generates_parseable_uuids() {
        let req = Request::builder().body(Body::empty()).unwrap();
        let id = UuidRequestId.make_request_id(&req).unwrap();
        let value = id.header_value().to_str().unwrap().to_string();
        assert!(Uuid::parse_str(&value).is_ok());
    }
}

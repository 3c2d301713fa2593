//! Observability - request IDs propagated through tracing spans.

mod request_id;

pub use request_id::RequestIdMiddleware;

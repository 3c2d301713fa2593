//! Middleware modules - error mapping, auth extractor, upload forms.

pub mod auth;
pub mod error;
pub mod upload;

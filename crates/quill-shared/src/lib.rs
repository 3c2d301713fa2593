//! # Quill Shared
//!
//! Request/response types shared between the API server and its clients.
//! In a full-stack Rust setup, this crate is compiled for both server and WASM.

pub mod dto;
pub mod response;

pub use dto::{
    LoginRequest, LoginResponse, PostAuthor, PostResponse, RegisterRequest, UserResponse,
};
pub use response::{ApiResponse, ErrorResponse};

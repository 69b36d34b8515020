//! バックエンド通信

pub mod backend;
pub mod submit;

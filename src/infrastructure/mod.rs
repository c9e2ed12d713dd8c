//! Infrastructure layer
//! 터미널/파일시스템/tracing 구독자와 직접 통신하는 구현체 집합.

pub mod adapters;
pub mod config;
pub mod input;
pub mod logging;
pub mod render;

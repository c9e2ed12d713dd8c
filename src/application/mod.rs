//! Application layer
//! 디스패치 엔진(시작 단계/콘솔 루프)을 정의하고 포트를 통해 인프라를 사용한다.

pub mod config;
pub mod console;
pub mod logging;
pub mod ports;
pub mod repl;
pub mod startup;

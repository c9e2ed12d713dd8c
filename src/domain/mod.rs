//! Domain layer
//! 플래그/명령 모델과 파서를 외부 의존성 없이 표현한다.

pub mod command;
pub mod context;
pub mod error;
pub mod flag;
pub mod parse;

//! Interface layer
//! 실행 시점 조립과 데모 바이너리용 등록 코드를 둔다.

pub mod composition;
pub mod demo;

pub use composition::ConsoleComposition;

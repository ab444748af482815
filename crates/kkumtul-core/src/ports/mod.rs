//! Hexagonal Architecture 포트 인터페이스.
//!
//! 어댑터 crate가 구현하는 외부 협력자 경계를 정의한다.

pub mod activity_source;
pub mod input_injector;
pub mod window_controller;

//! 도메인 데이터 모델.

pub mod action;
pub mod activity;
pub mod cycle;
pub mod window;

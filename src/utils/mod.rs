//! # 常用接口模块
//!
//! 本模块提供一些常用的操作接口

pub mod gradient_check;

pub use gradient_check::{GradientCheckError, GradientChecker};

//! 安全环境管理模块
//!
//! 提供安全环境变量访问

pub mod secure_env;

pub use secure_env::*;

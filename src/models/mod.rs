//! 数据模型模块

pub mod auth;
pub mod enrollment;
pub mod roster;
pub mod subject;
pub mod user;

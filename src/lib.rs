//! Gradebook Registrar - 成绩审核与官方成绩台账服务
//!
//! 教师提交的成绩经教务审核后写入官方成绩台账。审核通过时，台账写入与提交状态迁移
//! 在同一事务中完成，并发审核同一提交时只有一方成功。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（审核引擎、成绩换算）
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;

//! # Inventory Client
//!
//! 库存管理应用的客户端：浏览、收藏、新建与删除物品
//!
//! ## 架构设计
//!
//! ### ① 基础设施层
//! - `api/` - 后端 HTTP 接口，上层只依赖 [`api::RemoteApi`]
//! - `session/` - 登录会话的持久化与恢复
//!
//! ### ② 业务能力层
//! - `services/` - 列表、收藏、类型、详情与删除
//!
//! ### ③ 流程层
//! - `form/` - 新建物品的提交状态机及其异步执行器
//!
//! ### ④ 编排层
//! - `app` - 持有客户端和会话，把命令委托给下层
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod services;
pub mod session;
pub mod utils;

// 重新导出常用类型
pub use api::{RemoteApi, RestClient};
pub use app::{App, NewItem};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use form::{FormState, Intent, SubmissionController, SubmissionPhase};
pub use models::Item;
pub use session::SessionManager;

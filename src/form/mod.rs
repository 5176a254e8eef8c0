//! 新建物品表单
//!
//! 核心职责：保证"选图 → 上传 → 拿到图片 id → 校验 → 创建物品 → 反馈结果"的顺序，
//! 避免产生残缺或重复的物品记录，并让界面始终处于唯一明确的阶段。
//!
//! - `state` - 表单状态、阶段与错误
//! - `intent` - 展示层意图与内部事件
//! - `machine` - 纯状态转换
//! - `controller` - 执行副作用的控制器

pub mod controller;
pub mod draft;
pub mod intent;
pub mod machine;
pub mod state;

pub use controller::SubmissionController;
pub use draft::ItemDraft;
pub use intent::{Event, FieldEdit, Intent};
pub use machine::{Effect, Step, SubmissionMachine};
pub use state::{FormError, FormState, SubmissionPhase, ValidationError};

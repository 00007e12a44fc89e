//! 事件查看模块
//!
//! 提供事件查看页面、聚合结果 JSON 接口和前端静态资源

mod handlers;
mod page;
mod router;
mod types;
mod ui;

pub use router::{ViewerState, create_viewer_router};

//! 事件关联与聚合模块
//!
//! 从元数据推断请求/响应配对，分批获取事件详情，合并为渲染层使用的聚合结果

pub mod aggregate;
pub mod batch;
pub mod correlator;
pub mod error;
pub mod merger;
pub mod model;
pub mod ordered;
pub mod pipeline;
pub mod source;

pub use aggregate::EventAggregate;
pub use error::PipelineError;
pub use pipeline::{EventPipeline, PipelineOptions};
pub use source::EventSource;

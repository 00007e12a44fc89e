//! 上游服务客户端

mod client;

pub use client::HttpEventSource;

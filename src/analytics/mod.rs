//! 点击事件的写入抽象

pub mod sink;

pub use sink::ClickSink;

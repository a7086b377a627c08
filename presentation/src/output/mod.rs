//! Run result formatting

pub mod console;

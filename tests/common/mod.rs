#![allow(dead_code)]

pub mod fake_printer;
pub mod fixtures;
pub mod logs;

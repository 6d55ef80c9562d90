// src/lib.rs

pub mod app_logic;
pub mod console_layer;
pub mod core;

pub use crate::app_logic::VocabAppLogic;

// src/lib.rs

pub mod blockchain;
pub mod cli;
pub mod core;
pub mod security;
pub mod theme;

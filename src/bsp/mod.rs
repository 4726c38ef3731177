// src/bsp/mod.rs

//! 板级支持: 各 SoC 的内存映射和默认平台数据.

pub mod samsung;

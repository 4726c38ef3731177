// src/lib.rs

//! Samsung EXYNOS TMU (温度管理单元) 的平台数据和驱动.
//!
//! * [`platform_data`]: 板级代码填写的配置, 以及各字段含义对应的查询.
//! * [`abi`]: 与 C 头文件逐位兼容的结构体.
//! * [`calibration`]: 温度和温度码之间的换算.
//! * [`drivers`]: TMU 和日志串口的 MMIO 驱动.
//! * [`bsp`]: 各 SoC 的地址和默认配置.

#![cfg_attr(not(test), no_std)]

pub mod abi;
pub mod bsp;
pub mod calibration;
pub mod cpumask;
pub mod drivers;
pub mod error;
pub mod platform_data;

pub use calibration::Calibration;
pub use cpumask::{CpuId, CpuMask};
pub use drivers::tmu::{RegisterLayout, Tmu};
pub use error::{Error, Result};
pub use platform_data::{
    CalibrationType, ClusterClip, FreqClipTable, HotplugAction, SocType, TmuPlatformData,
    TriggerSet, TripType,
};

// src/bsp/samsung/exynos4210.rs

//! Exynos4210 的内存映射地址和默认 TMU 配置.

use crate::platform_data::{CalibrationType, FreqClipTable, SocType, TmuPlatformData};

// TMU 的物理基地址
pub const TMU_PHYS_BASE: usize = 0x100C_0000;

// 调试串口为 UART2
pub const UART2_PHYS_BASE: usize = 0x1382_0000;

/// 触发温度为 80 + 5/20/30 摄氏度, 前两级各对应一个冷却档位.
pub const DEFAULT_TMU_DATA: TmuPlatformData = TmuPlatformData {
    threshold: 80,
    trigger_levels: [5, 20, 30, 0, 0, 0, 0, 0],
    trigger_enable: [true, true, true, false, false, false, false, false],
    reference_voltage: 7,
    gain: 15,
    cal_type: CalibrationType::OnePointTrimming,
    freq_tab: [
        FreqClipTable::new(800 * 1000, 85),
        FreqClipTable::new(200 * 1000, 100),
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
    ],
    freq_tab_count: 2,
    size: [0, 2, 0, 1],
    ..TmuPlatformData::new(SocType::Exynos4210)
};

// src/bsp/samsung/exynos5250.rs

//! Exynos5250 (以及 Exynos4412) 的内存映射地址和默认 TMU 配置.

use crate::platform_data::{CalibrationType, FreqClipTable, SocType, TmuPlatformData};

pub const TMU_PHYS_BASE: usize = 0x1006_0000;
pub const UART2_PHYS_BASE: usize = 0x12C2_0000;

/// `threshold` 为 0, 触发级别直接是绝对温度.
pub const DEFAULT_TMU_DATA: TmuPlatformData = TmuPlatformData {
    threshold_falling: 10,
    trigger_levels: [85, 103, 110, 0, 0, 0, 0, 0],
    trigger_enable: [true, true, true, false, false, false, false, false],
    gain: 8,
    reference_voltage: 16,
    noise_cancel_mode: 4,
    cal_type: CalibrationType::OnePointTrimming,
    efuse_value: 55,
    freq_tab: [
        FreqClipTable::new(800 * 1000, 85),
        FreqClipTable::new(200 * 1000, 103),
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
    ],
    freq_tab_count: 2,
    size: [0, 2, 0, 1],
    ..TmuPlatformData::new(SocType::Exynos)
};

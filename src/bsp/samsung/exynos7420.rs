// src/bsp/samsung/exynos7420.rs

//! Exynos7420 的内存映射地址和默认 TMU 配置.

use crate::cpumask::CpuMask;
use crate::platform_data::{CalibrationType, FreqClipTable, SocType, TmuPlatformData};

// ATLAS (A57) 簇的 TMU
pub const TMU_PHYS_BASE: usize = 0x1006_0000;
pub const UART2_PHYS_BASE: usize = 0x14C3_0000;

const ATLAS: CpuMask = CpuMask::range(4, 7);

const fn atlas_tier(freq_clip_max: u32, temp_level: u32) -> FreqClipTable {
    FreqClipTable {
        mask: ATLAS,
        ..FreqClipTable::new(freq_clip_max, temp_level)
    }
}

/// 8 个触发级别全部使能, 最后一级是关机温度.
pub const DEFAULT_TMU_DATA: TmuPlatformData = TmuPlatformData {
    threshold_falling: 2,
    trigger_levels: [75, 80, 85, 90, 95, 100, 105, 115],
    trigger_enable: [true; 8],
    gain: 9,
    reference_voltage: 17,
    noise_cancel_mode: 4,
    cal_type: CalibrationType::OnePointTrimming,
    efuse_value: 75,
    freq_tab: [
        atlas_tier(1_800_000, 80),
        atlas_tier(1_500_000, 85),
        atlas_tier(1_200_000, 90),
        atlas_tier(900 * 1000, 95),
        atlas_tier(800 * 1000, 100),
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
    ],
    freq_tab_count: 5,
    size: [1, 5, 1, 1],
    hotplug_out_threshold: 105,
    hotplug_in_threshold: 95,
    ..TmuPlatformData::new(SocType::Exynos7420)
};

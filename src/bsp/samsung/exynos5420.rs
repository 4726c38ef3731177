// src/bsp/samsung/exynos5420.rs

//! Exynos5420/5430 (`SOC_ARCH_EXYNOS543X`) 的内存映射地址和默认 TMU 配置.

use crate::cpumask::CpuMask;
use crate::platform_data::{CalibrationType, FreqClipTable, SocType, TmuPlatformData};

// 四个 CPU 传感器, 最后一个是 GPU
pub const TMU_PHYS_BASES: [usize; 5] = [
    0x1006_0000,
    0x1006_4000,
    0x1006_8000,
    0x1006_C000,
    0x100A_0000,
];
pub const UART2_PHYS_BASE: usize = 0x12C2_0000;

// A15 簇
const BIG_CLUSTER: CpuMask = CpuMask::range(0, 3);

const fn big_tier(freq_clip_max: u32, temp_level: u32) -> FreqClipTable {
    FreqClipTable {
        mask: BIG_CLUSTER,
        ..FreqClipTable::new(freq_clip_max, temp_level)
    }
}

pub const DEFAULT_TMU_DATA: TmuPlatformData = TmuPlatformData {
    threshold_falling: 10,
    trigger_levels: [85, 103, 110, 120, 0, 0, 0, 0],
    trigger_enable: [true, true, true, true, false, false, false, false],
    gain: 8,
    reference_voltage: 16,
    noise_cancel_mode: 4,
    cal_type: CalibrationType::OnePointTrimming,
    efuse_value: 55,
    freq_tab: [
        big_tier(1_600_000, 85),
        big_tier(800 * 1000, 103),
        big_tier(200 * 1000, 110),
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
        FreqClipTable::EMPTY,
    ],
    freq_tab_count: 3,
    size: [1, 3, 1, 0],
    hotplug_out_threshold: 110,
    hotplug_in_threshold: 100,
    ..TmuPlatformData::new(SocType::Exynos543x)
};

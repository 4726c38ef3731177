// src/bsp/samsung/mod.rs

//! Samsung EXYNOS 系列.

pub mod exynos4210;
pub mod exynos5250;
pub mod exynos5420;
pub mod exynos7420;

use crate::platform_data::{SocType, TmuPlatformData};

/// 该 SoC 第一个 TMU 的物理基地址.
pub const fn tmu_phys_base(soc: SocType) -> usize {
    match soc {
        SocType::Exynos4210 => exynos4210::TMU_PHYS_BASE,
        SocType::Exynos => exynos5250::TMU_PHYS_BASE,
        SocType::Exynos543x => exynos5420::TMU_PHYS_BASES[0],
        SocType::Exynos7420 => exynos7420::TMU_PHYS_BASE,
    }
}

/// 调试串口的物理基地址.
pub const fn uart_phys_base(soc: SocType) -> usize {
    match soc {
        SocType::Exynos4210 => exynos4210::UART2_PHYS_BASE,
        SocType::Exynos => exynos5250::UART2_PHYS_BASE,
        SocType::Exynos543x => exynos5420::UART2_PHYS_BASE,
        SocType::Exynos7420 => exynos7420::UART2_PHYS_BASE,
    }
}

pub fn default_tmu_data(soc: SocType) -> &'static TmuPlatformData {
    match soc {
        SocType::Exynos4210 => &exynos4210::DEFAULT_TMU_DATA,
        SocType::Exynos => &exynos5250::DEFAULT_TMU_DATA,
        SocType::Exynos543x => &exynos5420::DEFAULT_TMU_DATA,
        SocType::Exynos7420 => &exynos7420::DEFAULT_TMU_DATA,
    }
}

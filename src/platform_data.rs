// src/platform_data.rs

//! EXYNOS TMU 的平台数据.
//!
//! 板级初始化代码填好一份 [`TmuPlatformData`] (通常是 `bsp` 里的 `const` 表),
//! 然后只读地交给 TMU 驱动. 各字段的含义:
//!
//! * `threshold`: 产生中断的基础温度, 25 <= threshold <= 125 (摄氏度).
//!   为 0 时 `trigger_levels` 本身就是绝对温度.
//! * `threshold_falling`: 下降中断相对于上升阈值的差值, 0 表示不用下降中断.
//! * `trigger_levels[n]`: 当前温度 > threshold + trigger_levels[n] 时触发第 n 级中断.
//! * `trigger_enable[n]`: 第 n 级中断的使能位 (头文件里的 `trigger_levelN_en`).
//! * `gain`: positive-TC 发生器里放大器的增益, 0 <= gain <= 15.
//! * `reference_voltage`: 同一放大器的参考电压, 0 <= reference_voltage <= 31.
//! * `noise_cancel_mode`: 降噪模式, 000, 100, 101, 110, 111 各是一种模式.
//! * `efuse_value`: 平台给出的熔丝值, 修调信息无效时用它.
//! * `freq_tab` / `freq_tab_count`: 冷却档位表和其中有效的条数.
//! * `size[]`: 各类 trip 点的数量, 下标是 [`TripType`].
//! * `hotplug_out_threshold` / `hotplug_in_threshold`: 热插拔拔出/插回的温度界限.

use core::fmt;

use crate::cpumask::CpuMask;
use crate::error::{Error, Result};

/// 触发级别的个数.
pub const MAX_TRIGGER_LEVELS: usize = 8;
/// 冷却档位表的容量.
pub const MAX_FREQ_TAB: usize = 8;
/// `THERMAL_TRIP_CRITICAL + 1`.
pub const TRIP_TYPE_COUNT: usize = TripType::Critical as usize + 1;

/// 用哪种出厂校准公式处理传感器读数.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationType {
    OnePointTrimming = 0,
    TwoPointTrimming = 1,
    None = 2,
}

impl TryFrom<u32> for CalibrationType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::OnePointTrimming),
            1 => Ok(Self::TwoPointTrimming),
            2 => Ok(Self::None),
            v => Err(Error::InvalidCalibrationType(v)),
        }
    }
}

/// SoC 型号, 驱动据此选择寄存器布局.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocType {
    Exynos4210 = 1,
    /// Exynos4412 / Exynos5250 这一代的通用布局.
    Exynos = 2,
    Exynos543x = 3,
    Exynos7420 = 4,
}

impl SocType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exynos4210 => "exynos4210",
            Self::Exynos => "exynos",
            Self::Exynos543x => "exynos543x",
            Self::Exynos7420 => "exynos7420",
        }
    }
}

impl TryFrom<u32> for SocType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            1 => Ok(Self::Exynos4210),
            2 => Ok(Self::Exynos),
            3 => Ok(Self::Exynos543x),
            4 => Ok(Self::Exynos7420),
            v => Err(Error::InvalidSocType(v)),
        }
    }
}

impl fmt::Display for SocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 内核 `thermal_trip_type`, 用作 `size[]` 的下标.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripType {
    Active = 0,
    Passive = 1,
    Hot = 2,
    Critical = 3,
}

/// 双簇 cpufreq 下第二簇 (cluster0) 的限频.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterClip {
    /// 最高允许频率 (kHz).
    pub freq_clip_max: u32,
    pub mask: CpuMask,
}

/// 一个冷却档位.
///
/// 温度到达 `temp_level` 后, `mask` 里的 CPU 频率被限制到 `freq_clip_max`.
/// 空的 `mask` 表示由驱动决定.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreqClipTable {
    /// 最高允许频率 (kHz).
    pub freq_clip_max: u32,
    pub temp_level: u32,
    pub mask: CpuMask,
    pub cluster0: Option<ClusterClip>,
}

impl FreqClipTable {
    pub const EMPTY: Self = Self::new(0, 0);

    pub const fn new(freq_clip_max: u32, temp_level: u32) -> Self {
        Self {
            freq_clip_max,
            temp_level,
            mask: CpuMask::EMPTY,
            cluster0: None,
        }
    }
}

/// 一组触发级别.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerSet(u8);

impl TriggerSet {
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, level: usize) -> bool {
        level < MAX_TRIGGER_LEVELS && self.0 & (1 << level) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 集合中最高的级别.
    pub fn highest(self) -> Option<usize> {
        self.iter().last()
    }

    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..MAX_TRIGGER_LEVELS).filter(move |&l| self.contains(l))
    }

    fn insert(&mut self, level: usize) {
        self.0 |= 1 << level;
    }
}

/// 热插拔判断的结果.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotplugAction {
    /// 温度到达拔出阈值.
    Out,
    /// 温度回落到插回阈值.
    In,
    Hold,
}

/// 一个 TMU 实例的全部配置.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TmuPlatformData {
    pub threshold: u8,
    pub threshold_falling: u8,
    pub trigger_levels: [u8; MAX_TRIGGER_LEVELS],
    pub trigger_enable: [bool; MAX_TRIGGER_LEVELS],

    pub gain: u8,
    pub reference_voltage: u8,
    pub noise_cancel_mode: u8,
    pub efuse_value: u32,

    pub cal_type: CalibrationType,
    pub soc: SocType,
    pub freq_tab: [FreqClipTable; MAX_FREQ_TAB],
    pub size: [i32; TRIP_TYPE_COUNT],
    pub freq_tab_count: u32,

    pub hotplug_out_threshold: i32,
    pub hotplug_in_threshold: i32,
}

impl TmuPlatformData {
    /// 全零配置, 板级表用 `..TmuPlatformData::new(soc)` 补齐没写的字段.
    pub const fn new(soc: SocType) -> Self {
        Self {
            threshold: 0,
            threshold_falling: 0,
            trigger_levels: [0; MAX_TRIGGER_LEVELS],
            trigger_enable: [false; MAX_TRIGGER_LEVELS],
            gain: 0,
            reference_voltage: 0,
            noise_cancel_mode: 0,
            efuse_value: 0,
            cal_type: CalibrationType::None,
            soc,
            freq_tab: [FreqClipTable::EMPTY; MAX_FREQ_TAB],
            size: [0; TRIP_TYPE_COUNT],
            freq_tab_count: 0,
            hotplug_out_threshold: 0,
            hotplug_in_threshold: 0,
        }
    }

    /// 检查填表代码是否遵守了约定, 返回遇到的第一个违例.
    pub fn validate(&self) -> Result<()> {
        if self.threshold != 0 && !(25..=125).contains(&self.threshold) {
            return Err(Error::ThresholdOutOfRange(self.threshold));
        }
        if self.gain > 15 {
            return Err(Error::GainOutOfRange(self.gain));
        }
        if self.reference_voltage > 31 {
            return Err(Error::ReferenceVoltageOutOfRange(self.reference_voltage));
        }
        if !matches!(self.noise_cancel_mode, 0b000 | 0b100..=0b111) {
            return Err(Error::InvalidNoiseCancelMode(self.noise_cancel_mode));
        }
        if self.freq_tab_count as usize > MAX_FREQ_TAB {
            return Err(Error::FreqTableOverflow(self.freq_tab_count));
        }

        let tiers = self.active_tiers();
        for (index, pair) in tiers.windows(2).enumerate() {
            let (prev, cur) = (&pair[0], &pair[1]);
            if cur.temp_level <= prev.temp_level || cur.freq_clip_max > prev.freq_clip_max {
                return Err(Error::UnorderedCoolingTiers { index: index + 1 });
            }
        }

        if self.hotplug_enabled() && self.hotplug_in_threshold >= self.hotplug_out_threshold {
            return Err(Error::HotplugThresholdsInverted {
                hotplug_out: self.hotplug_out_threshold,
                hotplug_in: self.hotplug_in_threshold,
            });
        }

        Ok(())
    }

    /// 第 `level` 级的触发温度 `threshold + trigger_levels[level]`.
    pub fn trigger_temp(&self, level: usize) -> Option<u32> {
        let offset = *self.trigger_levels.get(level)?;
        Some(u32::from(self.threshold) + u32::from(offset))
    }

    /// 第 `level` 级下降中断的温度.
    pub fn falling_temp(&self, level: usize) -> Option<u32> {
        if self.threshold_falling == 0 {
            return None;
        }
        self.trigger_temp(level)?
            .checked_sub(u32::from(self.threshold_falling))
    }

    pub fn is_trigger_enabled(&self, level: usize) -> bool {
        self.trigger_enable.get(level).copied().unwrap_or(false)
    }

    pub fn enabled_triggers(&self) -> TriggerSet {
        let mut set = TriggerSet::default();
        for level in 0..MAX_TRIGGER_LEVELS {
            if self.trigger_enable[level] {
                set.insert(level);
            }
        }
        set
    }

    /// `current` 摄氏度下会触发的已使能级别.
    pub fn fired_triggers(&self, current: i32) -> TriggerSet {
        let mut set = TriggerSet::default();
        for level in self.enabled_triggers().iter() {
            let fired = self
                .trigger_temp(level)
                .is_some_and(|temp| i64::from(current) > i64::from(temp));
            if fired {
                set.insert(level);
            }
        }
        set
    }

    /// 有效的冷却档位, 超出容量的计数按容量截断.
    pub fn active_tiers(&self) -> &[FreqClipTable] {
        let count = (self.freq_tab_count as usize).min(MAX_FREQ_TAB);
        &self.freq_tab[..count]
    }

    /// `temp` 摄氏度下生效的冷却档位: 已到达的档位里最热的一个.
    pub fn cooling_tier(&self, temp: i32) -> Option<(usize, &FreqClipTable)> {
        self.active_tiers()
            .iter()
            .enumerate()
            .rev()
            .find(|(_, tier)| i64::from(temp) >= i64::from(tier.temp_level))
    }

    fn hotplug_enabled(&self) -> bool {
        self.hotplug_out_threshold != 0 || self.hotplug_in_threshold != 0
    }

    pub fn hotplug_action(&self, temp: i32) -> HotplugAction {
        if !self.hotplug_enabled() {
            HotplugAction::Hold
        } else if temp >= self.hotplug_out_threshold {
            HotplugAction::Out
        } else if temp <= self.hotplug_in_threshold {
            HotplugAction::In
        } else {
            HotplugAction::Hold
        }
    }

    pub fn trip_size(&self, trip: TripType) -> i32 {
        self.size[trip as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::samsung::{exynos4210, exynos5250};

    #[test]
    fn enum_ordinals_match_header() {
        assert_eq!(CalibrationType::OnePointTrimming as u32, 0);
        assert_eq!(CalibrationType::TwoPointTrimming as u32, 1);
        assert_eq!(CalibrationType::None as u32, 2);

        assert_eq!(SocType::Exynos4210 as u32, 1);
        assert_eq!(SocType::Exynos as u32, 2);
        assert_eq!(SocType::Exynos543x as u32, 3);
        assert_eq!(SocType::Exynos7420 as u32, 4);

        assert_eq!(TRIP_TYPE_COUNT, 4);
    }

    #[test]
    fn raw_ordinals_are_checked() {
        assert_eq!(SocType::try_from(3), Ok(SocType::Exynos543x));
        assert_eq!(SocType::try_from(0), Err(Error::InvalidSocType(0)));
        assert_eq!(
            CalibrationType::try_from(1),
            Ok(CalibrationType::TwoPointTrimming)
        );
        assert_eq!(
            CalibrationType::try_from(3),
            Err(Error::InvalidCalibrationType(3))
        );
    }

    #[test]
    fn threshold_range() {
        let mut pdata = exynos4210::DEFAULT_TMU_DATA;
        for threshold in [0, 25, 80, 125] {
            pdata.threshold = threshold;
            assert_eq!(pdata.validate(), Ok(()));
        }
        for threshold in [1, 24, 126, 255] {
            pdata.threshold = threshold;
            assert_eq!(pdata.validate(), Err(Error::ThresholdOutOfRange(threshold)));
        }
    }

    #[test]
    fn analog_front_end_limits() {
        let base = exynos5250::DEFAULT_TMU_DATA;

        let pdata = TmuPlatformData { gain: 16, ..base };
        assert_eq!(pdata.validate(), Err(Error::GainOutOfRange(16)));

        let pdata = TmuPlatformData {
            reference_voltage: 32,
            ..base
        };
        assert_eq!(pdata.validate(), Err(Error::ReferenceVoltageOutOfRange(32)));

        for mode in [0b001, 0b010, 0b011, 0b1000] {
            let pdata = TmuPlatformData {
                noise_cancel_mode: mode,
                ..base
            };
            assert_eq!(pdata.validate(), Err(Error::InvalidNoiseCancelMode(mode)));
        }
        for mode in [0b000, 0b100, 0b111] {
            let pdata = TmuPlatformData {
                noise_cancel_mode: mode,
                ..base
            };
            assert_eq!(pdata.validate(), Ok(()));
        }
    }

    #[test]
    fn freq_table_contract() {
        let mut pdata = exynos4210::DEFAULT_TMU_DATA;
        pdata.freq_tab_count = 9;
        assert_eq!(pdata.validate(), Err(Error::FreqTableOverflow(9)));
        assert_eq!(pdata.active_tiers().len(), MAX_FREQ_TAB);

        let mut pdata = exynos4210::DEFAULT_TMU_DATA;
        pdata.freq_tab[1].temp_level = pdata.freq_tab[0].temp_level;
        assert_eq!(
            pdata.validate(),
            Err(Error::UnorderedCoolingTiers { index: 1 })
        );

        let mut pdata = exynos4210::DEFAULT_TMU_DATA;
        pdata.freq_tab[1].freq_clip_max = pdata.freq_tab[0].freq_clip_max + 1;
        assert_eq!(
            pdata.validate(),
            Err(Error::UnorderedCoolingTiers { index: 1 })
        );
    }

    #[test]
    fn trigger_temperatures_add_threshold() {
        let pdata = exynos4210::DEFAULT_TMU_DATA;
        assert_eq!(pdata.trigger_temp(0), Some(85));
        assert_eq!(pdata.trigger_temp(2), Some(110));
        assert_eq!(pdata.trigger_temp(8), None);
        assert_eq!(pdata.falling_temp(0), None);

        let pdata = exynos5250::DEFAULT_TMU_DATA;
        assert_eq!(pdata.trigger_temp(1), Some(103));
        assert_eq!(pdata.falling_temp(1), Some(93));

        // 第 5 级温度为 0, 减去下降差值会下溢
        assert_eq!(pdata.trigger_temp(5), Some(0));
        assert_eq!(pdata.falling_temp(5), None);
    }

    #[test]
    fn trigger_condition_is_strict() {
        let pdata = exynos4210::DEFAULT_TMU_DATA;
        assert_eq!(pdata.enabled_triggers().bits(), 0b0111);

        assert!(pdata.fired_triggers(85).is_empty());
        assert_eq!(pdata.fired_triggers(86).bits(), 0b0001);
        assert_eq!(pdata.fired_triggers(101).highest(), Some(1));
        assert_eq!(pdata.fired_triggers(-40), TriggerSet::default());

        // 第 3 级没有使能, 再热也不会出现
        let fired = pdata.fired_triggers(200);
        assert_eq!(fired.iter().collect::<Vec<_>>(), [0, 1, 2]);
        assert!(!fired.contains(3));
    }

    #[test]
    fn cooling_tier_picks_hottest_reached() {
        let pdata = exynos4210::DEFAULT_TMU_DATA;
        assert_eq!(pdata.cooling_tier(84), None);
        let (index, tier) = pdata.cooling_tier(85).unwrap();
        assert_eq!((index, tier.freq_clip_max), (0, 800_000));
        let (index, tier) = pdata.cooling_tier(120).unwrap();
        assert_eq!((index, tier.freq_clip_max), (1, 200_000));

        let pdata = TmuPlatformData {
            freq_tab_count: 0,
            ..exynos4210::DEFAULT_TMU_DATA
        };
        assert!(pdata.active_tiers().is_empty());
        assert_eq!(pdata.cooling_tier(200), None);
    }

    #[test]
    fn hotplug_bounds() {
        let mut pdata = exynos5250::DEFAULT_TMU_DATA;
        assert_eq!(pdata.hotplug_action(150), HotplugAction::Hold);

        pdata.hotplug_out_threshold = 95;
        pdata.hotplug_in_threshold = 85;
        assert_eq!(pdata.validate(), Ok(()));
        assert_eq!(pdata.hotplug_action(95), HotplugAction::Out);
        assert_eq!(pdata.hotplug_action(90), HotplugAction::Hold);
        assert_eq!(pdata.hotplug_action(85), HotplugAction::In);

        // 只设置一个阈值也算启用
        let only_out = TmuPlatformData {
            hotplug_out_threshold: 100,
            hotplug_in_threshold: 0,
            ..exynos5250::DEFAULT_TMU_DATA
        };
        assert_eq!(only_out.validate(), Ok(()));
        assert_eq!(only_out.hotplug_action(100), HotplugAction::Out);
        assert_eq!(only_out.hotplug_action(50), HotplugAction::Hold);
        assert_eq!(only_out.hotplug_action(0), HotplugAction::In);

        let only_in = TmuPlatformData {
            hotplug_out_threshold: 0,
            hotplug_in_threshold: 60,
            ..exynos5250::DEFAULT_TMU_DATA
        };
        assert_eq!(
            only_in.validate(),
            Err(Error::HotplugThresholdsInverted {
                hotplug_out: 0,
                hotplug_in: 60
            })
        );

        pdata.hotplug_in_threshold = 95;
        assert_eq!(
            pdata.validate(),
            Err(Error::HotplugThresholdsInverted {
                hotplug_out: 95,
                hotplug_in: 95
            })
        );
    }

    #[test]
    fn trip_sizes_indexed_by_type() {
        let mut pdata = TmuPlatformData::new(SocType::Exynos);
        pdata.size = [0, 3, 0, 1];
        assert_eq!(pdata.trip_size(TripType::Passive), 3);
        assert_eq!(pdata.trip_size(TripType::Critical), 1);
    }
}

// src/error.rs

//! 平台数据校验, 温度校准和驱动初始化共用的错误类型.

use core::fmt;

/// 本 crate 所有可失败操作的错误.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `threshold` 既不是 0, 也不在 25..=125 之内.
    ThresholdOutOfRange(u8),
    /// `gain` 大于 15.
    GainOutOfRange(u8),
    /// `reference_voltage` 大于 31.
    ReferenceVoltageOutOfRange(u8),
    /// `noise_cancel_mode` 不是 000, 100, 101, 110, 111 之一.
    InvalidNoiseCancelMode(u8),
    /// `freq_tab_count` 超过表的容量.
    FreqTableOverflow(u32),
    /// 第 `index` 个冷却档位的温度没有递增, 或者频率上限反而升高.
    UnorderedCoolingTiers { index: usize },
    /// 设置了热插拔阈值, 但 in 不低于 out.
    HotplugThresholdsInverted { hotplug_out: i32, hotplug_in: i32 },
    /// 原始值不是合法的 `calibration_type`.
    InvalidCalibrationType(u32),
    /// 原始值不是合法的 `soc_type`.
    InvalidSocType(u32),
    /// CPU 编号超出 `NR_CPUS`.
    InvalidCpu(u32),
    /// 没有打开 `mp-cpufreq` 却给冷却档位配置了第二簇.
    DualClusterUnsupported,
    /// 传给 `to_raw` 的掩码表不是由同一份平台数据构造的.
    MaskTableMismatch { index: usize },
    /// 该寄存器布局需要非零的基础阈值.
    ThresholdRequired,
    /// 温度超出可转换的 25..=125 范围.
    TemperatureOutOfRange(i32),
    /// 读到的温度码超出该 SoC 的有效范围.
    CodeOutOfRange(u32),
    /// 两点校准时 te1 == te2, 公式无法求值.
    DegenerateTrimming,
    /// 该寄存器布局无法表达这个触发级别.
    UnsupportedTriggerLevel(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThresholdOutOfRange(t) => {
                write!(f, "threshold {t} outside 25..=125")
            }
            Self::GainOutOfRange(g) => write!(f, "gain {g} exceeds 15"),
            Self::ReferenceVoltageOutOfRange(v) => {
                write!(f, "reference voltage {v} exceeds 31")
            }
            Self::InvalidNoiseCancelMode(m) => {
                write!(f, "noise cancel mode {m:#05b} is not a valid mode")
            }
            Self::FreqTableOverflow(n) => {
                write!(f, "freq_tab_count {n} exceeds table capacity")
            }
            Self::UnorderedCoolingTiers { index } => {
                write!(f, "cooling tier {index} is out of order")
            }
            Self::HotplugThresholdsInverted {
                hotplug_out,
                hotplug_in,
            } => write!(
                f,
                "hotplug in threshold {hotplug_in} not below out threshold {hotplug_out}"
            ),
            Self::InvalidCalibrationType(v) => write!(f, "unknown calibration type {v}"),
            Self::InvalidSocType(v) => write!(f, "unknown soc type {v}"),
            Self::InvalidCpu(cpu) => write!(f, "cpu {cpu} out of range"),
            Self::DualClusterUnsupported => {
                write!(f, "cluster0 clip requires the mp-cpufreq feature")
            }
            Self::MaskTableMismatch { index } => {
                write!(f, "mask table does not match cooling tier {index}")
            }
            Self::ThresholdRequired => write!(f, "threshold must be set on this TMU"),
            Self::TemperatureOutOfRange(t) => {
                write!(f, "temperature {t} outside 25..=125")
            }
            Self::CodeOutOfRange(c) => write!(f, "temperature code {c} out of range"),
            Self::DegenerateTrimming => write!(f, "two-point trimming with te1 == te2"),
            Self::UnsupportedTriggerLevel(l) => {
                write!(f, "trigger level {l} not supported by this TMU")
            }
        }
    }
}

/// 本 crate 的 `Result` 别名.
pub type Result<T> = core::result::Result<T, Error>;

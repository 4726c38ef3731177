// src/calibration.rs

//! 温度 ⇄ 温度码转换.
//!
//! TMU 出厂时在 25°C 和 85°C 两个点各测一次, 测得的温度码 (te1, te2)
//! 烧在 TRIMINFO 寄存器里. 修调值无效时退回到平台数据里的 `efuse_value`.

use core::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::platform_data::{CalibrationType, SocType, TmuPlatformData};

const FIRST_POINT_TRIM: i32 = 25;
const SECOND_POINT_TRIM: i32 = 85;
/// 不做修调时温度码和摄氏度之间的固定偏移.
const DEF_CODE_TO_TEMP_OFFSET: i32 = 50;

/// 可以换算的温度范围 (摄氏度).
pub const TEMP_RANGE: RangeInclusive<i32> = 25..=125;
/// Exynos4210 上有效温度码的范围.
const EXYNOS4210_CODE_RANGE: RangeInclusive<u32> = 75..=175;

/// 温度码的位宽: 掩码和 TRIMINFO 中 te2 的移位.
const fn code_lane(soc: SocType) -> (u32, u32) {
    match soc {
        SocType::Exynos7420 => (0x1ff, 9),
        _ => (0xff, 8),
    }
}

/// te1 被认为有效的范围.
const fn efuse_range(soc: SocType) -> RangeInclusive<u32> {
    match soc {
        SocType::Exynos7420 => 15..=100,
        _ => 40..=100,
    }
}

/// 一个 TMU 实例的校准参数.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub cal_type: CalibrationType,
    pub soc: SocType,
    /// 25°C 时的温度码.
    pub temp_error1: u32,
    /// 85°C 时的温度码.
    pub temp_error2: u32,
    /// te1 或 te2 是否来自 `efuse_value`.
    pub efuse_fallback: bool,
}

impl Calibration {
    /// 只用 `efuse_value` 的校准参数, 在读到 TRIMINFO 之前使用.
    pub const fn from_efuse(pdata: &TmuPlatformData) -> Self {
        let (mask, shift) = code_lane(pdata.soc);
        Self {
            cal_type: pdata.cal_type,
            soc: pdata.soc,
            temp_error1: pdata.efuse_value & mask,
            temp_error2: (pdata.efuse_value >> shift) & mask,
            efuse_fallback: true,
        }
    }

    /// 由 TRIMINFO 寄存器的值得到校准参数.
    pub fn from_trim(pdata: &TmuPlatformData, trim_info: u32) -> Self {
        let (mask, shift) = code_lane(pdata.soc);
        let efuse = Self::from_efuse(pdata);

        let mut cal = Self {
            cal_type: pdata.cal_type,
            soc: pdata.soc,
            temp_error1: trim_info & mask,
            temp_error2: (trim_info >> shift) & mask,
            efuse_fallback: false,
        };
        if !efuse_range(pdata.soc).contains(&cal.temp_error1) {
            cal.temp_error1 = efuse.temp_error1;
            cal.efuse_fallback = true;
        }
        if cal.temp_error2 == 0 {
            cal.temp_error2 = efuse.temp_error2;
            cal.efuse_fallback = true;
        }
        cal
    }

    fn errors(&self) -> Result<(i32, i32)> {
        let te1 = self.temp_error1 as i32;
        let te2 = self.temp_error2 as i32;
        if self.cal_type == CalibrationType::TwoPointTrimming && te1 == te2 {
            return Err(Error::DegenerateTrimming);
        }
        Ok((te1, te2))
    }

    /// 摄氏度转换为温度码.
    pub fn temp_to_code(&self, temp: i32) -> Result<u32> {
        if !TEMP_RANGE.contains(&temp) {
            return Err(Error::TemperatureOutOfRange(temp));
        }
        let (te1, te2) = self.errors()?;

        let code = match self.cal_type {
            CalibrationType::TwoPointTrimming => {
                (temp - FIRST_POINT_TRIM) * (te2 - te1) / (SECOND_POINT_TRIM - FIRST_POINT_TRIM)
                    + te1
            }
            CalibrationType::OnePointTrimming => temp + te1 - FIRST_POINT_TRIM,
            CalibrationType::None => temp + DEF_CODE_TO_TEMP_OFFSET,
        };

        let (mask, _) = code_lane(self.soc);
        match u32::try_from(code) {
            Ok(code) if code <= mask => Ok(code),
            _ => Err(Error::TemperatureOutOfRange(temp)),
        }
    }

    /// 温度码转换为摄氏度.
    pub fn code_to_temp(&self, code: u32) -> Result<i32> {
        let (mask, _) = code_lane(self.soc);
        if code > mask
            || (self.soc == SocType::Exynos4210 && !EXYNOS4210_CODE_RANGE.contains(&code))
        {
            return Err(Error::CodeOutOfRange(code));
        }
        let (te1, te2) = self.errors()?;
        let code = code as i32;

        Ok(match self.cal_type {
            CalibrationType::TwoPointTrimming => {
                (code - te1) * (SECOND_POINT_TRIM - FIRST_POINT_TRIM) / (te2 - te1)
                    + FIRST_POINT_TRIM
            }
            CalibrationType::OnePointTrimming => code - te1 + FIRST_POINT_TRIM,
            CalibrationType::None => code - DEF_CODE_TO_TEMP_OFFSET,
        })
    }
}

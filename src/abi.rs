// src/abi.rs

//! 与 C 头文件 `exynos_thermal.h` 逐位兼容的结构体.
//!
//! 字段顺序和宽度都不能改. 头文件里受 `CONFIG_ARM_EXYNOS_MP_CPUFREQ`
//! 控制的成员, 在这里只有打开 `mp-cpufreq` feature 时才存在.
//! 枚举成员按 `unsigned int` 保存, 外面传进来的非法值不会变成非法的 Rust 枚举.

use core::ffi::{c_int, c_uint, c_ulong};
use core::marker::PhantomData;
use core::ptr;

use crate::cpumask::{CpuMask, NR_CPUS};
use crate::error::{Error, Result};
use crate::platform_data::{
    CalibrationType, FreqClipTable, SocType, TmuPlatformData, MAX_FREQ_TAB, MAX_TRIGGER_LEVELS,
    TRIP_TYPE_COUNT,
};

#[cfg(feature = "mp-cpufreq")]
use crate::platform_data::ClusterClip;

/// `BITS_TO_LONGS(NR_CPUS)`.
pub const CPUMASK_LONGS: usize = NR_CPUS.div_ceil(c_ulong::BITS as usize);

/// `struct cpumask`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawCpumask {
    pub bits: [c_ulong; CPUMASK_LONGS],
}

impl From<CpuMask> for RawCpumask {
    fn from(mask: CpuMask) -> Self {
        let mut bits = [0; CPUMASK_LONGS];
        bits[0] = mask.bits() as c_ulong;
        Self { bits }
    }
}

impl From<&RawCpumask> for CpuMask {
    fn from(raw: &RawCpumask) -> Self {
        CpuMask::from_bits(raw.bits[0] as u32)
    }
}

/// `struct freq_clip_table`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawFreqClipTable {
    pub freq_clip_max: c_uint,
    #[cfg(feature = "mp-cpufreq")]
    pub freq_clip_max_cluster0: c_uint,
    pub temp_level: c_uint,
    pub mask_val: *const RawCpumask,
    #[cfg(feature = "mp-cpufreq")]
    pub mask_val_cluster0: *const RawCpumask,
}

impl RawFreqClipTable {
    const ZEROED: Self = Self {
        freq_clip_max: 0,
        #[cfg(feature = "mp-cpufreq")]
        freq_clip_max_cluster0: 0,
        temp_level: 0,
        mask_val: ptr::null(),
        #[cfg(feature = "mp-cpufreq")]
        mask_val_cluster0: ptr::null(),
    };
}

/// `struct exynos_tmu_platform_data`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawTmuPlatformData {
    pub threshold: u8,
    pub threshold_falling: u8,
    pub trigger_levels: [u8; MAX_TRIGGER_LEVELS],
    pub trigger_level0_en: bool,
    pub trigger_level1_en: bool,
    pub trigger_level2_en: bool,
    pub trigger_level3_en: bool,
    pub trigger_level4_en: bool,
    pub trigger_level5_en: bool,
    pub trigger_level6_en: bool,
    pub trigger_level7_en: bool,

    pub gain: u8,
    pub reference_voltage: u8,
    pub noise_cancel_mode: u8,
    pub efuse_value: u32,

    pub cal_type: c_uint,
    pub type_: c_uint,
    pub freq_tab: [RawFreqClipTable; MAX_FREQ_TAB],
    pub size: [c_int; TRIP_TYPE_COUNT],
    pub freq_tab_count: c_uint,

    pub hotplug_out_threshold: c_int,
    pub hotplug_in_threshold: c_int,
}

impl RawTmuPlatformData {
    fn trigger_enable(&self) -> [bool; MAX_TRIGGER_LEVELS] {
        [
            self.trigger_level0_en,
            self.trigger_level1_en,
            self.trigger_level2_en,
            self.trigger_level3_en,
            self.trigger_level4_en,
            self.trigger_level5_en,
            self.trigger_level6_en,
            self.trigger_level7_en,
        ]
    }
}

/// C 结构体里 `mask_val` 指针指向的存储.
///
/// 只能由 [`RawMaskTable::new`] 从同一份 [`TmuPlatformData`] 构造,
/// 然后借给 [`TmuPlatformData::to_raw`].
#[derive(Debug, Clone)]
pub struct RawMaskTable {
    masks: [RawCpumask; MAX_FREQ_TAB],
    #[cfg_attr(not(feature = "mp-cpufreq"), allow(dead_code))]
    cluster0: [RawCpumask; MAX_FREQ_TAB],
}

impl RawMaskTable {
    pub fn new(pdata: &TmuPlatformData) -> Self {
        let mut table = Self {
            masks: [RawCpumask::default(); MAX_FREQ_TAB],
            cluster0: [RawCpumask::default(); MAX_FREQ_TAB],
        };
        for (i, tier) in pdata.freq_tab.iter().enumerate() {
            table.masks[i] = tier.mask.into();
            if let Some(clip) = tier.cluster0 {
                table.cluster0[i] = clip.mask.into();
            }
        }
        table
    }
}

/// 借用 [`RawMaskTable`] 的 C 结构体映像.
#[derive(Debug)]
pub struct RawView<'a> {
    raw: RawTmuPlatformData,
    _masks: PhantomData<&'a RawMaskTable>,
}

impl RawView<'_> {
    pub fn as_raw(&self) -> &RawTmuPlatformData {
        &self.raw
    }

    /// 交给 C 代码的指针, 在 `self` 存活期间有效.
    pub fn as_ptr(&self) -> *const RawTmuPlatformData {
        &self.raw
    }
}

fn mask_ptr(mask: CpuMask, storage: &RawCpumask) -> *const RawCpumask {
    if mask.empty() {
        ptr::null()
    } else {
        storage
    }
}

/// 空指针表示没有指定 CPU.
///
/// # Safety
///
/// `ptr` 为空或指向有效的 `RawCpumask`.
unsafe fn mask_from_ptr(ptr: *const RawCpumask) -> CpuMask {
    // SAFETY: 由调用者保证.
    unsafe { ptr.as_ref() }.map_or(CpuMask::EMPTY, CpuMask::from)
}

impl TmuPlatformData {
    /// 生成 C 结构体映像, 其中的 CPU 掩码指针指向 `masks`.
    ///
    /// `masks` 里的内容和本结构体的掩码不一致时返回
    /// [`Error::MaskTableMismatch`].
    pub fn to_raw<'a>(&self, masks: &'a RawMaskTable) -> Result<RawView<'a>> {
        let mut freq_tab = [RawFreqClipTable::ZEROED; MAX_FREQ_TAB];
        for (i, (tier, raw)) in self.freq_tab.iter().zip(freq_tab.iter_mut()).enumerate() {
            raw.freq_clip_max = tier.freq_clip_max;
            raw.temp_level = tier.temp_level;
            if masks.masks[i] != RawCpumask::from(tier.mask) {
                return Err(Error::MaskTableMismatch { index: i });
            }
            raw.mask_val = mask_ptr(tier.mask, &masks.masks[i]);

            #[cfg(feature = "mp-cpufreq")]
            if let Some(clip) = tier.cluster0 {
                if masks.cluster0[i] != RawCpumask::from(clip.mask) {
                    return Err(Error::MaskTableMismatch { index: i });
                }
                raw.freq_clip_max_cluster0 = clip.freq_clip_max;
                raw.mask_val_cluster0 = mask_ptr(clip.mask, &masks.cluster0[i]);
            }
            #[cfg(not(feature = "mp-cpufreq"))]
            if tier.cluster0.is_some() {
                return Err(Error::DualClusterUnsupported);
            }
        }

        let en = self.trigger_enable;
        let raw = RawTmuPlatformData {
            threshold: self.threshold,
            threshold_falling: self.threshold_falling,
            trigger_levels: self.trigger_levels,
            trigger_level0_en: en[0],
            trigger_level1_en: en[1],
            trigger_level2_en: en[2],
            trigger_level3_en: en[3],
            trigger_level4_en: en[4],
            trigger_level5_en: en[5],
            trigger_level6_en: en[6],
            trigger_level7_en: en[7],
            gain: self.gain,
            reference_voltage: self.reference_voltage,
            noise_cancel_mode: self.noise_cancel_mode,
            efuse_value: self.efuse_value,
            cal_type: self.cal_type as c_uint,
            type_: self.soc as c_uint,
            freq_tab,
            size: self.size,
            freq_tab_count: self.freq_tab_count,
            hotplug_out_threshold: self.hotplug_out_threshold,
            hotplug_in_threshold: self.hotplug_in_threshold,
        };

        Ok(RawView {
            raw,
            _masks: PhantomData,
        })
    }

    /// 从 C 结构体读出平台数据.
    ///
    /// # Safety
    ///
    /// `raw` 中每个非空的掩码指针都必须指向有效的 `RawCpumask`.
    ///
    /// 空的 `mask_val` 读成空掩码. 打开 `mp-cpufreq` 时, 频率为 0 且掩码指针为空的
    /// 第二簇读成 `None`, 因此 `Some(ClusterClip { freq_clip_max: 0, mask: EMPTY })`
    /// 经过 `to_raw` 再读回来会变成 `None`.
    pub unsafe fn from_raw(raw: &RawTmuPlatformData) -> Result<Self> {
        let cal_type = CalibrationType::try_from(raw.cal_type)?;
        let soc = SocType::try_from(raw.type_)?;

        let mut freq_tab = [FreqClipTable::EMPTY; MAX_FREQ_TAB];
        for (tier, raw_tier) in freq_tab.iter_mut().zip(raw.freq_tab.iter()) {
            tier.freq_clip_max = raw_tier.freq_clip_max;
            tier.temp_level = raw_tier.temp_level;
            // SAFETY: 由调用者保证.
            tier.mask = unsafe { mask_from_ptr(raw_tier.mask_val) };

            #[cfg(feature = "mp-cpufreq")]
            if raw_tier.freq_clip_max_cluster0 != 0 || !raw_tier.mask_val_cluster0.is_null() {
                tier.cluster0 = Some(ClusterClip {
                    freq_clip_max: raw_tier.freq_clip_max_cluster0,
                    // SAFETY: 由调用者保证.
                    mask: unsafe { mask_from_ptr(raw_tier.mask_val_cluster0) },
                });
            }
        }

        Ok(Self {
            threshold: raw.threshold,
            threshold_falling: raw.threshold_falling,
            trigger_levels: raw.trigger_levels,
            trigger_enable: raw.trigger_enable(),
            gain: raw.gain,
            reference_voltage: raw.reference_voltage,
            noise_cancel_mode: raw.noise_cancel_mode,
            efuse_value: raw.efuse_value,
            cal_type,
            soc,
            freq_tab,
            size: raw.size,
            freq_tab_count: raw.freq_tab_count,
            hotplug_out_threshold: raw.hotplug_out_threshold,
            hotplug_in_threshold: raw.hotplug_in_threshold,
        })
    }
}

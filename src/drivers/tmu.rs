// src/drivers/tmu.rs

//! Samsung EXYNOS TMU (温度管理单元) 驱动.
//!
//! 只负责按平台数据设置阈值和读取温度, 中断处理和冷却策略不在这里.

use core::ptr::{read_volatile, write_volatile};

use super::io_barrier;
use crate::calibration::Calibration;
use crate::error::{Error, Result};
use crate::platform_data::{SocType, TmuPlatformData};

// 各代共用的寄存器偏移量
const TMU_TRIMINFO: usize = 0x00;
const TMU_TRIMINFO_CON: usize = 0x14;
const TMU_CONTROL: usize = 0x20;
const TMU_CURRENT_TEMP: usize = 0x40;
const TMU_INTEN: usize = 0x70;
const TMU_INTCLEAR: usize = 0x78;

// Exynos4210
const EXYNOS4210_THRESHOLD_TEMP: usize = 0x44;
const EXYNOS4210_TRIG_LEVEL0: usize = 0x50;
const EXYNOS4210_INTCLEAR_VAL: u32 = 0x1111;

// Exynos4412 / Exynos5250 / Exynos543x
const EXYNOS_THD_TEMP_RISE: usize = 0x50;
const EXYNOS_THD_TEMP_FALL: usize = 0x54;
const EXYNOS_TRIMINFO_RELOAD: u32 = 1 << 0;
const EXYNOS_CLEAR_RISE_INT: u32 = 0x111;
const EXYNOS_CLEAR_FALL_INT: u32 = 0x111 << 16;
const EXYNOS_MUX_ADDR: u32 = 6 << 20;

// Exynos7420
const EXYNOS7_THD_TEMP_RISE7_6: usize = 0x50;
const EXYNOS7_THD_TEMP_FALL7_6: usize = 0x60;
const EXYNOS7_INTEN: usize = 0x110;
const EXYNOS7_INTPEND: usize = 0x118;
const EXYNOS7_PD_DET_EN: u32 = 1 << 23;
const EXYNOS7_CODE_MASK: u32 = 0x1ff;

// `TMU_CONTROL` 寄存器的位定义
const CONTROL_CORE_ON: u32 = 3;
const CONTROL_CORE_OFF: u32 = 2;
const CONTROL_GAIN_SHIFT: u32 = 8;
const CONTROL_NOISE_CANCEL_SHIFT: u32 = 13;
const CONTROL_REF_VOLTAGE_SHIFT: u32 = 24;

/// 下降中断的使能位在上升中断的基础上左移 16 位.
const INTEN_FALL_SHIFT: u32 = 16;

/// 寄存器布局.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterLayout {
    /// 基础阈值 + 4 个偏移量, 没有下降中断.
    ///
    /// 硬件按基础阈值换算温度码, 所以 `threshold` 不能为 0
    /// (`initialize` 返回 [`Error::ThresholdRequired`]).
    Exynos4210,
    /// 4 个级别的温度码按字节打包进 RISE/FALL 寄存器.
    Exynos,
    /// 8 个 9 位温度码, 每个寄存器放两个级别.
    Exynos7,
}

impl RegisterLayout {
    pub const fn for_soc(soc: SocType) -> Self {
        match soc {
            SocType::Exynos4210 => Self::Exynos4210,
            SocType::Exynos | SocType::Exynos543x => Self::Exynos,
            SocType::Exynos7420 => Self::Exynos7,
        }
    }

    /// 能表达的触发级别数.
    pub const fn trigger_levels(self) -> usize {
        match self {
            Self::Exynos4210 | Self::Exynos => 4,
            Self::Exynos7 => 8,
        }
    }

    const fn code_mask(self) -> u32 {
        match self {
            Self::Exynos7 => EXYNOS7_CODE_MASK,
            _ => 0xff,
        }
    }

    const fn inten(self) -> usize {
        match self {
            Self::Exynos7 => EXYNOS7_INTEN,
            _ => TMU_INTEN,
        }
    }

    const fn inten_shift(self, level: usize) -> u32 {
        match self {
            Self::Exynos7 => level as u32,
            _ => 4 * level as u32,
        }
    }
}

/// 代表一个TMU硬件实例.
pub struct Tmu<'a> {
    base_addr: usize,
    pdata: &'a TmuPlatformData,
    layout: RegisterLayout,
    cal: Calibration,
}

impl<'a> Tmu<'a> {
    /// 创建一个新的TMU实例.
    ///
    /// # Safety
    ///
    /// `base_addr` 必须是有效的TMU控制器物理基地址.
    /// 代码假设使用恒等映射（Identity-mapped）的虚拟地址.
    pub const unsafe fn new(base_addr: usize, pdata: &'a TmuPlatformData) -> Self {
        Self {
            base_addr,
            pdata,
            layout: RegisterLayout::for_soc(pdata.soc),
            cal: Calibration::from_efuse(pdata),
        }
    }

    pub fn layout(&self) -> RegisterLayout {
        self.layout
    }

    /// 当前使用的校准参数, `initialize` 之前只有 efuse 的值.
    pub fn calibration(&self) -> &Calibration {
        &self.cal
    }

    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `new` 的调用者保证基地址有效.
        unsafe { read_volatile((self.base_addr + offset) as *const u32) }
    }

    fn write(&self, offset: usize, value: u32) {
        // SAFETY: 同上.
        unsafe { write_volatile((self.base_addr + offset) as *mut u32, value) }
    }

    fn writeb(&self, offset: usize, value: u8) {
        // SAFETY: 同上.
        unsafe { write_volatile((self.base_addr + offset) as *mut u8, value) }
    }

    /// 读取修调信息, 写入所有阈值并清除挂起的中断.
    pub fn initialize(&mut self) -> Result<()> {
        self.setup().inspect_err(|err| {
            crate::pr_err!("{}: initialization failed: {}", self.pdata.soc, err);
        })
    }

    fn setup(&mut self) -> Result<()> {
        let pdata = self.pdata;
        pdata.validate()?;
        if self.layout == RegisterLayout::Exynos4210 && pdata.threshold == 0 {
            return Err(Error::ThresholdRequired);
        }

        let supported = self.layout.trigger_levels();
        if let Some(level) = pdata.enabled_triggers().iter().find(|&l| l >= supported) {
            return Err(Error::UnsupportedTriggerLevel(level));
        }

        if self.layout == RegisterLayout::Exynos {
            self.write(TMU_TRIMINFO_CON, EXYNOS_TRIMINFO_RELOAD);
            io_barrier();
        }
        let trim_info = self.read(TMU_TRIMINFO);
        self.cal = Calibration::from_trim(pdata, trim_info);
        if self.cal.efuse_fallback {
            crate::pr_warn!(
                "{}: trim info {:#x} invalid, using efuse value {:#x}",
                pdata.soc,
                trim_info,
                pdata.efuse_value
            );
        }

        match self.layout {
            RegisterLayout::Exynos4210 => self.write_exynos4210_thresholds()?,
            RegisterLayout::Exynos => self.write_exynos_thresholds()?,
            RegisterLayout::Exynos7 => self.write_exynos7_thresholds()?,
        }
        io_barrier();

        crate::pr_info!(
            "{}: te1={} te2={} cal={:?}",
            pdata.soc,
            self.cal.temp_error1,
            self.cal.temp_error2,
            self.cal.cal_type
        );
        Ok(())
    }

    /// 第 `level` 级的上升和下降温度码.
    fn level_codes(&self, level: usize) -> Result<(u32, Option<u32>)> {
        let rise = self
            .pdata
            .trigger_temp(level)
            .ok_or(Error::UnsupportedTriggerLevel(level))?;
        let rise = self.cal.temp_to_code(rise as i32)?;
        let fall = match self.pdata.falling_temp(level) {
            Some(temp) => Some(self.cal.temp_to_code(temp as i32)?),
            None => None,
        };
        Ok((rise, fall))
    }

    fn write_exynos4210_thresholds(&self) -> Result<()> {
        // 硬件自己把偏移量加到基础阈值上
        let code = self.cal.temp_to_code(i32::from(self.pdata.threshold))?;
        self.writeb(EXYNOS4210_THRESHOLD_TEMP, code as u8);
        for level in 0..RegisterLayout::Exynos4210.trigger_levels() {
            self.writeb(
                EXYNOS4210_TRIG_LEVEL0 + level * 4,
                self.pdata.trigger_levels[level],
            );
        }
        self.write(TMU_INTCLEAR, EXYNOS4210_INTCLEAR_VAL);
        Ok(())
    }

    fn write_exynos_thresholds(&self) -> Result<()> {
        let mut rising = 0;
        let mut falling = 0;
        for level in self.pdata.enabled_triggers().iter() {
            let (rise, fall) = self.level_codes(level)?;
            rising |= rise << (8 * level);
            if let Some(fall) = fall {
                falling |= fall << (8 * level);
            }
        }
        self.write(EXYNOS_THD_TEMP_RISE, rising);
        self.write(EXYNOS_THD_TEMP_FALL, falling);
        self.write(TMU_INTCLEAR, EXYNOS_CLEAR_RISE_INT | EXYNOS_CLEAR_FALL_INT);
        Ok(())
    }

    fn write_exynos7_thresholds(&self) -> Result<()> {
        for level in self.pdata.enabled_triggers().iter() {
            let (rise, fall) = self.level_codes(level)?;
            // RISE7_6 放 7 和 6 级, 往后依次是 5_4, 3_2, 1_0; 奇数级在高半字
            let offset = (7 - level) / 2 * 4;
            let shift = (level % 2) as u32 * 16;
            let update = |reg: usize, code: u32| {
                let val = self.read(reg) & !(EXYNOS7_CODE_MASK << shift);
                self.write(reg, val | (code << shift));
            };
            update(EXYNOS7_THD_TEMP_RISE7_6 + offset, rise);
            if let Some(fall) = fall {
                update(EXYNOS7_THD_TEMP_FALL7_6 + offset, fall);
            }
        }
        self.write(EXYNOS7_INTPEND, 0x00ff_00ff);
        Ok(())
    }

    /// 打开或关闭传感器, 同时设置中断使能.
    pub fn control(&self, on: bool) {
        let pdata = self.pdata;
        let mut con = u32::from(pdata.reference_voltage) << CONTROL_REF_VOLTAGE_SHIFT
            | u32::from(pdata.gain) << CONTROL_GAIN_SHIFT;
        match self.layout {
            RegisterLayout::Exynos4210 => {}
            RegisterLayout::Exynos => {
                con |= u32::from(pdata.noise_cancel_mode) << CONTROL_NOISE_CANCEL_SHIFT;
                con |= EXYNOS_MUX_ADDR;
            }
            RegisterLayout::Exynos7 => {
                con |= u32::from(pdata.noise_cancel_mode) << CONTROL_NOISE_CANCEL_SHIFT;
            }
        }

        let inten = if on {
            con |= CONTROL_CORE_ON;
            if self.layout == RegisterLayout::Exynos7 {
                con |= EXYNOS7_PD_DET_EN;
            }
            let mut inten = pdata
                .enabled_triggers()
                .iter()
                .fold(0, |acc, level| acc | 1 << self.layout.inten_shift(level));
            if pdata.threshold_falling != 0 {
                inten |= inten << INTEN_FALL_SHIFT;
            }
            inten
        } else {
            con |= CONTROL_CORE_OFF;
            0
        };

        self.write(self.layout.inten(), inten);
        self.write(TMU_CONTROL, con);
        io_barrier();
    }

    /// 读取当前温度.
    ///
    /// 返回值为摄氏度.
    pub fn read_temperature(&self) -> Result<i32> {
        let code = self.read(TMU_CURRENT_TEMP) & self.layout.code_mask();
        self.cal.code_to_temp(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::samsung::{exynos4210, exynos5250, exynos5420, exynos7420};

    /// 泄漏一块足够大的内存当作寄存器.
    fn fake_regs() -> usize {
        let regs: &'static mut [u32; 0x48] = Box::leak(Box::new([0; 0x48]));
        regs.as_mut_ptr() as usize
    }

    fn reg(base: usize, offset: usize) -> u32 {
        // SAFETY: `base` 来自 `fake_regs`.
        unsafe { read_volatile((base + offset) as *const u32) }
    }

    fn set_reg(base: usize, offset: usize, value: u32) {
        // SAFETY: 同上.
        unsafe { write_volatile((base + offset) as *mut u32, value) }
    }

    #[test]
    fn layout_follows_soc() {
        assert_eq!(
            RegisterLayout::for_soc(SocType::Exynos4210),
            RegisterLayout::Exynos4210
        );
        assert_eq!(
            RegisterLayout::for_soc(SocType::Exynos543x),
            RegisterLayout::Exynos
        );
        assert_eq!(
            RegisterLayout::for_soc(SocType::Exynos7420),
            RegisterLayout::Exynos7
        );
    }

    #[test]
    fn exynos4210_threshold_and_offsets() {
        let base = fake_regs();
        set_reg(base, TMU_TRIMINFO, 0x0000_504b);
        let pdata = exynos4210::DEFAULT_TMU_DATA;
        // SAFETY: 假寄存器块.
        let mut tmu = unsafe { Tmu::new(base, &pdata) };
        tmu.initialize().unwrap();

        // 80°C, te1 = 75
        assert_eq!(reg(base, EXYNOS4210_THRESHOLD_TEMP), 130);
        assert_eq!(reg(base, EXYNOS4210_TRIG_LEVEL0), 5);
        assert_eq!(reg(base, EXYNOS4210_TRIG_LEVEL0 + 4), 20);
        assert_eq!(reg(base, EXYNOS4210_TRIG_LEVEL0 + 8), 30);
        assert_eq!(reg(base, EXYNOS4210_TRIG_LEVEL0 + 12), 0);
        assert_eq!(reg(base, TMU_INTCLEAR), 0x1111);

        tmu.control(true);
        assert_eq!(reg(base, TMU_CONTROL), 0x0700_0f03);
        assert_eq!(reg(base, TMU_INTEN), 0x111);

        set_reg(base, TMU_CURRENT_TEMP, 135);
        assert_eq!(tmu.read_temperature(), Ok(85));
        set_reg(base, TMU_CURRENT_TEMP, 20);
        assert_eq!(tmu.read_temperature(), Err(Error::CodeOutOfRange(20)));
    }

    #[test]
    fn exynos_packs_rise_and_fall_codes() {
        let base = fake_regs();
        let pdata = exynos5250::DEFAULT_TMU_DATA;
        // SAFETY: 假寄存器块.
        let mut tmu = unsafe { Tmu::new(base, &pdata) };
        tmu.initialize().unwrap();

        // 修调信息为空, te1 取 efuse 的 55, 温度码 = 温度 + 30
        assert!(tmu.calibration().efuse_fallback);
        assert_eq!(reg(base, TMU_TRIMINFO_CON), EXYNOS_TRIMINFO_RELOAD);
        assert_eq!(reg(base, EXYNOS_THD_TEMP_RISE), 0x008c_8573);
        assert_eq!(reg(base, EXYNOS_THD_TEMP_FALL), 0x0082_7b69);
        assert_eq!(reg(base, TMU_INTCLEAR), 0x0111_0111);

        tmu.control(true);
        assert_eq!(reg(base, TMU_CONTROL), 0x1060_8803);
        assert_eq!(reg(base, TMU_INTEN), 0x0111_0111);

        tmu.control(false);
        assert_eq!(reg(base, TMU_CONTROL), 0x1060_8802);
        assert_eq!(reg(base, TMU_INTEN), 0);

        set_reg(base, TMU_CURRENT_TEMP, 0xab00 | 100);
        assert_eq!(tmu.read_temperature(), Ok(70));
    }

    #[test]
    fn exynos7_uses_half_word_lanes() {
        let base = fake_regs();
        set_reg(base, TMU_TRIMINFO, (200 << 9) | 80);
        let pdata = exynos7420::DEFAULT_TMU_DATA;
        // SAFETY: 假寄存器块.
        let mut tmu = unsafe { Tmu::new(base, &pdata) };
        tmu.initialize().unwrap();
        assert!(!tmu.calibration().efuse_fallback);

        // 温度码 = 温度 + 55
        let code = |level: usize| pdata.trigger_temp(level).unwrap() + 55;
        assert_eq!(
            reg(base, EXYNOS7_THD_TEMP_RISE7_6),
            code(7) << 16 | code(6)
        );
        assert_eq!(
            reg(base, EXYNOS7_THD_TEMP_RISE7_6 + 12),
            code(1) << 16 | code(0)
        );
        let fall0 = pdata.falling_temp(0).unwrap() + 55;
        assert_eq!(reg(base, EXYNOS7_THD_TEMP_FALL7_6 + 12) & 0x1ff, fall0);
        assert_eq!(reg(base, EXYNOS7_INTPEND), 0x00ff_00ff);

        tmu.control(true);
        assert_eq!(reg(base, EXYNOS7_INTEN), 0x00ff_00ff);
        let con = reg(base, TMU_CONTROL);
        assert_eq!(con & 0x3, CONTROL_CORE_ON);
        assert_ne!(con & EXYNOS7_PD_DET_EN, 0);

        set_reg(base, TMU_CURRENT_TEMP, 0x1000 | 135);
        assert_eq!(tmu.read_temperature(), Ok(80));
    }

    #[test]
    fn rejects_levels_the_layout_cannot_express() {
        let base = fake_regs();
        let mut pdata = exynos5420::DEFAULT_TMU_DATA;
        pdata.trigger_enable[5] = true;
        // SAFETY: 假寄存器块.
        let mut tmu = unsafe { Tmu::new(base, &pdata) };
        assert_eq!(tmu.initialize(), Err(Error::UnsupportedTriggerLevel(5)));
    }

    #[test]
    fn exynos4210_needs_a_base_threshold() {
        let base = fake_regs();
        set_reg(base, TMU_TRIMINFO, 0x0000_504b);
        let pdata = TmuPlatformData {
            threshold: 0,
            ..exynos4210::DEFAULT_TMU_DATA
        };
        assert_eq!(pdata.validate(), Ok(()));
        // SAFETY: 假寄存器块.
        let mut tmu = unsafe { Tmu::new(base, &pdata) };
        assert_eq!(tmu.initialize(), Err(Error::ThresholdRequired));
        assert_eq!(reg(base, EXYNOS4210_THRESHOLD_TEMP), 0);
    }

    #[test]
    fn rejects_invalid_platform_data() {
        let base = fake_regs();
        let pdata = TmuPlatformData {
            gain: 16,
            ..exynos5250::DEFAULT_TMU_DATA
        };
        // SAFETY: 假寄存器块.
        let mut tmu = unsafe { Tmu::new(base, &pdata) };
        assert_eq!(tmu.initialize(), Err(Error::GainOutOfRange(16)));
        // 什么都没写
        assert_eq!(reg(base, TMU_TRIMINFO_CON), 0);
    }
}

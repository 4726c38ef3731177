// src/cpumask.rs

//! CPU 位图.
//!
//! 头文件里冷却档位用 `const struct cpumask *` 指明被限频的 CPU,
//! 这里换成按值保存的位图.

use crate::error::{Error, Result};

/// 系统支持的最大 CPU 数 (Exynos 最多两簇共 8 核).
pub const NR_CPUS: usize = 8;

const FULL_BITS: u32 = (1 << NR_CPUS) - 1;

/// 已检查过的 CPU 编号, 保证小于 [`NR_CPUS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CpuId(u32);

impl CpuId {
    /// 检查 `id` 并构造 `CpuId`.
    pub const fn new(id: u32) -> Result<Self> {
        if (id as usize) < NR_CPUS {
            Ok(Self(id))
        } else {
            Err(Error::InvalidCpu(id))
        }
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// 一组 CPU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuMask(u32);

impl CpuMask {
    pub const EMPTY: Self = Self(0);
    pub const ALL: Self = Self(FULL_BITS);

    /// 由原始位构造, 超出 [`NR_CPUS`] 的位被丢弃.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & FULL_BITS)
    }

    /// `first..=last` 的连续 CPU, 用来描述一个簇.
    pub const fn range(first: u32, last: u32) -> Self {
        if first > last || first as usize >= NR_CPUS {
            return Self::EMPTY;
        }
        let upper = if last as usize >= NR_CPUS {
            FULL_BITS
        } else {
            (1 << (last + 1)) - 1
        };
        Self(upper & !((1 << first) - 1))
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn set(&mut self, cpu: CpuId) {
        self.0 |= 1 << cpu.0;
    }

    pub fn clear(&mut self, cpu: CpuId) {
        self.0 &= !(1 << cpu.0);
    }

    pub const fn test(self, cpu: CpuId) -> bool {
        self.0 & (1 << cpu.0) != 0
    }

    /// 位图里 CPU 的个数.
    pub const fn weight(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn empty(self) -> bool {
        self.0 == 0
    }

    pub const fn full(self) -> bool {
        self.0 == FULL_BITS
    }

    /// 按编号升序遍历位图里的 CPU.
    pub fn iter(self) -> impl Iterator<Item = CpuId> {
        (0..NR_CPUS as u32)
            .filter(move |cpu| self.0 & (1 << cpu) != 0)
            .map(CpuId)
    }
}

// src/drivers/mod.rs

pub mod tmu;
pub mod uart;

/// 轮询寄存器时的空转.
#[inline(always)]
fn spin() {
    #[cfg(target_arch = "aarch64")]
    aarch64_cpu::asm::nop();
    #[cfg(not(target_arch = "aarch64"))]
    core::hint::spin_loop();
}

/// MMIO 写之后的同步, 保证写操作在继续之前到达设备.
#[inline(always)]
fn io_barrier() {
    #[cfg(target_arch = "aarch64")]
    aarch64_cpu::asm::barrier::dsb(aarch64_cpu::asm::barrier::SY);
}

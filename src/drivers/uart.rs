// src/drivers/uart.rs

//! 一个极简的、基于轮询的 Samsung (S3C/Exynos) 串口驱动, 用作日志输出.

use core::fmt::{self, Write};
use core::ptr::{read_volatile, write_volatile};
use core::sync::atomic::{AtomicUsize, Ordering};

// UART寄存器偏移量
const UTRSTAT: usize = 0x10; // Tx/Rx Status Register
const UTXH: usize = 0x20; // Transmit Buffer Register

// UTRSTAT位定义
const UTRSTAT_TX_BUFFER_EMPTY: u32 = 1 << 1;

/// 一个 UART 实例.
pub struct Uart {
    base_address: usize,
}

impl Uart {
    /// # Safety
    ///
    /// `base_address` 必须是有效的 UART 基地址 (恒等映射).
    pub const unsafe fn new(base_address: usize) -> Self {
        Self { base_address }
    }

    fn putc(&mut self, c: u8) {
        let utrstat = (self.base_address + UTRSTAT) as *const u32;
        let utxh = (self.base_address + UTXH) as *mut u8;

        // 等待发送缓冲为空
        // SAFETY: `new` 的调用者保证地址有效.
        while unsafe { read_volatile(utrstat) } & UTRSTAT_TX_BUFFER_EMPTY == 0 {
            super::spin();
        }
        // SAFETY: 同上.
        unsafe { write_volatile(utxh, c) }
    }
}

impl Write for Uart {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            // 将换行符 \n 转换为 \r\n
            if byte == b'\n' {
                self.putc(b'\r');
            }
            self.putc(byte);
        }
        Ok(())
    }
}

// 日志串口的基地址, 0 表示还没初始化, 输出直接丢弃
static CONSOLE_BASE: AtomicUsize = AtomicUsize::new(0);

/// 初始化日志串口.
///
/// # Safety
///
/// 调用者必须确保传入的 base_address 是有效的 UART 基地址.
pub unsafe fn init(base_address: usize) {
    CONSOLE_BASE.store(base_address, Ordering::Relaxed);
}

// Rust的格式化宏需要这些辅助函数和宏定义

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    let base = CONSOLE_BASE.load(Ordering::Relaxed);
    if base == 0 {
        return;
    }
    // SAFETY: `init` 的调用者保证地址有效.
    let mut uart = unsafe { Uart::new(base) };
    // 串口写不会失败
    let _ = uart.write_fmt(args);
}

/// 打印到串口
#[macro_export]
macro_rules! kprint {
    ($($arg:tt)*) => ($crate::drivers::uart::_print(format_args!($($arg)*)));
}

/// 打印到串口并换行
#[macro_export]
macro_rules! kprintln {
    () => ($crate::kprint!("\n"));
    ($($arg:tt)*) => ($crate::kprint!("{}\n", format_args!($($arg)*)));
}

/// 带级别和驱动名前缀的日志.
#[macro_export]
macro_rules! pr_info {
    ($($arg:tt)*) => ($crate::kprintln!("[info] exynos-tmu: {}", format_args!($($arg)*)));
}

#[macro_export]
macro_rules! pr_warn {
    ($($arg:tt)*) => ($crate::kprintln!("[warn] exynos-tmu: {}", format_args!($($arg)*)));
}

#[macro_export]
macro_rules! pr_err {
    ($($arg:tt)*) => ($crate::kprintln!("[err] exynos-tmu: {}", format_args!($($arg)*)));
}

//! # 进度报告模块
//!
//! 核心操作不直接打印，而是通过调用方注入的 [`Reporter`] 汇报进度，
//! 这样 `--quiet`、测试与正常输出可以共用同一套逻辑。

use colored::Colorize;
use std::fmt;

/// 接收进度信息的报告器。
pub trait Reporter {
    /// 普通的进度步骤。
    fn step(&self, message: fmt::Arguments<'_>);

    /// 操作成功完成。
    fn success(&self, message: fmt::Arguments<'_>);
}

/// 在终端打印带颜色前缀的进度信息。
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

impl Reporter for Console {
    fn step(&self, message: fmt::Arguments<'_>) {
        println!("{} {}", "[*]".cyan(), message);
    }

    fn success(&self, message: fmt::Arguments<'_>) {
        println!("{} {}", "[+]".green().bold(), message);
    }
}

/// 丢弃所有进度信息。
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Reporter for Silent {
    fn step(&self, _message: fmt::Arguments<'_>) {}

    fn success(&self, _message: fmt::Arguments<'_>) {}
}

/// 根据 `--quiet` 选择报告器。
pub fn for_quiet(quiet: bool) -> &'static dyn Reporter {
    if quiet { &Silent } else { &Console }
}

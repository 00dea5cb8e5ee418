//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{Args, Parser};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在未压缩的 WAV 音频中隐藏或提取图像。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在未压缩的 WAV 音频中隐藏或提取图像。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在 WAV 音频中隐藏一幅图像。
    Hide(HideArgs),

    /// 从经过隐写的 WAV 音频中提取图像。
    Extract(ExtractArgs),

    /// 查看 WAV 音频可以隐藏多少数据。
    Capacity(CapacityArgs),

    /// 缩小图像，使其能够放入给定的容量。
    Resize(ResizeArgs),

    /// 逐像素比较两幅图像。
    Compare(CompareArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 作为载体的输入 WAV 文件。
    pub audio: PathBuf,

    /// 要隐藏的图像文件。
    pub image: PathBuf,

    /// 隐写完成后输出的 WAV 文件。
    pub output: PathBuf,

    /// 图像过大时自动缩小。
    #[arg(short = 'r', long)]
    pub auto_resize: bool,

    /// 不输出进度信息。
    #[arg(short, long)]
    pub quiet: bool,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'extract' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// 含有隐藏图像的 WAV 文件。
    pub audio: PathBuf,

    /// 提取出的图像的保存路径。
    pub output: PathBuf,

    /// 不输出进度信息。
    #[arg(short, long)]
    pub quiet: bool,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要分析的 WAV 文件。
    pub audio: PathBuf,
}

/// 'resize' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ResizeArgs {
    /// 输入图像。
    pub image: PathBuf,

    /// 缩放后图像的保存路径。
    pub output: PathBuf,

    #[command(flatten)]
    pub budget: Budget,

    /// 不输出进度信息。
    #[arg(short, long)]
    pub quiet: bool,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 字节预算的来源：WAV 文件或直接给定的字节数，二者必选其一。
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Budget {
    /// 根据该 WAV 文件的容量确定预算。
    #[arg(short, long)]
    pub audio: Option<PathBuf>,

    /// 最大字节数 (含 12 字节头部)。
    #[arg(short = 'b', long)]
    pub max_bytes: Option<usize>,
}

/// 'compare' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// 第一幅图像。
    pub image1: PathBuf,

    /// 第二幅图像。
    pub image2: PathBuf,
}

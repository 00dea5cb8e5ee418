//! # 命令处理逻辑模块
//!
//! 包含处理各个子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::audio::Carrier;
use crate::cli::{CapacityArgs, CompareArgs, ExtractArgs, HideArgs, ResizeArgs};
use crate::codec::{HideOptions, extract_image, hide_image};
use crate::comparator::compare;
use crate::fitter::{FitOptions, fit};
use crate::pixels::{LanczosResampler, load_image, save_image};
use crate::report::{self, Console, Reporter};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use tracing::info;

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取 WAV 与图像文件、检查容量 (必要时自动缩放)、把图像嵌入样本，
/// 最后以相同的音频规格写出目标 WAV 文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与选项的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出文件已存在且未指定 `--force`。
/// * 无法读取输入的 WAV 或图像文件。
/// * 音频没有足够的空间来隐藏图像 (且未指定 `--auto-resize`)。
/// * 无法写入到目标 WAV 文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    ensure_writable(&args.output, args.force)?;
    let reporter = report::for_quiet(args.quiet);

    let carrier = open_carrier(&args.audio, reporter)?;

    reporter.step(format_args!("Opening image: {}", args.image.display()));
    let image = load_image(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let options = HideOptions {
        auto_resize: args.auto_resize,
        fit: FitOptions::default(),
    };
    let outcome = hide_image(carrier.samples(), image, &options, &LanczosResampler, reporter)
        .with_context(|| {
            format!(
                "Failed to hide {} in {}. \nTry resizing the image manually or pass --auto-resize.",
                args.image.to_string_lossy().red().bold(),
                args.audio.to_string_lossy().red().bold()
            )
        })?;

    reporter.step(format_args!("Writing output file: {}", args.output.display()));
    let capacity_usage = outcome.capacity_usage;
    carrier
        .with_samples(outcome.samples)
        .and_then(|stego| stego.save(&args.output))
        .with_context(|| {
            format!(
                "Unable to write to target WAV file: {}",
                args.output.to_string_lossy().red().bold()
            )
        })?;

    info!(
        output = %args.output.display(),
        width = outcome.width,
        height = outcome.height,
        resized = outcome.resized,
        "image hidden"
    );
    reporter.success(format_args!(
        "Image successfully hidden and saved: {}",
        args.output.to_string_lossy().green().bold()
    ));
    if !args.quiet {
        println!(
            "\n{} Capacity used: {}",
            "Success!".green().bold(),
            format!("{capacity_usage:.2}%").green().bold()
        );
    }

    Ok(())
}

/// 处理 'Extract' 命令的执行逻辑。
///
/// 先读取 96 个样本中的头部，再按头部声明的长度读取图像数据，
/// 最后按输出路径的扩展名保存图像。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出文件已存在且未指定 `--force`。
/// * 无法读取输入的 WAV 文件。
/// * 音频中没有有效的隐藏图像。
/// * 无法写入到目标图像文件。
pub fn handle_extract(args: ExtractArgs) -> Result<()> {
    ensure_writable(&args.output, args.force)?;
    let reporter = report::for_quiet(args.quiet);

    let carrier = open_carrier(&args.audio, reporter)?;

    let image = extract_image(carrier.samples(), reporter).with_context(|| {
        format!(
            "Failed to extract an image from '{}'. \nThe audio may not contain a hidden image or is corrupted.",
            args.audio.to_string_lossy().red().bold()
        )
    })?;

    reporter.step(format_args!(
        "Saving extracted image to: {}",
        args.output.display()
    ));
    save_image(&image, &args.output).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            args.output.to_string_lossy().red().bold()
        )
    })?;

    info!(output = %args.output.display(), width = image.width(), height = image.height(), "image extracted");
    reporter.success(format_args!(
        "Image successfully extracted and saved: {}",
        args.output.to_string_lossy().green().bold()
    ));
    if !args.quiet {
        println!(
            "\n{} Extracted {}x{} image",
            "Success!".green().bold(),
            image.width(),
            image.height()
        );
    }

    Ok(())
}

/// 处理 'Capacity' 命令：打印音频规格与可隐藏的字节数。
///
/// # Errors
///
/// 无法读取或解析 WAV 文件时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let carrier = Carrier::open(&args.audio).with_context(|| {
        format!(
            "Unable to read WAV file: {}",
            args.audio.to_string_lossy().red().bold()
        )
    })?;
    let info = carrier.info();
    let capacity_kb = info.payload_capacity_bytes as f64 / 1024.0;
    let rule = "=".repeat(70);

    println!("\n{rule}");
    println!(
        "Audio Capacity Information: {}",
        args.audio.to_string_lossy().bold()
    );
    println!("{rule}");
    println!("Duration:      {:.2} seconds", info.duration_seconds);
    println!("Sample Rate:   {} Hz", info.sample_rate);
    println!("Channels:      {}", info.channels);
    println!("Sample Width:  {} bytes", info.sample_width);
    println!("Total Samples: {}", info.samples);
    println!("\nSteganography Capacity:");
    println!(
        "  {} bytes",
        info.payload_capacity_bytes.to_string().green().bold()
    );
    println!("  {capacity_kb:.2} KB");
    println!("  {:.2} MB", capacity_kb / 1024.0);
    println!("{rule}\n");

    Ok(())
}

/// 处理 'Resize' 命令的执行逻辑。
///
/// 字节预算来自 `--max-bytes`，或者由 `--audio` 指定的 WAV 文件换算得到。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出文件已存在且未指定 `--force`。
/// * 无法读取输入文件。
/// * 任何尺寸都无法满足预算。
/// * 无法写入到目标图像文件。
pub fn handle_resize(args: ResizeArgs) -> Result<()> {
    ensure_writable(&args.output, args.force)?;
    let reporter = report::for_quiet(args.quiet);

    let max_bytes = match (&args.budget.audio, args.budget.max_bytes) {
        (Some(audio), _) => {
            let info = open_carrier(audio, reporter)?.info();
            reporter.step(format_args!(
                "WAV file capacity: {} bytes ({:.1} KB)",
                info.capacity_bytes,
                info.capacity_bytes as f64 / 1024.0
            ));
            info.capacity_bytes
        }
        (None, Some(max_bytes)) => max_bytes,
        (None, None) => anyhow::bail!("Either --audio or --max-bytes must be provided"),
    };

    reporter.step(format_args!("Opening image: {}", args.image.display()));
    let image = load_image(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let fitted = fit(
        image,
        max_bytes,
        FitOptions::default(),
        &LanczosResampler,
        reporter,
    )
    .with_context(|| {
        format!(
            "Unable to fit {} into {} bytes.",
            args.image.to_string_lossy().red().bold(),
            max_bytes.to_string().red().bold()
        )
    })?;

    save_image(&fitted.pixels, &args.output).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            args.output.to_string_lossy().red().bold()
        )
    })?;

    if fitted.resized {
        reporter.step(format_args!(
            "Size reduction: {:.1}% ({} -> {} bytes)",
            fitted.reduction_percent(),
            fitted.original_bytes(),
            fitted.final_bytes()
        ));
    }
    reporter.success(format_args!(
        "Image saved: {}",
        args.output.to_string_lossy().green().bold()
    ));
    if !args.quiet {
        let (width, height) = fitted.pixels.dimensions();
        if fitted.resized {
            println!(
                "\n{} Resized from {}x{} to {}x{}",
                "Success!".green().bold(),
                fitted.original_size.0,
                fitted.original_size.1,
                width,
                height
            );
        } else {
            println!(
                "\n{} Image already fits, copied to output",
                "Success!".green().bold()
            );
        }
    }

    Ok(())
}

/// 处理 'Compare' 命令：逐像素比较两幅图像并打印相似度。
///
/// # Errors
///
/// 任一图像无法读取时返回错误。
pub fn handle_compare(args: CompareArgs) -> Result<()> {
    let reporter = Console;
    let mut images = Vec::with_capacity(2);
    for (index, path) in [&args.image1, &args.image2].into_iter().enumerate() {
        let image = load_image(path).with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?;
        let file_size = fs::metadata(path)
            .with_context(|| {
                format!(
                    "Unable to read metadata of image file: {}",
                    path.to_string_lossy().red().bold()
                )
            })?
            .len();
        reporter.step(format_args!(
            "Image {}: {}x{} pixels, {} bytes",
            index + 1,
            image.width(),
            image.height(),
            file_size
        ));
        images.push(image);
    }

    let result = compare(&images[0], &images[1]);
    println!();
    match (result.reason, result.differing_pixels, result.total_pixels) {
        (Some(reason), _, _) => println!("{} Images differ: {reason}", "✗".red().bold()),
        _ if result.identical => println!("{} Images are identical!", "✓".green().bold()),
        (None, Some(differing), Some(total)) => {
            println!("Similarity: {}", format!("{:.2}%", result.similarity).yellow().bold());
            println!("   Different pixels: {differing} out of {total}");
        }
        _ => println!("Similarity: {:.2}%", result.similarity),
    }

    Ok(())
}

fn open_carrier(path: &Path, reporter: &dyn Reporter) -> Result<Carrier> {
    reporter.step(format_args!("Opening WAV file: {}", path.display()));
    let carrier = Carrier::open(path).with_context(|| {
        format!(
            "Unable to read WAV file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    let spec = carrier.spec();
    reporter.step(format_args!(
        "WAV Info: {} channels, {} bytes/sample, {} Hz, {} samples",
        spec.channels,
        spec.bits_per_sample / 8,
        spec.sample_rate,
        carrier.samples().len()
    ));
    Ok(carrier)
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

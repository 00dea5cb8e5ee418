use hound::{SampleFormat, WavSpec, WavWriter};
use image::{ImageBuffer, Rgb, Rgba};
use rand::RngCore;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use wav_hide::{
    audio::Carrier,
    cli::{Budget, CapacityArgs, CompareArgs, ExtractArgs, HideArgs, ResizeArgs},
    comparator::compare,
    handler::{handle_capacity, handle_compare, handle_extract, handle_hide, handle_resize},
    pixels::load_image,
};

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(3))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgb([chunk[0], chunk[1], chunk[2]]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

/// 一个辅助函数，用于创建一个带有随机样本的 16 位 PCM WAV 文件
fn create_test_wav(path: &Path, channels: u16, sample_count: usize) {
    let spec = WavSpec {
        channels,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("Failed to create test WAV.");
    let mut noise = vec![0u8; sample_count * 2];
    rand::rng().fill_bytes(&mut noise);
    for chunk in noise.chunks_exact(2) {
        writer
            .write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))
            .expect("Failed to write sample.");
    }
    writer.finalize().expect("Failed to finalize test WAV.");
}

fn hide_args(audio: &Path, image: &Path, output: &Path) -> HideArgs {
    HideArgs {
        audio: audio.to_path_buf(),
        image: image.to_path_buf(),
        output: output.to_path_buf(),
        auto_resize: false,
        quiet: true,
        force: false,
    }
}

/// 验证从隐藏到提取的完整流程
#[test]
fn test_handle_hide_and_extract_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let audio_path = dir.path().join("carrier.wav");
    let image_path = dir.path().join("secret.png");
    let stego_path = dir.path().join("stego.wav");
    let extracted_path = dir.path().join("extracted.png");

    create_test_wav(&audio_path, 2, 40_000);
    create_test_image(&image_path, 30, 20);

    // 2. 测试 handle_hide
    handle_hide(hide_args(&audio_path, &image_path, &stego_path))?;
    assert!(stego_path.exists(), "Stego WAV should be created.");

    // 载体规格和样本数量保持不变
    let original = Carrier::open(&audio_path)?;
    let stego = Carrier::open(&stego_path)?;
    assert_eq!(original.spec(), stego.spec());
    assert_eq!(original.samples().len(), stego.samples().len());
    assert!(
        original
            .samples()
            .iter()
            .zip(stego.samples())
            .all(|(a, b)| (a - b).abs() <= 1),
        "Only the least significant bit may change."
    );

    // 3. 测试 handle_extract
    handle_extract(ExtractArgs {
        audio: stego_path.clone(),
        output: extracted_path.clone(),
        quiet: true,
        force: false,
    })?;
    assert!(extracted_path.exists(), "Extracted image should be created.");

    // 4. 验证结果
    let result = compare(&load_image(&image_path)?, &load_image(&extracted_path)?);
    assert!(result.identical, "Extracted image must match the original.");
    assert_eq!(result.similarity, 100.0);

    Ok(())
}

/// 验证 alpha 通道在隐藏前被丢弃，而 RGB 数据原样恢复
#[test]
fn test_rgba_image_is_normalized_to_rgb() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let audio_path = dir.path().join("carrier.wav");
    let image_path = dir.path().join("alpha.png");
    let stego_path = dir.path().join("stego.wav");
    let extracted_path = dir.path().join("extracted.png");

    create_test_wav(&audio_path, 1, 10_000);
    let rgba = ImageBuffer::from_fn(8, 8, |x, y| Rgba([x as u8 * 30, y as u8 * 30, 77, 128]));
    rgba.save(&image_path)?;

    handle_hide(hide_args(&audio_path, &image_path, &stego_path))?;
    handle_extract(ExtractArgs {
        audio: stego_path,
        output: extracted_path.clone(),
        quiet: true,
        force: false,
    })?;

    let extracted = load_image(&extracted_path)?;
    assert_eq!(extracted.dimensions(), (8, 8));
    assert_eq!(&extracted.as_bytes()[..3], &[0, 0, 77]);
    assert!(compare(&load_image(&image_path)?, &extracted).identical);

    Ok(())
}

/// 验证空间不足时的错误处理，以及 `--auto-resize` 的补救
#[test]
fn test_handle_hide_not_enough_space() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let audio_path = dir.path().join("short.wav");
    let image_path = dir.path().join("large.png");
    let dest_path = dir.path().join("dest.wav");

    // 一段很短的音频和一幅相对很大的图像
    create_test_wav(&audio_path, 1, 4_000);
    create_test_image(&image_path, 100, 100);

    // 2. 执行并断言错误
    let result = handle_hide(hide_args(&audio_path, &image_path, &dest_path));
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("Not enough carrier capacity"));
    }
    assert!(!dest_path.exists(), "Nothing should be written on failure.");

    // 3. 开启自动缩放后应当成功
    let mut args = hide_args(&audio_path, &image_path, &dest_path);
    args.auto_resize = true;
    handle_hide(args)?;

    let stego = Carrier::open(&dest_path)?;
    let image = wav_hide::codec::extract_image(stego.samples(), &wav_hide::report::Silent)?;
    assert!(image.width() < 100 && image.height() < 100);
    assert!(image.as_bytes().len() + 12 <= 4_000 / 8);

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let audio_path = dir.path().join("carrier.wav");
    let image_path = dir.path().join("image.png");
    let dest_path = dir.path().join("dest.wav");

    create_test_wav(&audio_path, 1, 20_000);
    create_test_image(&image_path, 10, 10);

    // 2. 场景一：测试覆盖保护
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let result = handle_hide(hide_args(&audio_path, &image_path, &dest_path));
    assert!(
        result.is_err(),
        "Execution should fail without --force when file exists."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    let mut args = hide_args(&audio_path, &image_path, &dest_path);
    args.force = true;
    let result = handle_hide(args);
    assert!(
        result.is_ok(),
        "Execution should succeed with --force when file exists."
    );

    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证从未隐写过的音频中提取会失败
#[test]
fn test_extract_from_clean_audio_fails() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let audio_path = dir.path().join("clean.wav");
    let output_path = dir.path().join("nothing.png");

    // 全零样本对应的头部是 0x0，不是有效图像
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&audio_path, spec)?;
    for _ in 0..1000 {
        writer.write_sample(0i16)?;
    }
    writer.finalize()?;

    let result = handle_extract(ExtractArgs {
        audio: audio_path,
        output: output_path.clone(),
        quiet: true,
        force: false,
    });
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("No valid embedded image found"));
    }
    assert!(!output_path.exists());

    Ok(())
}

/// 验证缺失的输入文件会被报告
#[test]
fn test_missing_input_is_reported() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    create_test_image(&image_path, 4, 4);

    let result = handle_hide(hide_args(
        &dir.path().join("missing.wav"),
        &image_path,
        &dir.path().join("out.wav"),
    ));
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("Input file not found"));
    }

    Ok(())
}

/// 验证 resize 命令的两种预算来源
#[test]
fn test_handle_resize_with_audio_and_max_bytes() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let audio_path = dir.path().join("carrier.wav");
    let image_path = dir.path().join("big.png");
    let from_audio = dir.path().join("from_audio.png");
    let from_bytes = dir.path().join("from_bytes.png");
    let untouched = dir.path().join("untouched.png");

    create_test_wav(&audio_path, 1, 8_000);
    create_test_image(&image_path, 80, 60);

    // 1. 以 WAV 容量 (1000 字节) 为预算
    handle_resize(ResizeArgs {
        image: image_path.clone(),
        output: from_audio.clone(),
        budget: Budget {
            audio: Some(audio_path.clone()),
            max_bytes: None,
        },
        quiet: true,
        force: false,
    })?;
    let resized = load_image(&from_audio)?;
    assert!(resized.as_bytes().len() + 12 <= 1000);

    // 缩放后的图像可以直接隐藏
    let stego_path = dir.path().join("stego.wav");
    handle_hide(hide_args(&audio_path, &from_audio, &stego_path))?;

    // 2. 直接给定字节预算
    handle_resize(ResizeArgs {
        image: image_path.clone(),
        output: from_bytes.clone(),
        budget: Budget {
            audio: None,
            max_bytes: Some(312),
        },
        quiet: true,
        force: false,
    })?;
    let resized = load_image(&from_bytes)?;
    assert!(resized.as_bytes().len() + 12 <= 312);

    // 3. 已经满足预算时尺寸不变
    handle_resize(ResizeArgs {
        image: image_path.clone(),
        output: untouched.clone(),
        budget: Budget {
            audio: None,
            max_bytes: Some(1_000_000),
        },
        quiet: true,
        force: false,
    })?;
    assert_eq!(load_image(&untouched)?.dimensions(), (80, 60));

    // 4. 预算小于最小图像
    let result = handle_resize(ResizeArgs {
        image: image_path,
        output: dir.path().join("impossible.png"),
        budget: Budget {
            audio: None,
            max_bytes: Some(14),
        },
        quiet: true,
        force: false,
    });
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("Cannot resize image"));
    }

    Ok(())
}

/// capacity 与 compare 命令只做报告，不应失败
#[test]
fn test_handle_capacity_and_compare() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let audio_path = dir.path().join("carrier.wav");
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");

    create_test_wav(&audio_path, 2, 44_100);
    create_test_image(&first, 16, 16);
    create_test_image(&second, 16, 8);

    handle_capacity(CapacityArgs {
        audio: audio_path.clone(),
    })?;
    let info = Carrier::open(&audio_path)?.info();
    assert_eq!(info.samples, 44_100);
    assert_eq!(info.payload_capacity_bytes, 44_100 / 8 - 12);
    assert!((info.duration_seconds - 0.5).abs() < 1e-9);

    handle_compare(CompareArgs {
        image1: first.clone(),
        image2: first.clone(),
    })?;
    handle_compare(CompareArgs {
        image1: first,
        image2: second,
    })?;

    Ok(())
}

use image::{ImageBuffer, Rgba};
use dkeymask::{
    cli::{HideArgs, RecoverArgs},
    handler::{handle_hide, handle_recover},
};
use rand::RngCore;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], 255]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

/// 验证从隐藏到恢复的完整流程
#[test]
fn test_handle_hide_and_recover_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let hidden_image_path = dir.path().join("hidden.png");
    let source_text_path = dir.path().join("source.txt");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "This is a test message for the handler! 这是一个给处理器的测试信息！";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_hide
    let hide_args = HideArgs {
        image: original_image_path.clone(),
        text: source_text_path.clone(),
        dest: Some(hidden_image_path.clone()),
        passphrase: None,
        force: false,
    };
    handle_hide(hide_args)?;
    assert!(
        hidden_image_path.exists(),
        "Hidden image should be created."
    );

    // 3. 测试 handle_recover
    let recover_args = RecoverArgs {
        image: hidden_image_path.clone(),
        text: Some(recovered_text_path.clone()),
        passphrase: None,
        legacy: false,
        force: false,
    };
    handle_recover(recover_args)?;
    assert!(
        recovered_text_path.exists(),
        "Recovered text file should be created."
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证使用口令加密后的隐藏与恢复流程
#[test]
fn test_handle_hide_and_recover_with_passphrase() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("cover.png");
    let hidden_path = dir.path().join("hidden.png");
    let text_path = dir.path().join("secret.txt");
    let recovered_path = dir.path().join("recovered.txt");
    let plain_path = dir.path().join("plain.txt");

    create_test_image(&image_path, 64, 64);
    let secret = "wallet seed: correct horse battery staple";
    fs::write(&text_path, secret)?;

    handle_hide(HideArgs {
        image: image_path,
        text: text_path,
        dest: Some(hidden_path.clone()),
        passphrase: Some("open sesame".to_string()),
        force: false,
    })?;

    handle_recover(RecoverArgs {
        image: hidden_path.clone(),
        text: Some(recovered_path.clone()),
        passphrase: Some("open sesame".to_string()),
        legacy: false,
        force: false,
    })?;
    assert_eq!(fs::read_to_string(&recovered_path)?, secret);

    // 不提供口令时，得到的是 base64 密文而不是明文
    handle_recover(RecoverArgs {
        image: hidden_path,
        text: Some(plain_path.clone()),
        passphrase: None,
        legacy: false,
        force: false,
    })?;
    let armored = fs::read_to_string(&plain_path)?;
    assert_ne!(armored, secret);
    assert!(armored.chars().all(|c| c.is_ascii_alphanumeric() || "+/=".contains(c)));

    Ok(())
}

/// 验证 JPEG 输入会被重新编码为 PNG 输出
#[test]
fn test_handle_hide_jpeg_cover_produces_png() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let jpeg_path = dir.path().join("photo.jpg");
    let text_path = dir.path().join("note.txt");

    let img: ImageBuffer<image::Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(40, 40, |x, y| image::Rgb([(x * 6) as u8, (y * 6) as u8, 128]));
    img.save(&jpeg_path)?;
    fs::write(&text_path, "jpeg in, png out")?;

    handle_hide(HideArgs {
        image: jpeg_path,
        text: text_path,
        dest: None,
        passphrase: None,
        force: false,
    })?;

    let doctored = dir.path().join("doctored_photo.png");
    let bytes = fs::read(&doctored)?;
    assert_eq!(image::guess_format(&bytes)?, image::ImageFormat::Png);

    handle_recover(RecoverArgs {
        image: doctored,
        text: None,
        passphrase: None,
        legacy: false,
        force: false,
    })?;
    let recovered = fs::read_to_string(dir.path().join("recovered_doctored_photo.txt"))?;
    assert_eq!(recovered, "jpeg in, png out");

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_hide_and_recover_with_defaults() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let source_text_path = dir.path().join("source.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "Testing default path generation. 测试默认路径生成。";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_hide，不提供 dest 路径
    let hide_args = HideArgs {
        image: original_image_path.clone(),
        text: source_text_path.clone(),
        dest: None, // 关键：测试 None 的情况
        passphrase: None,
        force: false,
    };
    handle_hide(hide_args)?;

    // 验证默认的隐藏图像文件是否已创建
    let expected_hidden_path = dir.path().join("doctored_original.png");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );

    // 3. 测试 handle_recover，不提供 text 输出路径
    let recover_args = RecoverArgs {
        image: expected_hidden_path, // 使用上一步生成的默认文件
        text: None,                  // 关键：测试 None 的情况
        passphrase: None,
        legacy: false,
        force: false,
    };
    handle_recover(recover_args)?;

    // 验证默认的恢复文本文件是否已创建
    let expected_recovered_path = dir.path().join("recovered_doctored_original.txt");
    assert!(
        expected_recovered_path.exists(),
        "Default recovered text file should be created at: {:?}",
        expected_recovered_path
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&expected_recovered_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text from default file must match the original."
    );

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let text_path = dir.path().join("text.txt");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);
    fs::write(&text_path, "some text")?;

    // 2. 场景一：测试覆盖保护
    // 先创建一个同名的目标文件，模拟“文件已存在”的场景
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;
    assert!(dest_path.exists());

    // 构建参数，不使用 --force
    let hide_args_no_force = HideArgs {
        image: image_path.clone(),
        text: text_path.clone(),
        dest: Some(dest_path.clone()),
        passphrase: None,
        force: false,
    };

    // 执行并断言操作会失败
    let result = handle_hide(hide_args_no_force);
    assert!(result.is_err(), "Execution should fail without --force when file exists.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    // 构建参数，这次使用 --force
    let hide_args_with_force = HideArgs {
        image: image_path.clone(),
        text: text_path.clone(),
        dest: Some(dest_path.clone()),
        passphrase: None,
        force: true,
    };

    // 执行并断言操作会成功
    let result = handle_hide(hide_args_with_force);
    assert!(result.is_ok(), "Execution should succeed with --force when file exists.");

    // 验证文件确实被覆盖（内容不再是 "this is a dummy file..."）
    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证空间不足时的错误处理
#[test]
fn test_handle_hide_not_enough_space() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let text_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.png");

    // 创建一个非常小的图片
    create_test_image(&image_path, 10, 10);
    // 创建一个非常大的文本
    let large_text = "a".repeat(5000);
    fs::write(&text_path, large_text)?;

    // 2. 执行并断言错误
    let hide_args = HideArgs {
        image: image_path,
        text: text_path,
        dest: Some(dest_path.clone()),
        passphrase: None,
        force: false,
    };
    let result = handle_hide(hide_args);

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Not enough space"));
    }
    assert!(!dest_path.exists(), "No output should be written on failure.");

    Ok(())
}

/// 验证空数据与超长口令会被拒绝
#[test]
fn test_handle_hide_rejects_empty_data_and_long_passphrase() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let empty_path = dir.path().join("empty.txt");
    let text_path = dir.path().join("text.txt");

    create_test_image(&image_path, 20, 20);
    fs::write(&empty_path, "")?;
    fs::write(&text_path, "data")?;

    let result = handle_hide(HideArgs {
        image: image_path.clone(),
        text: empty_path,
        dest: None,
        passphrase: None,
        force: false,
    });
    let err = result.expect_err("empty data must be rejected");
    assert!(err.to_string().contains("can't be empty"));

    let result = handle_hide(HideArgs {
        image: image_path,
        text: text_path,
        dest: None,
        passphrase: Some("p".repeat(33)),
        force: false,
    });
    let err = result.expect_err("a 33-byte passphrase must be rejected");
    assert!(err.to_string().contains("Passphrase exceeds the limit"));

    Ok(())
}

/// 验证从普通图像恢复时会报告错误
#[test]
fn test_handle_recover_from_plain_image_fails() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("plain.png");
    let out_path = dir.path().join("out.txt");

    // 头部声明的数量远大于 8x8 图像的容量
    let img = ImageBuffer::from_pixel(8, 8, Rgba([0xFFu8, 0xFF, 0xFF, 0xFF]));
    img.save(&image_path)?;

    let result = handle_recover(RecoverArgs {
        image: image_path,
        text: Some(out_path.clone()),
        passphrase: None,
        legacy: false,
        force: false,
    });

    let err = result.expect_err("an untouched image must not decode");
    assert!(err.to_string().contains("Failed to recover hidden data"));
    assert!(!out_path.exists());

    Ok(())
}

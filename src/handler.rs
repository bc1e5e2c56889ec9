//! # 命令处理逻辑模块
//!
//! 包含处理 `hide` 和 `recover` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法与加密封装，以及向用户报告结果。

use crate::cipher;
use crate::cli::{HideArgs, RecoverArgs};
use crate::constants::{DOCTORED_PREFIX, MAX_PASSPHRASE_LEN, RECOVERED_PREFIX};
use crate::steganography::{cover_capacity, embed, extract_with};
use crate::walker::AlphaPolicy;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和数据文件、按需加密数据、检查隐写空间是否足够、调用隐写核心函数，
/// 最后将结果以 PNG 格式写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与口令的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 口令超过 32 字节，或要隐藏的数据为空。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或数据文件。
/// * 图像格式不受支持，或图像没有足够的空间来隐藏数据。
/// * 核心隐写函数 (`embed`) 在执行过程中失败。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let passphrase = checked_passphrase(args.passphrase.as_deref())?;

    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_output(&args.image, DOCTORED_PREFIX, "png"));
    ensure_writable(&dest, args.force)?;

    let picture = fs::read(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let text = fs::read(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    anyhow::ensure!(!text.is_empty(), "The secret data can't be empty.");

    let payload = match passphrase {
        Some(passphrase) => cipher::encrypt(&text, passphrase.as_bytes())
            .context("Failed to encrypt the secret data with the provided passphrase.")?,
        None => text,
    };

    let available_space = cover_capacity(&picture).with_context(|| {
        format!(
            "Unable to use image file: {}. \nOnly PNG and JPEG images can carry hidden data.",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    let required_space = payload.len();
    debug!(required_space, available_space, "checked image capacity");

    anyhow::ensure!(
        available_space >= required_space,
        "Not enough space in the image to hide the text. \nRequired: {}, Available: {}",
        required_space.to_string().red().bold(),
        available_space.to_string().green().bold()
    );

    let doctored = embed(&picture, payload.as_slice()).with_context(|| {
        "Failed to hide the data in the image. \nThe image file may be corrupt or too small."
    })?;

    fs::write(&dest, doctored).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用提取核心函数、按需解密，
/// 最后将恢复的数据写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与口令的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 口令超过 32 字节。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 核心提取函数 (`extract_with`) 或解密在执行过程中失败。
/// * 无法写入到目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let passphrase = checked_passphrase(args.passphrase.as_deref())?;

    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| default_output(&args.image, RECOVERED_PREFIX, "txt"));
    ensure_writable(&dest, args.force)?;

    let picture = fs::read(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let policy = if args.legacy {
        AlphaPolicy::ReadAll
    } else {
        AlphaPolicy::SkipTransparent
    };

    let mut text = extract_with(&picture, policy).with_context(|| {
        format!(
            "Failed to recover hidden data from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    if let Some(passphrase) = passphrase {
        text = cipher::decrypt(&text, passphrase.as_bytes()).with_context(|| {
            "Failed to decrypt the recovered data. \nThe data may not be encrypted, or the passphrase is wrong."
        })?;
    }

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 校验口令长度。空口令视为未提供。
fn checked_passphrase(passphrase: Option<&str>) -> Result<Option<&str>> {
    let passphrase = passphrase.filter(|p| !p.is_empty());
    if let Some(p) = passphrase {
        anyhow::ensure!(
            p.len() <= MAX_PASSPHRASE_LEN,
            "Passphrase exceeds the limit of {} bytes (got {}).",
            MAX_PASSPHRASE_LEN.to_string().green().bold(),
            p.len().to_string().red().bold()
        );
    }
    Ok(passphrase)
}

/// 在输入图像所在目录下生成默认输出路径：`<prefix><文件名>.<extension>`。
fn default_output(image: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = image
        .file_stem()
        .map_or_else(|| "image".into(), |s| s.to_string_lossy());
    let name = format!("{prefix}{stem}.{extension}");
    match image.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

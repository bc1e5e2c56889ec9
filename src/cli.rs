//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

/// 将（可加密的）秘密数据隐藏在 PNG 或 JPEG 图像像素的最低两位中，或从中恢复。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "将（可加密的）秘密数据隐藏在 PNG 或 JPEG 图像像素的最低两位中，或从中恢复。\n结果图像总是保存为 PNG，请勿再压缩，否则数据会丢失。"
)]
pub struct Cli {
    /// 输出调试日志。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏) 和 recover (恢复)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在 PNG 或 JPEG 图像中隐藏文件内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的数据。
    Recover(RecoverArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (PNG 或 JPEG)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的数据的文件路径。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。默认为图像所在目录下的 `doctored_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 可选口令 (最多 32 字节)，用于在嵌入前以 AES 加密数据。
    #[arg(short, long)]
    pub passphrase: Option<String>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复数据后，保存数据内容的输出路径。默认为图像所在目录下的 `recovered_<名称>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 隐藏数据时使用的口令。
    #[arg(short, long)]
    pub passphrase: Option<String>,

    /// 读取所有像素 (包括完全透明的像素)，用于旧版编码器生成的图像。
    #[arg(short, long)]
    pub legacy: bool,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,
}

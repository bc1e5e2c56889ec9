/// 字节最高两位 (bit 7-6) 的掩码。
pub const FIRST_QUARTER: u8 = 0b1100_0000;

/// 字节 bit 5-4 的掩码。
pub const SECOND_QUARTER: u8 = 0b0011_0000;

/// 字节 bit 3-2 的掩码。
pub const THIRD_QUARTER: u8 = 0b0000_1100;

/// 字节最低两位 (bit 1-0) 的掩码，也是每个颜色通道中承载数据的位。
pub const FOURTH_QUARTER: u8 = 0b0000_0011;

/// 每个字节被拆分成的 2 bit 符号数量。
pub const SYMBOLS_PER_BYTE: usize = 4;

/// 每个像素中承载数据的颜色通道数量 (R, G, B)。Alpha 通道从不写入数据。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 为长度头部保留的像素数量 (按光栅顺序的前 5 个像素)。
pub const HEADER_PIXELS: usize = 5;

/// `u32` 长度值编码后得到的符号数量。
pub const HEADER_SYMBOLS: usize = 4 * SYMBOLS_PER_BYTE;

/// 头部区域实际能写下的符号数量。
/// 5 个像素 × 3 个通道 = 15，比 `HEADER_SYMBOLS` 少一个，
/// 最后一个符号 (长度值的 bit 25-24) 始终按 0 读取。
pub const HEADER_WRITTEN_SYMBOLS: usize = HEADER_PIXELS * CHANNELS_PER_PIXEL;

/// 单幅图像最多嵌入的符号数量 (不含)。低于此值的数量都能被头部完整记录。
pub const HEADER_COUNT_LIMIT: u32 = 1 << 24;

/// 载荷符号队列的容量。生产者线程在队列写满时阻塞。
pub const SYMBOL_QUEUE_CAPACITY: usize = 128;

/// AES-256 密钥长度 (字节)。口令不足时以 NUL 补齐，超出时截断。
pub const KEY_SIZE: usize = 32;

/// AES 分组大小 (字节)，同时也是 CBC 初始向量的长度。
pub const BLOCK_SIZE: usize = 16;

/// 命令行接受的口令最大长度 (字节)。
pub const MAX_PASSPHRASE_LEN: usize = KEY_SIZE;

/// 未指定输出路径时，隐写结果图像文件名的前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复出的数据文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";

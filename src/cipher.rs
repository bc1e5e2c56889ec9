//! # 加密封装
//!
//! 载荷嵌入前可选的 AES-256-CBC 加密，结果以标准 base64 文本作为载荷。
//!
//! 这一格式只保证与既有图像兼容，不适合作为新的加密设计：
//! * 密钥就是口令本身，以 NUL 补齐或截断到 32 字节，没有任何密钥派生；
//! * 初始向量固定为密钥的前 16 字节，不随机，也不随密文传输；
//! * 没有完整性校验，口令错误时解密只会得到乱码。

use aes::Aes256;
use aes::cipher::block_padding::{NoPadding, Pkcs7};
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::constants::{BLOCK_SIZE, KEY_SIZE};
use crate::error::{DecodeError, Error, Result};

type Encryptor = cbc::Encryptor<Aes256>;
type Decryptor = cbc::Decryptor<Aes256>;

/// 由口令得到 32 字节密钥：复制前 32 字节，不足部分为 NUL。
pub fn derive_key(passphrase: &[u8]) -> [u8; KEY_SIZE] {
    let mut key = [0u8; KEY_SIZE];
    let len = passphrase.len().min(KEY_SIZE);
    key[..len].copy_from_slice(&passphrase[..len]);
    key
}

/// 加密 `plaintext` 并返回 base64 文本的字节。
///
/// # Errors
///
/// 分组密码初始化失败时返回 [`Error::CipherKey`]。
pub fn encrypt(plaintext: &[u8], passphrase: &[u8]) -> Result<Vec<u8>> {
    let key = derive_key(passphrase);
    let ciphertext = Encryptor::new_from_slices(&key, &key[..BLOCK_SIZE])?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    debug!(
        plaintext = plaintext.len(),
        ciphertext = ciphertext.len(),
        "encrypted payload"
    );
    Ok(STANDARD.encode(ciphertext).into_bytes())
}

/// [`encrypt`] 的逆运算。
///
/// # Errors
///
/// * base64 无效、密文为空或不是完整分组时返回 [`Error::CipherDecode`]。
/// * 分组密码初始化失败时返回 [`Error::CipherKey`]。
pub fn decrypt(armored: &[u8], passphrase: &[u8]) -> Result<Vec<u8>> {
    let ciphertext = STANDARD.decode(armored).map_err(DecodeError::from)?;
    if ciphertext.is_empty() {
        return Err(DecodeError::Empty.into());
    }
    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(DecodeError::PartialBlock(ciphertext.len()).into());
    }

    let key = derive_key(passphrase);
    let mut plaintext = Decryptor::new_from_slices(&key, &key[..BLOCK_SIZE])?
        .decrypt_padded_vec_mut::<NoPadding>(&ciphertext)
        .map_err(|_| Error::CipherDecode(DecodeError::PartialBlock(ciphertext.len())))?;

    strip_padding(&mut plaintext);
    Ok(plaintext)
}

/// 去掉 PKCS#7 填充。只看最后一个字节：其值大于缓冲区长度时原样保留，
/// 填充字节本身不做校验。
fn strip_padding(buf: &mut Vec<u8>) {
    let Some(&pad) = buf.last() else {
        return;
    };
    let pad = usize::from(pad);
    if pad <= buf.len() {
        buf.truncate(buf.len() - pad);
    }
}

use crate::constants::{BLOCK_SIZE, EPHEMERAL_KEY_LEN};
use aes::Aes128;
use block_padding::Pkcs7;
use cipher::{generic_array::GenericArray, BlockEncryptMut, KeyInit};
use log::{debug, trace};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

/// 一時鍵 (AES-128鍵)
pub type EphemeralKey = [u8; EPHEMERAL_KEY_LEN];

/// 新しい一時鍵を生成する
pub fn generate_ephemeral_key<R: RngCore + CryptoRng>(rng: &mut R) -> EphemeralKey {
    let mut key = [0u8; EPHEMERAL_KEY_LEN];
    rng.fill_bytes(&mut key);
    trace!("generate_ephemeral_key: key = {}", hex::encode(key));
    key
}

/// メッセージ末尾に 16 - (len mod 16) 個のゼロバイトを追加する
/// 長さがブロック境界に揃っている場合も1ブロック分のゼロを追加する
pub fn zero_pad(m: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - (m.len() % BLOCK_SIZE);
    let mut padded = Vec::with_capacity(m.len() + pad_len);
    padded.extend_from_slice(m);
    padded.resize(m.len() + pad_len, 0u8);
    padded
}

/// メッセージと一時鍵を結合した整数 C を計算する
/// ゼロパディング済みのメッセージを AES-128 ECB で暗号化し、
/// 暗号文をビッグエンディアンの非負整数として解釈する。
/// ECB層はさらに PKCS#7 パディングを適用するため、暗号文の末尾は常に
/// 0x10 が16個並んだブロックの暗号化結果になる。
pub fn bind(m: &[u8], key: &EphemeralKey) -> BigUint {
    trace!("bind: m_len = {}, key = {}", m.len(), hex::encode(key));
    let padded = zero_pad(m);
    debug!("bind: padded_len = {}", padded.len());

    // 各ブロックは独立に暗号化される (IVなし、連鎖なし)
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(&padded);
    debug!("bind: ciphertext_len = {}", ciphertext.len());

    let result = BigUint::from_bytes_be(&ciphertext);
    trace!("bind: result = {}", result);
    result
}

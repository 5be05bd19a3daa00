// エラーハンドリング
pub mod error;
// RSA鍵とトラップドア関数
pub mod rsa;
// リング署名関連
pub mod ring;
// 暗号ユーティリティ (メッセージと一時鍵の結合)
pub mod crypto_utils;
// 定数
pub mod constants;
// CLI用モデル
pub mod models;
// シリアライゼーションヘルパー
pub mod serialization;

pub use error::{RingError, RsaError};
pub use models::SignatureSummary;
pub use ring::{ring_sign, ring_verify, ring_verify_encoded, RingKeys, RingSignature, Role};
pub use rsa::{generate_keypair, KeyPair, PublicKey, SecretKey};
pub use serialization::{decode_signature, encode_signature};

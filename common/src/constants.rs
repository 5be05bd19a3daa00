// AESのブロック長 (バイト)
pub const BLOCK_SIZE: usize = 16;
// 一時鍵 (AES-128鍵) の長さ (バイト)
pub const EPHEMERAL_KEY_LEN: usize = 16;
// 公開鍵ファイルの行数 (e1, n1, e2, n2)
pub const PUBLIC_KEY_FILE_LINES: usize = 4;
// 署名の数値フィールド数 (v, y1, y2)
pub const SIGNATURE_NUMERIC_FIELDS: usize = 3;
// 鍵生成時のRSA公開指数 (一般的に使用される65537)
pub const E: u32 = 65537;
// 鍵生成時のデフォルトのモジュラスのビット長
pub const DEFAULT_RSA_BITS: usize = 1024;

// CLIのデフォルトパス
pub const DEFAULT_PUBLIC_KEY_PATH: &str = "data/publickey.txt";
pub const DEFAULT_MESSAGE_PATH: &str = "data/message.txt";
pub const DEFAULT_SIGNATURE_PATH: &str = "data/signature.txt";
pub const DEFAULT_PRIVATE_KEY_PATH_PREFIX: &str = "data/privatekey";

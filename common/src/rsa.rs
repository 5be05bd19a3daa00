use crate::constants;
use crate::error::RsaError;
use anyhow::Result;
use log::{debug, info, trace};
use num_bigint::{BigUint, RandBigInt};
use num_prime::RandPrime;
use num_traits::{One, Zero};
use rand::Rng;

// 生成を諦めるまでの鍵生成の試行回数
const KEYGEN_MAX_ATTEMPTS: usize = 16;

// RSA公開鍵を表す構造体
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    // 公開指数
    pub e: BigUint,
    // モジュラス (法)
    pub n: BigUint,
}

// 署名者の秘密スカラー
// 署名生成のインターフェースには含まれるが、リング方程式の計算には使用されない
#[derive(Clone)]
pub struct SecretKey {
    pub d: BigUint,
}

// 秘密スカラーをログに出さないため Debug は値を伏せる
impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey").field("d", &"<redacted>").finish()
    }
}

// RSA鍵ペア (公開鍵と秘密鍵) を表す構造体
#[derive(Debug)]
pub struct KeyPair {
    pub public: PublicKey,
    pub secret: SecretKey,
}

/// トラップドア関数 g(x) = e^x mod n
/// 公開指数を底、入力値を指数として計算する
pub fn g(pubkey: &PublicKey, x: &BigUint) -> BigUint {
    // 内部不変条件: n > 0
    assert!(!pubkey.n.is_zero(), "RSA公開鍵nが0です");
    trace!("g: pubkey = {:?}, x = {}", pubkey, x);
    let result = pubkey.e.modpow(x, &pubkey.n);
    trace!("g: result = {}", result);
    result
}

/// (a + b) mod n
pub fn mod_add(a: &BigUint, b: &BigUint, n: &BigUint) -> BigUint {
    assert!(!n.is_zero(), "法nが0です");
    (a + b) % n
}

/// [0, n) から一様に乱数を取り出す
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, n: &BigUint) -> BigUint {
    assert!(!n.is_zero(), "乱数の範囲が空です");
    rng.gen_biguint_below(n)
}

/// RSA鍵ペア生成
/// bits: 生成する鍵のビット長 (素数p, qのビット長の合計)
/// rng: 乱数生成器
pub fn generate_keypair(bits: usize, rng: &mut impl Rng) -> Result<KeyPair> {
    info!("RSA鍵ペア生成開始: bits = {}", bits);
    // 素数を2つ取れない長さは拒否する
    if bits < 16 || bits % 2 != 0 {
        return Err(RsaError::InvalidBitLength(bits).into());
    }

    // 公開指数 e を定数から取得
    let e = BigUint::from(constants::E);

    for attempt in 1..=KEYGEN_MAX_ATTEMPTS {
        // 指定されたビット長の半分を持つ素数 p, q を生成
        let p: BigUint = rng.gen_prime_exact(bits / 2, None);
        let q: BigUint = rng.gen_prime_exact(bits / 2, None);
        if p == q {
            debug!("generate_keypair: p == q のため再生成 (attempt {})", attempt);
            continue;
        }

        // モジュラス n = p * q を計算
        let n = &p * &q;
        debug!("generate_keypair: n = {}", n);

        // オイラーのトーシェント関数 φ(n) = (p-1)*(q-1) を計算
        let phi = (&p - BigUint::one()) * (&q - BigUint::one());

        // e と φ(n) のモジュラ逆数 d を計算 (秘密指数)
        // 互いに素でない場合は p, q を取り直す
        let d = match e.modinv(&phi) {
            Some(val) => val,
            None => {
                debug!(
                    "generate_keypair: e と φ(n) が互いに素ではないため再生成 (attempt {})",
                    attempt
                );
                continue;
            }
        };

        let keypair = KeyPair {
            public: PublicKey { e: e.clone(), n },
            secret: SecretKey { d },
        };
        info!(
            "RSA鍵ペア生成完了: n bits = {}, e = {}",
            keypair.public.n.bits(),
            keypair.public.e
        );
        return Ok(keypair);
    }

    Err(RsaError::NotCoprime.into())
}

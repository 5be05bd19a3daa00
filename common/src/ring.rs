use crate::crypto_utils::{bind, generate_ephemeral_key, EphemeralKey};
use crate::error::RingError;
use crate::rsa::{g, mod_add, rand_range, PublicKey, SecretKey};
use crate::serialization::decode_signature;
use anyhow::Result;
use log::{debug, error, info};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{thread_rng, CryptoRng, Rng};

// リング内での役割 (1番目または2番目の鍵)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    First,
    Second,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::First, Role::Second];

    /// 相手側の役割 (3 - i)
    pub fn other(self) -> Role {
        match self {
            Role::First => Role::Second,
            Role::Second => Role::First,
        }
    }

    /// 1始まりの番号
    pub fn number(self) -> usize {
        match self {
            Role::First => 1,
            Role::Second => 2,
        }
    }
}

impl TryFrom<usize> for Role {
    type Error = RingError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Role::First),
            2 => Ok(Role::Second),
            other => Err(RingError::InvalidRole(other.to_string())),
        }
    }
}

// 2人分の公開鍵 (e1, n1), (e2, n2)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingKeys {
    pub first: PublicKey,
    pub second: PublicKey,
}

impl RingKeys {
    pub fn new(first: PublicKey, second: PublicKey) -> Self {
        Self { first, second }
    }

    pub fn key(&self, role: Role) -> &PublicKey {
        match role {
            Role::First => &self.first,
            Role::Second => &self.second,
        }
    }

    fn has_zero_modulus(&self) -> bool {
        self.first.n.is_zero() || self.second.n.is_zero()
    }
}

// リング署名を表す構造体
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingSignature {
    // 乱択値 (n1 未満)
    pub v: BigUint,
    // 非署名者の公開鍵で計算した値
    pub y1: BigUint,
    // 署名者の公開鍵で計算した値
    pub y2: BigUint,
    // 一時鍵 (署名にそのまま埋め込まれる)
    pub key: EphemeralKey,
}

/// リング署名生成
/// keys: 2人分の公開鍵
/// signer: 署名者の番号 (1 または 2)
/// signer_secret: 署名者の秘密スカラー (計算には使用されない)
/// m: 署名対象のメッセージ
pub fn ring_sign(
    keys: &RingKeys,
    signer: usize,
    signer_secret: &SecretKey,
    m: &[u8],
) -> Result<RingSignature> {
    ring_sign_with_rng(keys, signer, signer_secret, m, &mut thread_rng())
}

/// 乱数生成器を指定してリング署名を生成する
pub fn ring_sign_with_rng<R: Rng + CryptoRng>(
    keys: &RingKeys,
    signer: usize,
    _signer_secret: &SecretKey,
    m: &[u8],
    rng: &mut R,
) -> Result<RingSignature> {
    info!(
        "リング署名生成開始: signer = {}, n1 bits = {}, n2 bits = {}, m_len = {}",
        signer,
        keys.first.n.bits(),
        keys.second.n.bits(),
        m.len()
    );

    // 署名者の番号が無効な場合エラー
    let signer = Role::try_from(signer).map_err(|e| {
        error!("署名者の番号 {} は無効です (1 または 2)", signer);
        e
    })?;
    // 法が0の鍵では計算できない
    if keys.has_zero_modulus() {
        error!("モジュラスが0の公開鍵が含まれています");
        return Err(RingError::InvalidKey("modulus must be non-zero".to_string()).into());
    }
    let nonsigner = signer.other();
    let signer_key = keys.key(signer);
    let nonsigner_key = keys.key(nonsigner);

    // 一時鍵 K を生成し、メッセージと結合して C を得る
    let key = generate_ephemeral_key(rng);
    let c = bind(m, &key);
    debug!("ring_sign: C = {}", c);

    // 乱択値 v は署名者に関係なく常に n1 未満から選ぶ
    let v = rand_range(rng, &keys.first.n);
    debug!("ring_sign: v = {}", v);

    // y1 = e_t ^ v mod n_t (非署名者の公開鍵)
    let y1 = g(nonsigner_key, &v);
    debug!("ring_sign: y1 = {}", y1);

    // y2 = e_s ^ ((v + C) mod n_s) mod n_s (署名者の公開鍵)
    let xored = mod_add(&v, &c, &signer_key.n);
    debug!("ring_sign: xored = {}", xored);
    let y2 = g(signer_key, &xored);
    debug!("ring_sign: y2 = {}", y2);

    let ring_signature = RingSignature { v, y1, y2, key };
    info!(
        "リング署名生成完了: v bits = {}, y1 bits = {}, y2 bits = {}",
        ring_signature.v.bits(),
        ring_signature.y1.bits(),
        ring_signature.y2.bits()
    );
    Ok(ring_signature)
}

// 指定した役割の割り当てでリング方程式が閉じるかを確認する
fn ring_closes(keys: &RingKeys, sig: &RingSignature, c: &BigUint, signer: Role) -> bool {
    let signer_key = keys.key(signer);
    let nonsigner_key = keys.key(signer.other());

    let y1 = g(nonsigner_key, &sig.v);
    let xored = mod_add(&sig.v, c, &signer_key.n);
    let y2 = g(signer_key, &xored);
    debug!(
        "ring_verify: 割り当て {} での計算値 y1 = {}, y2 = {}",
        signer.number(),
        y1,
        y2
    );
    y1 == sig.y1 && y2 == sig.y2
}

/// リング署名検証
/// keys: 2人分の公開鍵
/// sig: 検証対象のリング署名
/// m: 検証対象のメッセージ
pub fn ring_verify(keys: &RingKeys, sig: &RingSignature, m: &[u8]) -> bool {
    info!(
        "リング署名検証開始: n1 bits = {}, n2 bits = {}, v bits = {}, m_len = {}",
        keys.first.n.bits(),
        keys.second.n.bits(),
        sig.v.bits(),
        m.len()
    );
    if keys.has_zero_modulus() {
        error!("モジュラスが0の公開鍵が含まれているため検証できません");
        return false;
    }

    let c = bind(m, &sig.key);
    debug!("ring_verify: C = {}", c);

    // どちらの割り当てでも一致すれば受理する
    let verification = Role::ALL
        .iter()
        .any(|&signer| ring_closes(keys, sig, &c, signer));
    info!("リング署名検証結果: {}", verification);
    verification
}

/// エンコード済みの署名を検証する
/// 署名を解析できない場合も検証失敗として false を返す
pub fn ring_verify_encoded(keys: &RingKeys, m: &[u8], encoded: &[u8]) -> bool {
    match decode_signature(encoded) {
        Ok(sig) => ring_verify(keys, &sig, m),
        Err(e) => {
            error!("署名の解析に失敗しました: {:#}", e);
            info!("リング署名検証結果: false");
            false
        }
    }
}

pub mod password;

/// 生成指定长度的 base36 随机字符串（0-9a-z）
pub fn generate_base36_code(length: usize) -> String {
    use std::iter;

    let chars = b"0123456789abcdefghijklmnopqrstuvwxyz";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// 生成加密安全的随机 token（URL-safe Base64）
pub fn generate_secure_token(bytes: usize) -> String {
    use base64::Engine;
    use rand::RngExt;

    let mut buf = vec![0u8; bytes];
    rand::rng().fill(buf.as_mut_slice());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

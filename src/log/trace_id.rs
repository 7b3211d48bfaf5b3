use rand::Rng;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// trace id 长度
pub const TRACE_ID_LEN: usize = 16;

/// 生成 16 位小写十六进制的随机 trace id
///
/// 仅用于关联跨服务的日志，不保证唯一，也不具备密码学安全性
pub fn new_trace_id() -> String {
    let mut rng = rand::thread_rng();
    (0..TRACE_ID_LEN)
        .map(|_| HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char)
        .collect()
}

pub mod url_validator;

/// 短码字母表：62 个 URL 安全符号
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// 校验短码格式（大小写敏感，仅限字母数字）
///
/// 非法短码直接拒绝，不进入数据库查询。
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= 32
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_random_code_length() {
        for len in [1, 6, 8, 16] {
            assert_eq!(generate_random_code(len).len(), len);
        }
    }

    #[test]
    fn test_generate_random_code_alphabet() {
        let code = generate_random_code(64);
        assert!(code.bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_random_code_distinct() {
        // 6 位 62 进制空间下 100 次抽样碰撞概率可忽略
        let codes: HashSet<String> = (0..100).map(|_| generate_random_code(6)).collect();
        assert_eq!(codes.len(), 100);
    }

    #[test]
    fn test_is_valid_short_code() {
        assert!(is_valid_short_code("abc123"));
        assert!(is_valid_short_code("XyZ9"));
        assert!(!is_valid_short_code(""));
        assert!(!is_valid_short_code("abc/123"));
        assert!(!is_valid_short_code("abc 123"));
        assert!(!is_valid_short_code("abc-123"));
        assert!(!is_valid_short_code(&"a".repeat(33)));
    }
}

//! 商品来源 URL 验证
//!
//! 先做安全性检查（协议白名单），再核对域名是否属于目标市场。

use url::Url;

use crate::storage::Marketplace;

#[derive(Debug)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
    MarketplaceMismatch(Marketplace),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(scheme) => {
                write!(f, "Unsupported protocol '{}', need http(s)", scheme)
            }
            Self::DangerousProtocol(scheme) => {
                write!(f, "Protocol '{}' is blocked", scheme)
            }
            Self::InvalidFormat(msg) => write!(f, "Malformed URL: {}", msg),
            Self::MarketplaceMismatch(marketplace) => {
                write!(f, "URL host does not belong to {}", marketplace)
            }
        }
    }
}

impl std::error::Error for UrlValidationError {}

// javascript:/data:/file: 一类能在客户端执行或读本地文件的协议
const BLOCKED_SCHEMES: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

/// 基础验证：非空、可解析、协议只允许 http(s)
pub fn validate_url(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    let scheme = parsed.scheme().to_lowercase();
    if BLOCKED_SCHEMES.contains(&scheme.as_str()) {
        return Err(UrlValidationError::DangerousProtocol(scheme));
    }
    if scheme != "http" && scheme != "https" {
        return Err(UrlValidationError::InvalidProtocol(scheme));
    }

    Ok(parsed)
}

/// 来源 URL 验证：基础验证 + 域名必须含市场标识（shopee/lazada）
pub fn validate_source_url(url: &str, marketplace: Marketplace) -> Result<Url, UrlValidationError> {
    let parsed = validate_url(url)?;
    let host = parsed.host_str().unwrap_or_default().to_lowercase();

    let needle = match marketplace {
        Marketplace::Shopee => "shopee",
        Marketplace::Lazada => "lazada",
    };
    if !host.contains(needle) {
        return Err(UrlValidationError::MarketplaceMismatch(marketplace));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_url("https://shopee.sg/item/123").is_ok());
        assert!(validate_url("http://lazada.co.th/products/x").is_ok());
    }

    #[test]
    fn test_rejects_empty_and_malformed() {
        assert!(matches!(
            validate_url("   "),
            Err(UrlValidationError::EmptyUrl)
        ));
        assert!(matches!(
            validate_url("not a url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_blocked_schemes() {
        for url in [
            "javascript:alert(1)",
            "data:text/html,<script>",
            "file:///etc/passwd",
        ] {
            assert!(
                matches!(
                    validate_url(url),
                    Err(UrlValidationError::DangerousProtocol(_))
                ),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            validate_url("ftp://shopee.sg/item"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
    }

    #[test]
    fn test_source_url_marketplace_match() {
        assert!(validate_source_url("https://shopee.sg/item/1", Marketplace::Shopee).is_ok());
        assert!(validate_source_url("https://www.lazada.vn/products/2", Marketplace::Lazada).is_ok());
    }

    #[test]
    fn test_source_url_marketplace_mismatch() {
        assert!(matches!(
            validate_source_url("https://shopee.sg/item/1", Marketplace::Lazada),
            Err(UrlValidationError::MarketplaceMismatch(Marketplace::Lazada))
        ));
        assert!(matches!(
            validate_source_url("https://example.com/item", Marketplace::Shopee),
            Err(UrlValidationError::MarketplaceMismatch(_))
        ));
    }
}

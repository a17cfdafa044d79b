//! URL 验证模块
//!
//! 通用类型短链的目标必须是完整的绝对 URL（scheme + host），
//! 同时阻止危险协议

use url::Url;

/// URL 验证错误
#[derive(Debug)]
pub enum UrlValidationError {
    EmptyUrl,
    UnsupportedScheme(String),
    DangerousScheme(String),
    MissingHost,
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "Unsupported scheme: {}. Only http:// and https:// are allowed",
                scheme
            ),
            Self::DangerousScheme(scheme) => {
                write!(f, "Dangerous scheme blocked: {}", scheme)
            }
            Self::MissingHost => write!(f, "URL must include a host"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_SCHEMES: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 验证绝对 URL
///
/// 检查项目：
/// 1. 非空
/// 2. 不是危险协议（javascript:, data:, file: 等）
/// 3. 必须是 http:// 或 https://
/// 4. 可解析且带 host
pub fn validate_absolute_url(url: &str) -> Result<(), UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();

    for scheme in DANGEROUS_SCHEMES {
        if url_lower.starts_with(scheme) {
            return Err(UrlValidationError::DangerousScheme(scheme.to_string()));
        }
    }

    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let scheme = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::UnsupportedScheme(scheme));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    if parsed.host_str().is_none() {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}

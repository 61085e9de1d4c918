use crate::utils::error::{FormError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 驗證設定中的服務端點，只接受 http / https
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(FormError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(FormError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(FormError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Syntax check for a submitted address: any scheme, but it must carry an authority.
pub fn parse_absolute_url(address: &str) -> Result<Url> {
    let url = Url::parse(address).map_err(|e| FormError::MalformedAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    if !url.has_host() {
        return Err(FormError::MalformedAddress {
            address: address.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FormError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 檢查自訂 header 名稱，避免送出時才在 reqwest 失敗
pub fn validate_header_names<'a, I>(field_name: &str, names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a String>,
{
    for name in names {
        validate_non_empty_string(field_name, name)?;
        reqwest::header::HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            FormError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: name.clone(),
                reason: format!("Invalid header name: {}", e),
            }
        })?;
    }
    Ok(())
}

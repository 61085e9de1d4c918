//! Pure submission helpers: batch validation and response reconciliation.
//! Nothing here touches the network.

use crate::core::address_list::{AddressList, MIN_ADDRESSES};
use crate::domain::model::{MetadataRecord, ResultItem};
use crate::utils::error::{FormError, Result};
use crate::utils::validation::parse_absolute_url;
use serde::Serialize;

/// 協作服務呼叫的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Fetched(Vec<MetadataRecord>),
    Failed(String),
}

impl Settlement {
    pub fn from_result(result: Result<Vec<MetadataRecord>>) -> Self {
        match result {
            Ok(records) => Settlement::Fetched(records),
            Err(e) => Settlement::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

/// Non-blank addresses in list order, or the insufficient-input error.
pub fn validate_batch(list: &AddressList) -> Result<Vec<String>> {
    let addresses = list.non_blank_values();
    if addresses.len() < MIN_ADDRESSES {
        return Err(FormError::InsufficientAddresses {
            minimum: MIN_ADDRESSES,
            found: addresses.len(),
        });
    }
    Ok(addresses)
}

/// 第一個格式錯誤的網址會讓整批失敗
pub fn check_syntax(addresses: &[String]) -> Result<()> {
    for address in addresses {
        parse_absolute_url(address)?;
    }
    Ok(())
}

pub fn failure_batch(addresses: &[String], message: &str) -> Vec<ResultItem> {
    addresses
        .iter()
        .map(|address| ResultItem::failure(address.clone(), message))
        .collect()
}

pub fn reconcile(addresses: &[String], settlement: Settlement) -> (Vec<ResultItem>, Outcome) {
    match settlement {
        Settlement::Failed(message) => (failure_batch(addresses, &message), Outcome::Failure),
        Settlement::Fetched(records) if records.len() != addresses.len() => {
            let err = FormError::RecordCountMismatch {
                expected: addresses.len(),
                received: records.len(),
            };
            tracing::warn!("⚠️ {}", err);
            (failure_batch(addresses, &err.to_string()), Outcome::Failure)
        }
        Settlement::Fetched(records) => {
            let items = addresses
                .iter()
                .zip(records)
                .map(|(address, record)| match record.failure() {
                    Some(message) => ResultItem::failure(address.clone(), message),
                    None => ResultItem::success(
                        address.clone(),
                        record.title,
                        record.description,
                        record.image,
                    ),
                })
                .collect();
            (items, Outcome::Success)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FAILED_TITLE;

    fn addresses() -> Vec<String> {
        vec![
            "https://example.com".to_string(),
            "https://example2.com".to_string(),
            "https://example3.com".to_string(),
        ]
    }

    fn record(title: &str, error: Option<&str>) -> MetadataRecord {
        MetadataRecord {
            title: title.to_string(),
            description: format!("{} description", title),
            image: None,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_batch_requires_three_non_blank() {
        let list = AddressList::from_values(["https://a.com", " ", "https://b.com"]);
        let err = validate_batch(&list).unwrap_err();
        assert_eq!(err.to_string(), "Please enter at least 3 URLs.");

        let list = AddressList::from_values(["https://a.com", "", "https://b.com", "https://c.com"]);
        assert_eq!(validate_batch(&list).unwrap().len(), 3);
    }

    #[test]
    fn test_check_syntax_rejects_any_malformed() {
        let mut batch = addresses();
        tokio_test::assert_ok!(check_syntax(&batch));

        batch[1] = "example2".to_string();
        assert!(matches!(
            check_syntax(&batch),
            Err(FormError::MalformedAddress { .. })
        ));
    }

    #[test]
    fn test_reconcile_success_keeps_order() {
        let records = vec![
            record("Example Domain", None),
            record("Example Domain 2", None),
            record("Example Domain 3", None),
        ];

        let (items, outcome) = reconcile(&addresses(), Settlement::Fetched(records));

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title(), "Example Domain");
        assert_eq!(items[1].title(), "Example Domain 2");
        assert_eq!(items[2].title(), "Example Domain 3");
        assert_eq!(items[2].address(), "https://example3.com");
        assert!(items.iter().all(|i| i.failure_message().is_none()));
    }

    #[test]
    fn test_reconcile_batch_failure() {
        let (items, outcome) =
            reconcile(&addresses(), Settlement::Failed("Network Error".to_string()));

        assert_eq!(outcome, Outcome::Failure);
        assert_eq!(items.len(), 3);
        for (item, address) in items.iter().zip(addresses()) {
            assert_eq!(item.address(), address);
            assert_eq!(item.title(), FAILED_TITLE);
            assert_eq!(item.failure_message(), Some("Network Error"));
        }
    }

    #[test]
    fn test_reconcile_mixed_per_address_failure() {
        let records = vec![
            record("Example Domain", None),
            record("", Some("unreachable")),
            record("Example Domain 3", None),
        ];

        let (items, outcome) = reconcile(&addresses(), Settlement::Fetched(records));

        assert_eq!(outcome, Outcome::Success);
        assert!(!items[0].is_failure());
        assert_eq!(items[1].failure_message(), Some("unreachable"));
        assert_eq!(items[1].address(), "https://example2.com");
        assert!(!items[2].is_failure());
    }

    #[test]
    fn test_reconcile_length_mismatch_fails_whole_batch() {
        let records = vec![record("only one", None)];

        let (items, outcome) = reconcile(&addresses(), Settlement::Fetched(records));

        assert_eq!(outcome, Outcome::Failure);
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[0].failure_message(),
            Some("Expected 3 metadata records but received 1")
        );
    }

    #[test]
    fn test_settlement_from_result_uses_error_text() {
        let settlement = Settlement::from_result(Err(FormError::HttpStatus { status: 500 }));
        assert_eq!(
            settlement,
            Settlement::Failed("Request failed with status code 500".to_string())
        );
    }
}

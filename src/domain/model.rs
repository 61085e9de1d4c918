use serde::{Deserialize, Deserializer, Serialize};

/// 失敗項目固定使用的標題
pub const FAILED_TITLE: &str = "Failed to fetch metadata";

/// Stable identity of an address slot. Positions shift on removal, ids never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressSlot {
    pub id: SlotId,
    pub position: usize,
    pub value: String,
}

/// One element of the collaborator's response array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// 失敗的項目常把 title/description 設成 null
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl MetadataRecord {
    /// 只有非空的 error 才算失敗
    pub fn failure(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataRequest<'a> {
    pub urls: &'a [String],
}

/// Display record for one submitted address.
///
/// Fields are private so that only the success or the failure shape can be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    address: String,
    title: String,
    description: String,
    image: Option<String>,
    failure: Option<String>,
}

impl ResultItem {
    pub fn success(
        address: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            address: address.into(),
            title: title.into(),
            description: description.into(),
            image: image.filter(|i| !i.is_empty()),
            failure: None,
        }
    }

    pub fn failure(address: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            title: FAILED_TITLE.to_string(),
            description: String::new(),
            image: None,
            failure: Some(message.into()),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

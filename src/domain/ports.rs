use crate::domain::model::MetadataRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// 外部的 metadata 服務：一次送出整批網址，回傳同順序、同長度的結果
#[async_trait]
pub trait MetadataCollaborator: Send + Sync {
    async fn fetch_metadata(&self, urls: &[String]) -> Result<Vec<MetadataRecord>>;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn headers(&self) -> HashMap<String, String>;
    fn initial_addresses(&self) -> &[String];
}

use crate::domain::model::{AddressSlot, SlotId};
use crate::utils::error::{FormError, Result};

/// 表單最少要保留的欄位數
pub const MIN_ADDRESSES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    id: SlotId,
    value: String,
}

/// Ordered list of address inputs. Never shorter than [`MIN_ADDRESSES`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressList {
    entries: Vec<Entry>,
    next_id: u64,
}

impl AddressList {
    pub fn initialize() -> Self {
        let mut list = Self {
            entries: Vec::with_capacity(MIN_ADDRESSES),
            next_id: 0,
        };
        for _ in 0..MIN_ADDRESSES {
            list.append();
        }
        list
    }

    /// 以既有的值建立清單，不足三個時補空白欄位
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self {
            entries: Vec::new(),
            next_id: 0,
        };
        for value in values {
            let id = list.mint_id();
            list.entries.push(Entry {
                id,
                value: value.into(),
            });
        }
        while list.entries.len() < MIN_ADDRESSES {
            list.append();
        }
        list
    }

    fn mint_id(&mut self) -> SlotId {
        let id = SlotId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self) -> SlotId {
        let id = self.mint_id();
        self.entries.push(Entry {
            id,
            value: String::new(),
        });
        id
    }

    pub fn edit(&mut self, position: usize, value: impl Into<String>) -> Result<()> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(position)
            .ok_or(FormError::PositionOutOfRange { position, len })?;
        entry.value = value.into();
        Ok(())
    }

    /// Removes the slot at `position`; later slots shift down by one.
    pub fn remove(&mut self, position: usize) -> Result<()> {
        let len = self.entries.len();
        if position >= len {
            return Err(FormError::PositionOutOfRange { position, len });
        }
        if len <= MIN_ADDRESSES {
            return Err(FormError::BelowMinimumSlots {
                minimum: MIN_ADDRESSES,
            });
        }
        self.entries.remove(position);
        Ok(())
    }

    /// 與畫面規則一致：只有超出前三格的欄位可以移除
    pub fn is_removable(&self, position: usize) -> bool {
        self.entries.len() > MIN_ADDRESSES && position >= MIN_ADDRESSES && position < self.len()
    }

    pub fn position_of(&self, id: SlotId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn value(&self, position: usize) -> Option<&str> {
        self.entries.get(position).map(|e| e.value.as_str())
    }

    pub fn slots(&self) -> Vec<AddressSlot> {
        self.entries
            .iter()
            .enumerate()
            .map(|(position, e)| AddressSlot {
                id: e.id,
                position,
                value: e.value.clone(),
            })
            .collect()
    }

    /// 去除空白後非空的值，保持原順序
    ///
    /// Values come back trimmed: the batch is sent and displayed without the
    /// surrounding whitespace the user typed.
    pub fn non_blank_values(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.value.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for AddressList {
    fn default() -> Self {
        Self::initialize()
    }
}

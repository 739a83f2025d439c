use crate::u256_struct;
use blake2::{
    digest::{Update, VariableOutput},
    Blake2bVar,
};

u256_struct!(BlockHash);

impl BlockHash {
    pub const MAX: Self = Self::from_bytes([0xFF; 32]);
}

/// Incrementally builds a blake2b block hash from the hashed fields.
pub struct BlockHashBuilder {
    blake: Blake2bVar,
}

impl Default for BlockHashBuilder {
    fn default() -> Self {
        Self {
            blake: Blake2bVar::new(32).unwrap(),
        }
    }
}

impl BlockHashBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn update(mut self, data: impl AsRef<[u8]>) -> Self {
        self.blake.update(data.as_ref());
        self
    }

    pub fn build(self) -> BlockHash {
        let mut hash_bytes = [0u8; 32];
        self.blake.finalize_variable(&mut hash_bytes).unwrap();
        BlockHash::from_bytes(hash_bytes)
    }
}

/// Generates a 256 bit fixed width identifier type.
///
/// All identifiers in the ledger (block hashes, accounts, links) share the
/// same representation: 32 big endian bytes with a zero sentinel value.
#[macro_export]
macro_rules! u256_struct {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name([u8; 32]);

        #[allow(dead_code)]
        impl $name {
            pub const fn zero() -> Self {
                Self([0; 32])
            }

            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub const fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0; 32]
            }

            pub fn encode_hex(&self) -> String {
                use std::fmt::Write;
                let mut result = String::with_capacity(64);
                for byte in self.0 {
                    write!(&mut result, "{:02X}", byte).unwrap();
                }
                result
            }

            /// Accepts up to 64 hex characters; shorter strings are
            /// interpreted as the low bytes of the value.
            pub fn decode_hex(s: impl AsRef<str>) -> ::anyhow::Result<Self> {
                let s = s.as_ref();
                ::anyhow::ensure!(
                    !s.is_empty() && s.len() <= 64,
                    "invalid hex string length"
                );
                ::anyhow::ensure!(s.is_ascii(), "invalid hex string");
                let mut padded = [b'0'; 64];
                padded[64 - s.len()..].copy_from_slice(s.as_bytes());
                let mut bytes = [0u8; 32];
                for (i, chunk) in padded.chunks_exact(2).enumerate() {
                    let hi = (chunk[0] as char)
                        .to_digit(16)
                        .ok_or_else(|| ::anyhow::anyhow!("invalid hex character"))?;
                    let lo = (chunk[1] as char)
                        .to_digit(16)
                        .ok_or_else(|| ::anyhow::anyhow!("invalid hex character"))?;
                    bytes[i] = ((hi << 4) | lo) as u8;
                }
                Ok(Self(bytes))
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                let mut bytes = [0u8; 32];
                bytes[24..].copy_from_slice(&value.to_be_bytes());
                Self(bytes)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.encode_hex())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.encode_hex())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    u256_struct!(TestId);

    #[test]
    fn zero_is_zero() {
        assert!(TestId::zero().is_zero());
        assert!(!TestId::from(1).is_zero());
    }

    #[test]
    fn from_u64_sets_low_bytes() {
        let id = TestId::from(0x1234);
        assert_eq!(id.as_bytes()[31], 0x34);
        assert_eq!(id.as_bytes()[30], 0x12);
        assert_eq!(id.as_bytes()[0], 0);
    }

    #[test]
    fn hex_round_trip() {
        let id = TestId::from(123456789);
        let decoded = TestId::decode_hex(id.encode_hex()).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn decode_short_hex() {
        let id = TestId::decode_hex("AA").unwrap();
        assert_eq!(id.as_bytes()[31], 0xAA);
        assert_eq!(id, TestId::from(0xAA));
    }

    #[test]
    fn decode_invalid_hex() {
        assert!(TestId::decode_hex("XY").is_err());
        assert!(TestId::decode_hex("").is_err());
    }
}

use crate::u256_struct;
use anyhow::Result;
use blake2::{
    digest::{Update, VariableOutput},
    Blake2bVar,
};
use primitive_types::U512;

u256_struct!(Account);

impl Account {
    pub const MAX: Self = Self::from_bytes([0xFF; 32]);

    /// Encodes the account with the network prefix, 52 base32 digits and an
    /// 8 digit blake2 checksum, e.g. `opal_1111...hifc8npp`.
    pub fn encode_account(&self) -> String {
        let mut number = U512::from_big_endian(&self.0);
        let check = U512::from_little_endian(&self.account_checksum());
        number <<= 40;
        number |= check;

        let mut result = String::with_capacity(65);

        for _ in 0..60 {
            let r = number.byte(0) & 0x1f_u8;
            number >>= 5;
            result.push(account_encode(r));
        }
        result.push_str("_lapo"); // opal_
        result.chars().rev().collect()
    }

    fn account_checksum(&self) -> [u8; 5] {
        let mut check = [0u8; 5];
        let mut blake = Blake2bVar::new(check.len()).unwrap();
        blake.update(&self.0);
        blake.finalize_variable(&mut check).unwrap();
        check
    }

    pub fn decode_account(source: impl AsRef<str>) -> Result<Account> {
        EncodedAccountStr(source.as_ref()).to_u512()?.to_account()
    }
}

struct EncodedAccountU512(U512);

impl EncodedAccountU512 {
    fn account_bytes(&self) -> [u8; 32] {
        let bytes_512 = (self.0 >> 40).to_big_endian();
        let mut bytes_256 = [0u8; 32];
        bytes_256.copy_from_slice(&bytes_512[32..]);
        bytes_256
    }

    fn checksum_bytes(&self) -> [u8; 5] {
        [
            self.0.byte(0),
            self.0.byte(1),
            self.0.byte(2),
            self.0.byte(3),
            self.0.byte(4),
        ]
    }

    fn to_account(&self) -> Result<Account> {
        let account = Account::from_bytes(self.account_bytes());
        if account.account_checksum() == self.checksum_bytes() {
            Ok(account)
        } else {
            Err(anyhow!("invalid checksum"))
        }
    }
}

struct EncodedAccountStr<'a>(&'a str);

impl<'a> EncodedAccountStr<'a> {
    fn is_valid(&self) -> bool {
        self.has_valid_prefix()
            && self.0.chars().count() == 65
            && self.is_first_digit_valid()
    }

    fn has_valid_prefix(&self) -> bool {
        self.0.starts_with("opal_") || self.0.starts_with("opal-")
    }

    fn first_digit(&self) -> Option<char> {
        self.0.chars().nth(5)
    }

    fn is_first_digit_valid(&self) -> bool {
        matches!(self.first_digit(), Some('1') | Some('3'))
    }

    fn chars_after_prefix(&'_ self) -> impl Iterator<Item = char> + '_ {
        self.0.chars().skip(5)
    }

    fn to_u512(&self) -> Result<EncodedAccountU512> {
        if !self.is_valid() {
            bail!("invalid account string");
        }

        let mut number = U512::default();
        for character in self.chars_after_prefix() {
            match self.decode_byte(character) {
                Some(byte) => {
                    number <<= 5;
                    number = number + byte;
                }
                None => bail!("invalid account digit"),
            }
        }
        Ok(EncodedAccountU512(number))
    }

    fn decode_byte(&self, character: char) -> Option<u8> {
        if character.is_ascii() {
            let character = character as u8;
            if (0x30..0x80).contains(&character) {
                let byte: u8 = account_decode(character);
                if byte != b'~' {
                    return Some(byte);
                }
            }
        }

        None
    }
}

const ACCOUNT_LOOKUP: &[char] = &[
    '1', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k',
    'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'w', 'x', 'y', 'z',
];

const ACCOUNT_REVERSE: &[char] = &[
    '~', '0', '~', '1', '2', '3', '4', '5', '6', '7', '~', '~', '~', '~', '~', '~', '~', '~', '~',
    '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~',
    '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '8', '9', ':', ';', '<', '=', '>', '?',
    '@', 'A', 'B', '~', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', '~', 'L', 'M', 'N', 'O', '~',
    '~', '~', '~', '~',
];

fn account_encode(value: u8) -> char {
    ACCOUNT_LOOKUP[value as usize]
}

fn account_decode(value: u8) -> u8 {
    let mut result = ACCOUNT_REVERSE[(value - 0x30) as usize] as u8;
    if result != b'~' {
        result -= 0x30;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_zero() {
        let account = Account::zero();
        let encoded = account.encode_account();
        assert_eq!(encoded.len(), 65);
        assert!(encoded.starts_with("opal_"));
        let copy = Account::decode_account(&encoded).expect("decode failed");
        assert_eq!(account, copy);
    }

    #[test]
    fn encode_all() {
        let account = Account::from_bytes([0xFF; 32]);
        let encoded = account.encode_account();
        let copy = Account::decode_account(&encoded).expect("decode failed");
        assert_eq!(account, copy);
    }

    #[test]
    fn encode_round_trip() {
        let account =
            Account::decode_hex("E7F5F39D52AC32ADF978BBCF6EA50C7A5FBBDDCADE965C542808ADAE9DEF6B20")
                .unwrap();
        let encoded = account.encode_account();
        assert_eq!(Account::decode_account(&encoded).unwrap(), account);
    }

    #[test]
    fn decode_fails_on_damaged_string() {
        let mut encoded = Account::zero().encode_account();
        encoded.replace_range(16..17, "x");
        assert!(Account::decode_account(&encoded).is_err());
    }

    #[test]
    fn decode_fails_on_wrong_prefix() {
        let encoded = Account::zero().encode_account().replace("opal_", "nope_");
        assert!(Account::decode_account(&encoded).is_err());
    }

    #[test]
    fn decode_less_than_64_chars() {
        let account = Account::decode_hex("AA").unwrap();
        assert_eq!(account.as_bytes()[31], 0xAA);
    }
}

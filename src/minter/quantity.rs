//! Mint quantity parsing and pricing.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;

use crate::minter::error::MintError;

/// Number of tokens in one mint call; the contract takes a `uint8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintQuantity(u8);

impl MintQuantity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = u8::MAX;

    pub fn new(n: u8) -> Option<Self> {
        (n >= Self::MIN).then_some(Self(n))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// `unit_price * quantity`, in wei.
    pub fn total_price(self, unit_price: U256) -> Result<U256, MintError> {
        unit_price
            .checked_mul(U256::from(self.0))
            .ok_or(MintError::PriceOverflow {
                unit_price,
                quantity: self.0,
            })
    }
}

impl FromStr for MintQuantity {
    type Err = MintError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || MintError::InvalidQuantity {
            input: input.to_string(),
        };

        let n: i64 = input.trim().parse().map_err(|_| invalid())?;
        u8::try_from(n)
            .ok()
            .and_then(Self::new)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for MintQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_range_bounds() {
        assert_eq!("1".parse::<MintQuantity>().unwrap().get(), 1);
        assert_eq!("255".parse::<MintQuantity>().unwrap().get(), 255);
        assert_eq!(" 3 ".parse::<MintQuantity>().unwrap().get(), 3);
    }

    #[test]
    fn test_rejects_out_of_range_and_garbage() {
        for input in ["0", "256", "-1", "", "abc", "2.5", "1e2", "99999999999999999999"] {
            let err = input.parse::<MintQuantity>().unwrap_err();
            assert!(
                matches!(err, MintError::InvalidQuantity { .. }),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_total_price_is_exact() {
        let q = MintQuantity::new(3).unwrap();
        assert_eq!(q.total_price(U256::from(1000u64)).unwrap(), U256::from(3000u64));

        // 0.069 ether, well past f64's exact integer range once multiplied.
        let unit = U256::from(69_000_000_000_000_001u128);
        let q = MintQuantity::new(255).unwrap();
        assert_eq!(
            q.total_price(unit).unwrap(),
            U256::from(17_595_000_000_000_000_255u128)
        );
    }

    #[test]
    fn test_total_price_overflow() {
        let q = MintQuantity::new(2).unwrap();
        let err = q.total_price(U256::MAX).unwrap_err();
        assert!(matches!(err, MintError::PriceOverflow { quantity: 2, .. }));
    }

    #[test]
    fn test_zero_is_not_a_quantity() {
        assert!(MintQuantity::new(0).is_none());
    }
}

use proptest::prelude::*;

use folio_types::{Address, BookId, ContentId, LikeAmount, ReviewId};

proptest! {
    /// Decimal text parses back to the same id.
    #[test]
    fn book_id_decimal_roundtrip(v in any::<u64>()) {
        let id = BookId::from(v);
        let parsed: BookId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }

    /// Hex and decimal spellings agree.
    #[test]
    fn review_id_hex_matches_decimal(v in any::<u64>()) {
        let from_hex: ReviewId = format!("0x{v:x}").parse().unwrap();
        prop_assert_eq!(from_hex, ReviewId::from(v));
    }

    /// Both halves of a split never exceed the original amount.
    #[test]
    fn half_split_never_exceeds_amount(v in any::<u64>()) {
        let amount = LikeAmount::from(v);
        let half = amount.half();
        prop_assert!(half.saturating_add(half) <= amount);
        prop_assert!(amount.checked_sub(half.saturating_add(half)).unwrap() <= LikeAmount::one());
    }

    /// Address text form roundtrips.
    #[test]
    fn address_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let addr = Address::from_bytes(bytes);
        let parsed: Address = addr.to_string().parse().unwrap();
        prop_assert_eq!(parsed, addr);
        prop_assert_eq!(addr.abbreviate().len(), 11);
    }

    /// A bare id and its URI resolve to the same content id.
    #[test]
    fn content_id_uri_roundtrip(cid in "[a-zA-Z0-9]{1,46}") {
        let id = ContentId::new(cid.clone()).unwrap();
        prop_assert_eq!(ContentId::from_uri(&id.to_uri()).unwrap(), id);
    }
}

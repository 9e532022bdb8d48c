use std::str::FromStr;

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};

use common::linked_data::ContentAddress;

/// A content address stored as its canonical CID string
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DContentAddress(ContentAddress);

impl From<DContentAddress> for ContentAddress {
    fn from(val: DContentAddress) -> Self {
        val.0
    }
}

impl From<ContentAddress> for DContentAddress {
    fn from(address: ContentAddress) -> Self {
        Self(address)
    }
}

impl<'r> Decode<'r, Sqlite> for DContentAddress {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let db_val = <String as Decode<Sqlite>>::decode(value)?;
        let address = ContentAddress::from_str(&db_val)?;

        Ok(Self(address))
    }
}

impl<'q> Encode<'q, Sqlite> for DContentAddress {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'q>>,
    ) -> Result<IsNull, BoxDynError> {
        args.push(SqliteArgumentValue::Text(self.0.to_string().into()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for DContentAddress {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_canonical_string() -> Result<(), BoxDynError> {
        let address = ContentAddress::for_content(b"board content");
        let daddress = DContentAddress::from(address);

        let mut args = Vec::new();
        let _ = daddress.encode_by_ref(&mut args)?;

        if let SqliteArgumentValue::Text(encoded) = &args[0] {
            assert_eq!(encoded.as_ref(), address.to_string());
            assert!(encoded.starts_with('b'));
        } else {
            panic!("Expected Text variant");
        }

        Ok(())
    }
}

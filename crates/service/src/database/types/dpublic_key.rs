use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};

use common::crypto::PublicKey;

/// An owner key stored as lowercase hex
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DPublicKey(PublicKey);

impl From<DPublicKey> for PublicKey {
    fn from(val: DPublicKey) -> Self {
        val.0
    }
}

impl From<PublicKey> for DPublicKey {
    fn from(key: PublicKey) -> Self {
        Self(key)
    }
}

impl<'r> Decode<'r, Sqlite> for DPublicKey {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let db_val = <String as Decode<Sqlite>>::decode(value)?;
        let key = PublicKey::from_hex(&db_val)?;

        Ok(Self(key))
    }
}

impl<'q> Encode<'q, Sqlite> for DPublicKey {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'q>>,
    ) -> Result<IsNull, BoxDynError> {
        args.push(SqliteArgumentValue::Text(self.0.to_hex().into()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for DPublicKey {
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
    use common::crypto::SecretKey;

    #[test]
    fn test_encodes_hex() -> Result<(), BoxDynError> {
        let key = SecretKey::generate().public();

        let mut args = Vec::new();
        let _ = DPublicKey::from(key).encode_by_ref(&mut args)?;

        if let SqliteArgumentValue::Text(encoded) = &args[0] {
            assert_eq!(encoded.as_ref(), key.to_hex());
        } else {
            panic!("Expected Text variant");
        }

        Ok(())
    }
}

mod dcontent_address;
mod dpublic_key;

pub use dcontent_address::DContentAddress;
pub use dpublic_key::DPublicKey;

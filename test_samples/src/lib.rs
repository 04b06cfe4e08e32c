//! Utility crate for standardized and random test identities.

use core::fmt;

use once_cell::sync::Lazy;
use takara_crypto::KeyPair;
use takara_data_model::account::AccountId;

macro_rules! declare_keypair {
    ( $key_pair:ident, $public_key:expr, $private_key:expr ) => {
        /// A standardized [`KeyPair`].
        pub static $key_pair: Lazy<KeyPair> = Lazy::new(|| {
            KeyPair::new(
                $public_key
                    .parse()
                    .expect(r#"public_key should be a valid multihash e.g. "ed0120...""#),
                $private_key
                    .parse()
                    .expect(r#"private_key should be a valid multihash e.g. "802620...""#),
            )
        });
    };
}

macro_rules! declare_account_with_keypair {
    ( $account_id:ident, $domain:literal, $key_pair:ident, $public_key:literal, $private_key:literal ) => {
        /// A standardized [`AccountId`].
        pub static $account_id: Lazy<AccountId> = Lazy::new(|| {
            format!("{}@{}", $key_pair.public_key(), $domain)
                .parse()
                .expect("domain and public_key should be valid as name and multihash, respectively")
        });

        declare_keypair!($key_pair, $public_key, $private_key);
    };
}

declare_account_with_keypair!(
    GENESIS_ID,
    "genesis",
    GENESIS_KEYPAIR,
    "ed0120E2ECD69DA5833EC10FB3DFAED83A07E5B9CBE9BC39484F0F7DDEC8B46253428B",
    "8026207D6F8A2B91C4E3D5F60718293A4B5C6D7E8F9012A3B4C5D6E7F80914253647AB"
);
declare_account_with_keypair!(
    ALICE_ID,
    "wonderland",
    ALICE_KEYPAIR,
    "ed0120CE7FA46C9DCE7EA4B125E2E36BDB63EA33073E7590AC92816AE1E861B7048B03",
    "802620CCF31D85E3B32A4BEA59987CE0C78E3B8E2DB93881468AB2435FE45D5C9DCD53"
);
declare_account_with_keypair!(
    BOB_ID,
    "wonderland",
    BOB_KEYPAIR,
    "ed012004FF5B81046DDCCF19E2E451C45DFB6F53759D4EB30FA2EFA807284D1CC33016",
    "802620AF3F96DEEF44348FEB516C057558972CEC4C75C4DB9C5B3AAC843668854BF828"
);

/// Generate a random [`AccountId`] in the given `domain`, together with
/// its key pair.
///
/// # Panics
///
/// Panics if the given `domain` is invalid as a
/// [`Name`](takara_data_model::name::Name).
pub fn gen_account_in(domain: impl fmt::Display) -> (AccountId, KeyPair) {
    let key_pair = KeyPair::random();
    let account_id = format!("{}@{}", key_pair.public_key(), domain)
        .parse()
        .expect("domain name should be valid");
    (account_id, key_pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_ids_are_consistent_with_their_keypairs() {
        assert_eq!(GENESIS_ID.signatory, *GENESIS_KEYPAIR.public_key());
        assert_eq!(ALICE_ID.signatory, *ALICE_KEYPAIR.public_key());
        assert_eq!(BOB_ID.signatory, *BOB_KEYPAIR.public_key());
    }

    #[test]
    fn generated_accounts_land_in_the_requested_domain() {
        let (account_id, key_pair) = gen_account_in("wonderland");
        assert_eq!(account_id.domain_id, "wonderland".parse().expect("Valid"));
        assert_eq!(account_id.signatory, *key_pair.public_key());
    }
}

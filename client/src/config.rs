//! Client configuration.

use std::{fmt, fs::File, io::BufReader, path::Path};

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use takara_crypto::{KeyPair, PrivateKey, PublicKey};
use takara_data_model::{account::AccountId, transaction::TransactionLimits};

/// `Configuration` provides the client parameters: whose authority to
/// act under and which limits to apply before submitting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[serde(default)]
pub struct Configuration {
    /// Public key of the user account.
    pub public_key: PublicKey,
    /// Private key of the user account.
    pub private_key: PrivateKey,
    /// User account id.
    pub account_id: AccountId,
    /// Limits to which every submitted transaction must adhere.
    pub transaction_limits: TransactionLimits,
    /// `Logger` configuration.
    pub logger_configuration: takara_logger::Configuration,
}

impl Default for Configuration {
    fn default() -> Self {
        let (public_key, private_key) = Self::placeholder_keypair().into();

        Self {
            public_key,
            private_key,
            account_id: Self::placeholder_account(),
            transaction_limits: TransactionLimits::default(),
            logger_configuration: takara_logger::Configuration::default(),
        }
    }
}

impl Configuration {
    /// Key pair used by default for demo purposes.
    fn placeholder_keypair() -> KeyPair {
        let public_key =
            "ed0120CE7FA46C9DCE7EA4B125E2E36BDB63EA33073E7590AC92816AE1E861B7048B03"
                .parse()
                .expect("Public key not in multihash format");
        let private_key =
            "802620CCF31D85E3B32A4BEA59987CE0C78E3B8E2DB93881468AB2435FE45D5C9DCD53"
                .parse()
                .expect("Private key not in multihash format");

        KeyPair::new(public_key, private_key)
    }

    /// Account id used by default for demo purposes.
    fn placeholder_account() -> AccountId {
        "ed0120CE7FA46C9DCE7EA4B125E2E36BDB63EA33073E7590AC92816AE1E861B7048B03@wonderland"
            .parse()
            .expect("Account id not valid")
    }

    /// Construct a configuration for `account_id`, keeping every other
    /// parameter at its default.
    pub fn for_account(key_pair: &KeyPair, account_id: AccountId) -> Self {
        Self {
            public_key: key_pair.public_key().clone(),
            private_key: key_pair.private_key().clone(),
            account_id,
            ..Self::default()
        }
    }

    /// Build a `Configuration` from a pretty-formatted JSON file.
    ///
    /// # Errors
    /// If the file cannot be opened or has an incorrect format.
    pub fn from_path<P: AsRef<Path> + fmt::Debug>(path: P) -> Result<Configuration> {
        let file = File::open(path).wrap_err("Failed to open the config file")?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).wrap_err("Failed to deserialize json from reader")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_configuration_is_self_consistent() {
        let configuration = Configuration::default();
        assert_eq!(configuration.account_id.signatory, configuration.public_key);
    }

    #[test]
    fn configuration_roundtrips_through_json() {
        let configuration = Configuration::default();
        let json = serde_json::to_string_pretty(&configuration).expect("Valid");

        let mut file = tempfile::NamedTempFile::new().expect("Temp files are available");
        file.write_all(json.as_bytes()).expect("Writable");
        let read_back = Configuration::from_path(file.path()).expect("Valid");

        assert_eq!(read_back.account_id, configuration.account_id);
        assert_eq!(read_back.public_key, configuration.public_key);
    }

    #[test]
    fn partial_configuration_files_fall_back_to_defaults() {
        let json = r#"{ "ACCOUNT_ID": "ed012004FF5B81046DDCCF19E2E451C45DFB6F53759D4EB30FA2EFA807284D1CC33016@wonderland" }"#;
        let configuration: Configuration = serde_json::from_str(json).expect("Valid");
        assert_eq!(
            configuration.account_id.domain_id,
            "wonderland".parse().expect("Valid")
        );
        assert_eq!(
            configuration.transaction_limits,
            TransactionLimits::default()
        );
    }
}

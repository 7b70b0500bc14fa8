//! Detached, ASCII-armored OpenPGP signatures over arbitrary byte streams.

use std::io::Read;

use chrono::SubsecRound;
use pgp::crypto::hash::HashAlgorithm;
use pgp::packet::{SignatureConfig, SignatureType, SignatureVersion, Subpacket, SubpacketData};
use pgp::types::KeyTrait;
use pgp::{Deserializable, SignedSecretKey, StandaloneSignature};

use stagehand_util::errors::StagehandError;

/// Produces a detached armored signature over a byte stream.
///
/// Implementations must consume the reader incrementally; artifacts can be
/// arbitrarily large.
pub trait Signer {
    fn sign(&self, data: &mut dyn Read) -> miette::Result<String>;
}

/// [`Signer`] backed by an armored OpenPGP secret key.
pub struct PgpSigner {
    key: SignedSecretKey,
    passphrase: String,
}

impl PgpSigner {
    /// Decode an armored secret key and check that `passphrase` unlocks it.
    ///
    /// Both a malformed key and a wrong passphrase are reported here, before
    /// any artifact has been written.
    pub fn from_armored(armored: &str, passphrase: &str) -> miette::Result<Self> {
        let (key, _headers) =
            SignedSecretKey::from_string(armored).map_err(|e| StagehandError::Signing {
                message: format!("Cannot decode private key: {e}"),
            })?;
        key.verify().map_err(|e| StagehandError::Signing {
            message: format!("Private key failed self-signature check: {e}"),
        })?;

        let signer = Self {
            key,
            passphrase: passphrase.to_string(),
        };
        signer.sign(&mut std::io::empty())?;
        tracing::debug!("unlocked signing key {:?}", signer.key.key_id());
        Ok(signer)
    }
}

impl Signer for PgpSigner {
    fn sign(&self, data: &mut dyn Read) -> miette::Result<String> {
        let config = SignatureConfig::new_v4(
            SignatureVersion::V4,
            SignatureType::Binary,
            self.key.algorithm(),
            HashAlgorithm::SHA2_512,
            vec![
                Subpacket::regular(SubpacketData::SignatureCreationTime(
                    chrono::Utc::now().trunc_subsecs(0),
                )),
                Subpacket::regular(SubpacketData::Issuer(self.key.key_id())),
            ],
            vec![],
        );

        let passphrase = self.passphrase.clone();
        let signature = config
            .sign(&self.key, || passphrase, data)
            .map_err(|e| StagehandError::Signing {
                message: format!("Cannot sign with private key (wrong passphrase?): {e}"),
            })?;

        StandaloneSignature::new(signature)
            .to_armored_string(None.into())
            .map_err(|e| {
                StagehandError::Signing {
                    message: format!("Cannot armor signature: {e}"),
                }
                .into()
            })
    }
}

/// Sign `data` with an armored secret key in one call.
pub fn sign<R: Read>(mut data: R, armored_key: &str, passphrase: &str) -> miette::Result<String> {
    PgpSigner::from_armored(armored_key, passphrase)?.sign(&mut data)
}

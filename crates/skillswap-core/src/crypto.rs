// crates/skillswap-core/src/crypto.rs

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::SkillError;

/// An ed25519 keypair backing a local wallet.
pub struct Keypair {
    pub signing_key: SigningKey,
    pub verifying_key: VerifyingKey,
}

impl Keypair {
    /// Generate a new random ed25519 keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        Keypair {
            signing_key,
            verifying_key,
        }
    }

    /// Rebuild a keypair from a hex-encoded 32-byte secret key.
    pub fn from_secret_hex(secret_hex: &str) -> Result<Self, SkillError> {
        let bytes = hex::decode(secret_hex.trim())
            .map_err(|e| SkillError::Crypto(format!("Invalid secret key hex: {}", e)))?;
        let secret: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| SkillError::Crypto("Secret key must be exactly 32 bytes".to_string()))?;
        let signing_key = SigningKey::from_bytes(&secret);
        let verifying_key = signing_key.verifying_key();
        Ok(Keypair {
            signing_key,
            verifying_key,
        })
    }

    /// Hex encoding of the secret key, for writing key files.
    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Get the public key bytes (32 bytes).
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Sign a message and return the signature bytes.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature = self.signing_key.sign(message);
        signature.to_bytes().to_vec()
    }
}

/// Verify an ed25519 signature.
///
/// Returns `true` if the signature is valid for the given message and public key.
pub fn verify_signature(
    public_key_bytes: &[u8; 32],
    message: &[u8],
    signature_bytes: &[u8],
) -> Result<bool, SkillError> {
    let verifying_key = VerifyingKey::from_bytes(public_key_bytes)
        .map_err(|e| SkillError::Crypto(format!("Invalid public key: {}", e)))?;

    let signature_array: [u8; 64] = signature_bytes
        .try_into()
        .map_err(|_| SkillError::Crypto("Signature must be exactly 64 bytes".to_string()))?;

    let signature = ed25519_dalek::Signature::from_bytes(&signature_array);

    match verifying_key.verify(message, &signature) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Compute SHA-256 hash of the given bytes.
pub fn hash_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_sign_verify() {
        let keypair = Keypair::generate();
        let message = b"rate skill 4 stars";

        let signature = keypair.sign(message);
        let pubkey = keypair.public_key_bytes();

        assert!(verify_signature(&pubkey, message, &signature).unwrap());
        assert!(!verify_signature(&pubkey, b"rate skill 5 stars", &signature).unwrap());
    }

    #[test]
    fn test_secret_hex_reload() {
        let keypair = Keypair::generate();
        let reloaded = Keypair::from_secret_hex(&keypair.secret_hex()).unwrap();
        assert_eq!(keypair.public_key_bytes(), reloaded.public_key_bytes());
    }

    #[test]
    fn test_secret_hex_rejects_bad_input() {
        assert!(Keypair::from_secret_hex("zz").is_err());
        assert!(Keypair::from_secret_hex("abcd").is_err());
    }

    #[test]
    fn test_short_signature_rejected() {
        let keypair = Keypair::generate();
        let result = verify_signature(&keypair.public_key_bytes(), b"m", &[0u8; 10]);
        assert!(matches!(result, Err(SkillError::Crypto(_))));
    }
}

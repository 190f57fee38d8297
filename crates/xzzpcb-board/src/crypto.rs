//! Part payload decryption using DES-ECB.
//!
//! DATA blocks carry their part descriptors encrypted with single DES in
//! ECB mode and PKCS#7 padding.

use des::cipher::block_padding::Pkcs7;
use des::cipher::generic_array::GenericArray;
use des::cipher::{BlockDecryptMut, KeyInit};
use thiserror::Error;

type DesEcbDec = ecb::Decryptor<des::Des>;

/// The DES key used for part payloads.
///
/// This is hardcoded in the vendor tooling and is not a secret.
pub const PART_DES_KEY: [u8; 8] = [0xDC, 0xFC, 0x12, 0xAC, 0x00, 0x00, 0x00, 0x00];

/// DES block size in bytes.
pub const DES_BLOCK_SIZE: usize = 8;

/// Reasons a part payload can fail to decrypt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecryptError {
    /// Ciphertext length is not a multiple of the DES block size.
    #[error("ciphertext length {0} is not a multiple of the DES block size")]
    BadLength(usize),

    /// The decrypted payload does not end in valid PKCS#7 padding.
    #[error("invalid PKCS#7 padding in decrypted payload")]
    BadPadding,
}

/// Decrypt a part payload and strip the PKCS#7 padding.
///
/// An empty payload decrypts to an empty plaintext.
pub fn decrypt_part(data: &[u8]) -> Result<Vec<u8>, DecryptError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    if data.len() % DES_BLOCK_SIZE != 0 {
        return Err(DecryptError::BadLength(data.len()));
    }

    let key = GenericArray::from_slice(&PART_DES_KEY);
    let decryptor = DesEcbDec::new(key);

    let mut buffer = data.to_vec();
    let plaintext_len = decryptor
        .decrypt_padded_mut::<Pkcs7>(&mut buffer)
        .map_err(|_| DecryptError::BadPadding)?
        .len();
    buffer.truncate(plaintext_len);

    Ok(buffer)
}

/// Encrypt a plaintext the way the vendor tooling does, for building test
/// fixtures without hard-coded ciphertext.
#[cfg(test)]
pub(crate) fn encrypt_part(plaintext: &[u8]) -> Vec<u8> {
    use des::cipher::BlockEncryptMut;

    type DesEcbEnc = ecb::Encryptor<des::Des>;

    let key = GenericArray::from_slice(&PART_DES_KEY);
    let encryptor = DesEcbEnc::new(key);

    // PKCS#7 always appends at least one byte, so round up to the next block.
    let padded_len = (plaintext.len() / DES_BLOCK_SIZE + 1) * DES_BLOCK_SIZE;
    let mut buffer = vec![0u8; padded_len];
    buffer[..plaintext.len()].copy_from_slice(plaintext);
    let len = encryptor
        .encrypt_padded_mut::<Pkcs7>(&mut buffer, plaintext.len())
        .expect("buffer sized for PKCS#7 padding")
        .len();
    buffer.truncate(len);
    buffer
}

#[cfg(test)]
mod tests {
    use des::cipher::block_padding::NoPadding;
    use des::cipher::BlockEncryptMut;

    use super::*;

    #[test]
    fn test_roundtrip() {
        let plaintext = b"pin data\x01\x02\x03";
        let ciphertext = encrypt_part(plaintext);
        assert_eq!(ciphertext.len() % DES_BLOCK_SIZE, 0);
        assert_eq!(decrypt_part(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn test_roundtrip_block_aligned() {
        // An 8-byte plaintext pads to two full blocks.
        let plaintext = [0xA5u8; 8];
        let ciphertext = encrypt_part(&plaintext);
        assert_eq!(ciphertext.len(), 16);
        assert_eq!(decrypt_part(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(decrypt_part(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_empty_plaintext() {
        let ciphertext = encrypt_part(&[]);
        assert_eq!(ciphertext.len(), DES_BLOCK_SIZE);
        assert_eq!(decrypt_part(&ciphertext).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_bad_length() {
        let err = decrypt_part(&[0u8; 7]).unwrap_err();
        assert_eq!(err, DecryptError::BadLength(7));
    }

    #[test]
    fn test_bad_padding() {
        // A block decrypting to all zeros has no valid PKCS#7 padding.
        let key = GenericArray::from_slice(&PART_DES_KEY);
        let encryptor = ecb::Encryptor::<des::Des>::new(key);
        let mut block = [0u8; 8];
        encryptor
            .encrypt_padded_mut::<NoPadding>(&mut block, 8)
            .unwrap();
        assert_eq!(decrypt_part(&block).unwrap_err(), DecryptError::BadPadding);
    }
}

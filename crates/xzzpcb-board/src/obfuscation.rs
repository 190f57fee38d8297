//! Whole-file XOR deobfuscation.
//!
//! Obfuscated files XOR every byte of the file prefix with a single key
//! byte stored at offset 0x10 (clear files store 0x00 there). The prefix
//! ends at the first occurrence of an 11-byte sentinel; everything from the
//! sentinel onward (the diode-readings region) is stored in the clear. When
//! no sentinel is present the whole file is obfuscated.

use xzzpcb_common::memchr::memmem;

/// Absolute offset of the XOR key byte in the file header.
pub const XOR_KEY_OFFSET: usize = 0x10;

/// Byte sequence terminating the obfuscated prefix.
pub const XOR_SENTINEL: [u8; 11] = [
    0x76, 0x36, 0x76, 0x36, 0x35, 0x35, 0x35, 0x76, 0x36, 0x76, 0x36,
];

/// Check whether a file carries the whole-file XOR layer.
#[inline]
pub fn is_obfuscated(data: &[u8]) -> bool {
    data.get(XOR_KEY_OFFSET).is_some_and(|&b| b != 0)
}

/// Remove the XOR layer in place.
///
/// No-op for files that are already clear. Returns the position of the
/// sentinel when one was found, i.e. the start of the clear trailing
/// region. Applying the XOR twice would restore the original bytes, so the
/// caller must apply this at most once; the key-byte gate makes a second
/// call on the same buffer a no-op only if the deobfuscated byte at 0x10
/// is zero, which holds for well-formed files.
pub fn deobfuscate_in_place(data: &mut [u8]) -> Option<usize> {
    if !is_obfuscated(data) {
        return None;
    }

    let key = data[XOR_KEY_OFFSET];
    let sentinel = memmem::find(data, &XOR_SENTINEL);
    let prefix = sentinel.unwrap_or(data.len());
    tracing::debug!(key, prefix, "removing XOR obfuscation");

    for byte in &mut data[..prefix] {
        *byte ^= key;
    }

    sentinel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_file_untouched() {
        let mut data = vec![0u8; 0x44];
        data.extend_from_slice(b"payload");
        let original = data.clone();

        assert!(!is_obfuscated(&data));
        assert_eq!(deobfuscate_in_place(&mut data), None);
        assert_eq!(data, original);
    }

    #[test]
    fn test_prefix_bounded_by_sentinel() {
        let key = 0x5A;
        let mut clear = vec![0u8; 0x44];
        clear.extend_from_slice(b"main region bytes");

        let mut data: Vec<u8> = clear.iter().map(|b| b ^ key).collect();
        let sentinel_at = data.len();
        data.extend_from_slice(&XOR_SENTINEL);
        data.extend_from_slice(b"diode readings");

        assert!(is_obfuscated(&data));
        assert_eq!(deobfuscate_in_place(&mut data), Some(sentinel_at));

        assert_eq!(&data[..sentinel_at], clear.as_slice());
        assert_eq!(&data[sentinel_at..sentinel_at + XOR_SENTINEL.len()], XOR_SENTINEL);
        assert_eq!(&data[sentinel_at + XOR_SENTINEL.len()..], b"diode readings");
    }

    #[test]
    fn test_whole_file_without_sentinel() {
        let key = 0x33;
        let mut clear = vec![0u8; 0x44];
        clear.extend_from_slice(&[1, 2, 3, 4]);

        let mut data: Vec<u8> = clear.iter().map(|b| b ^ key).collect();
        assert_eq!(deobfuscate_in_place(&mut data), None);
        assert_eq!(data, clear);
    }

    #[test]
    fn test_clear_file_containing_sentinel_is_noop() {
        let mut data = vec![0u8; 0x44];
        data.extend_from_slice(&XOR_SENTINEL);
        let original = data.clone();

        assert_eq!(deobfuscate_in_place(&mut data), None);
        assert_eq!(data, original);
    }
}

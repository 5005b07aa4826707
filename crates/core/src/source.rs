// crates/core/src/source.rs
//! ソースバイト列のデコード
//!
//! BOM を見て UTF-8 / UTF-16 を判別します。不正なバイト列は U+FFFD に置き換え、
//! 失敗はしません。

use alloc::borrow::Cow;
use alloc::string::String;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];

/// バイナリ判定で調べる先頭バイト数
pub const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// 検出したエンコーディング
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16Be,
    Utf16Le,
}

impl Encoding {
    /// BOM から判別する（BOM が無ければ UTF-8）
    #[must_use]
    pub fn detect(bytes: &[u8]) -> (Self, usize) {
        if bytes.starts_with(UTF8_BOM) {
            (Self::Utf8, UTF8_BOM.len())
        } else if bytes.starts_with(UTF16_BE_BOM) {
            (Self::Utf16Be, UTF16_BE_BOM.len())
        } else if bytes.starts_with(UTF16_LE_BOM) {
            (Self::Utf16Le, UTF16_LE_BOM.len())
        } else {
            (Self::Utf8, 0)
        }
    }
}

/// バイト列を文字列にデコードする
#[must_use]
pub fn decode_source(bytes: &[u8]) -> Cow<'_, str> {
    let (encoding, bom_len) = Encoding::detect(bytes);
    let body = &bytes[bom_len..];
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(body),
        Encoding::Utf16Be => Cow::Owned(decode_utf16(body, u16::from_be_bytes)),
        Encoding::Utf16Le => Cow::Owned(decode_utf16(body, u16::from_le_bytes)),
    }
}

fn decode_utf16(body: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = body.chunks(2).map(|pair| match *pair {
        [hi, lo] => to_unit([hi, lo]),
        // 奇数長の末尾は不正な単位として扱う
        _ => 0xD800,
    });
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// バイナリファイルらしいか
///
/// UTF-16 の BOM があればテキストとみなし、それ以外は先頭部分の NUL の有無で判定します。
#[must_use]
pub fn looks_binary(bytes: &[u8]) -> bool {
    if matches!(Encoding::detect(bytes).0, Encoding::Utf16Be | Encoding::Utf16Le) {
        return false;
    }
    bytes[..bytes.len().min(BINARY_SNIFF_LEN)].contains(&0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_plain_utf8_is_borrowed() {
        let decoded = decode_source(b"# hi\n");
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, "# hi\n");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        assert_eq!(decode_source(b"\xEF\xBB\xBF# hi"), "# hi");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        assert_eq!(decode_source(b"# \xFF\n"), "# \u{FFFD}\n");
    }

    #[test]
    fn test_utf16_le_and_be() {
        let le: Vec<u8> = [0xFF, 0xFE]
            .into_iter()
            .chain("#é".encode_utf16().flat_map(u16::to_le_bytes))
            .collect();
        assert_eq!(decode_source(&le), "#é");

        let be: Vec<u8> = [0xFE, 0xFF]
            .into_iter()
            .chain("#é".encode_utf16().flat_map(u16::to_be_bytes))
            .collect();
        assert_eq!(decode_source(&be), "#é");
    }

    #[test]
    fn test_odd_utf16_tail_is_replaced() {
        assert_eq!(decode_source(&[0xFF, 0xFE, b'#', 0, b'x']), "#\u{FFFD}");
    }

    #[test]
    fn test_binary_detection() {
        assert!(looks_binary(b"abc\0def"));
        assert!(!looks_binary(b"plain text"));
        assert!(!looks_binary(&[0xFF, 0xFE, b'#', 0]));
    }
}

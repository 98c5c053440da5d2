//! NETASCII line ending translation for `TransferMode::NetAscii` transfers.
//!
//! On the wire every line ends with CR LF and every local CR is sent as
//! CR NUL, so local text always survives the round trip.

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const NUL: u8 = 0;

/// Translates local data into its NETASCII form.
pub fn to_netascii(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());

    for byte in data.iter().copied() {
        match byte {
            CR => out.extend_from_slice(&[CR, NUL]),
            LF => out.extend_from_slice(&[CR, LF]),
            other => out.push(other),
        }
    }

    out
}

/// Translates NETASCII data back into local form. A CR that is followed by
/// neither LF nor NUL is kept as is.
pub fn from_netascii(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut bytes = data.iter().copied().peekable();

    while let Some(byte) = bytes.next() {
        if byte != CR {
            out.push(byte);
            continue;
        }

        match bytes.peek() {
            Some(&LF) => {
                bytes.next();
                out.push(LF);
            }
            Some(&NUL) => {
                bytes.next();
                out.push(CR);
            }
            _ => out.push(CR),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lf_becomes_crlf() {
        assert_eq!(to_netascii(b"a\nb"), b"a\r\nb".to_vec());
        assert_eq!(to_netascii(b"a\r\nb"), b"a\r\0\r\nb".to_vec());
    }

    #[test]
    fn bare_cr_becomes_cr_nul() {
        assert_eq!(to_netascii(b"a\rb"), b"a\r\0b".to_vec());
        assert_eq!(to_netascii(b"end\r"), b"end\r\0".to_vec());
    }

    #[test]
    fn decode_netascii() {
        assert_eq!(from_netascii(b"a\r\nb\r\0c"), b"a\nb\rc".to_vec());
        assert_eq!(from_netascii(b"x\ry"), b"x\ry".to_vec());
        assert_eq!(from_netascii(b"tail\r"), b"tail\r".to_vec());
    }

    #[test]
    fn local_text_survives() {
        let text = b"line one\nline two\rstill two\n";
        assert_eq!(from_netascii(&to_netascii(text)), text.to_vec());

        let dos = b"first\r\nsecond\r\n\r";
        assert_eq!(from_netascii(&to_netascii(dos)), dos.to_vec());
    }
}

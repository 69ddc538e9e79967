//! Module `frame`
//!
//! Wire constants and the outbound frames the relay writes to its clients.
//!
//! Every frame on the wire is exactly [`BUFLEN`] bytes. The textual content
//! comes first and the remainder is NUL padding, so content is capped at
//! `BUFLEN - 1` bytes to always leave a terminator in place.

/// Size of every frame exchanged with a client.
pub const BUFLEN: usize = 255;

/// Tag byte announcing (or re-announcing) a nickname.
pub const NEWUSER: u8 = 0x01;

/// Tag byte reporting that a peer disconnected.
pub const USERLEFT: u8 = 0x02;

/// Separator between sub-fields of a frame body.
pub const DELIM: u8 = 0x1F;

/// One fixed-size unit on the wire.
pub type RawFrame = [u8; BUFLEN];

/// Frames the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Roster entry pushed to a freshly admitted client:
    /// `NEWUSER <nickname> DELIM <address>`.
    NewUser { nickname: String, address: String },
    /// A client's own announcement relayed to its peers:
    /// `<announcement> DELIM <address>`, where the announcement keeps its tag byte.
    Announce { content: Vec<u8>, address: String },
    /// `USERLEFT <address>`
    UserLeft { address: String },
    /// Chat payload with the sender prepended: `<address> DELIM <payload>`.
    Chat { address: String, payload: Vec<u8> },
}

impl Frame {
    /// Renders the textual content of the frame, without padding.
    pub fn content(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BUFLEN);
        match self {
            Frame::NewUser { nickname, address } => {
                out.push(NEWUSER);
                out.extend_from_slice(nickname.as_bytes());
                out.push(DELIM);
                out.extend_from_slice(address.as_bytes());
            }
            Frame::Announce { content, address } => {
                out.extend_from_slice(content);
                out.push(DELIM);
                out.extend_from_slice(address.as_bytes());
            }
            Frame::UserLeft { address } => {
                out.push(USERLEFT);
                out.extend_from_slice(address.as_bytes());
            }
            Frame::Chat { address, payload } => {
                out.extend_from_slice(address.as_bytes());
                out.push(DELIM);
                out.extend_from_slice(payload);
            }
        }
        out
    }

    /// Encodes the frame into its fixed-size wire form.
    pub fn encode(&self) -> RawFrame {
        pad(&self.content())
    }
}

/// Copies `content` into a zeroed frame, truncating to `BUFLEN - 1` bytes.
pub fn pad(content: &[u8]) -> RawFrame {
    let mut raw = [0u8; BUFLEN];
    let len = content.len().min(BUFLEN - 1);
    raw[..len].copy_from_slice(&content[..len]);
    raw
}

/// Returns the textual content of a received buffer: everything before the
/// first NUL byte.
pub fn content_of(buf: &[u8]) -> &[u8] {
    match buf.iter().position(|&b| b == 0) {
        Some(end) => &buf[..end],
        None => buf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_layout() {
        let frame = Frame::NewUser {
            nickname: "alice".into(),
            address: "10.0.0.1:5000".into(),
        };
        let raw = frame.encode();
        assert_eq!(raw.len(), BUFLEN);
        assert_eq!(content_of(&raw), b"\x01alice\x1f10.0.0.1:5000");
        assert!(raw[content_of(&raw).len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_user_left_has_no_delimiter() {
        let frame = Frame::UserLeft {
            address: "10.0.0.1:5000".into(),
        };
        assert_eq!(frame.content(), b"\x0210.0.0.1:5000");
    }

    #[test]
    fn test_chat_prepends_sender() {
        let frame = Frame::Chat {
            address: "1.2.3.4:9".into(),
            payload: b"hi".to_vec(),
        };
        assert_eq!(frame.content(), b"1.2.3.4:9\x1fhi");
    }

    #[test]
    fn test_announce_keeps_original_content() {
        let frame = Frame::Announce {
            content: b"\x01bob".to_vec(),
            address: "1.2.3.4:9".into(),
        };
        assert_eq!(frame.content(), b"\x01bob\x1f1.2.3.4:9");
    }

    #[test]
    fn test_oversized_content_is_truncated_and_terminated() {
        let frame = Frame::Chat {
            address: "1.2.3.4:9".into(),
            payload: vec![b'x'; 400],
        };
        let raw = frame.encode();
        assert_eq!(content_of(&raw).len(), BUFLEN - 1);
        assert_eq!(raw[BUFLEN - 1], 0);
    }

    #[test]
    fn test_content_of_without_terminator() {
        assert_eq!(content_of(b"abc"), b"abc");
        assert_eq!(content_of(b"ab\0c"), b"ab");
        assert_eq!(content_of(b"\0abc"), b"");
    }
}

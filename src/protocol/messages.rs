//! Module `messages`
//!
//! Classification of frames in both directions: what a client sends to the
//! relay ([`Message`]) and what the relay sends back ([`ServerFrame`]).

use crate::protocol::frame::{DELIM, NEWUSER, USERLEFT, content_of};

/// A frame received from a client, classified by its leading byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// `NEWUSER <nickname> [DELIM ...]`
    Announce { nickname: String, content: Vec<u8> },
    /// Anything else is chat; the whole content is the payload.
    Chat { payload: Vec<u8> },
}

impl Message {
    /// Classifies the content of a received frame.
    ///
    /// The nickname of an announcement runs from the byte after the tag up to
    /// the first delimiter (or the end of the content).
    pub fn parse(content: &[u8]) -> Self {
        match content.split_first() {
            Some((&NEWUSER, rest)) => {
                let name = rest.split(|&b| b == DELIM).next().unwrap_or_default();
                Message::Announce {
                    nickname: String::from_utf8_lossy(name).into_owned(),
                    content: content.to_vec(),
                }
            }
            _ => Message::Chat {
                payload: content.to_vec(),
            },
        }
    }
}

/// A frame as seen by a client of the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    NewUser { nickname: String, address: String },
    UserLeft { address: String },
    Chat { address: String, payload: String },
}

impl ServerFrame {
    /// Decodes a frame received from the relay.
    pub fn parse(buf: &[u8]) -> Self {
        let content = content_of(buf);
        match content.split_first() {
            Some((&NEWUSER, rest)) => {
                let (nickname, tail) = split_once(rest);
                // An announcement relayed with extra fields still ends in the address.
                let address = tail.rsplit(|&b| b == DELIM).next().unwrap_or_default();
                ServerFrame::NewUser {
                    nickname: lossy(nickname),
                    address: lossy(address),
                }
            }
            Some((&USERLEFT, rest)) => ServerFrame::UserLeft {
                address: lossy(rest),
            },
            _ => {
                let (address, payload) = split_once(content);
                ServerFrame::Chat {
                    address: lossy(address),
                    payload: lossy(payload),
                }
            }
        }
    }
}

fn split_once(bytes: &[u8]) -> (&[u8], &[u8]) {
    match bytes.iter().position(|&b| b == DELIM) {
        Some(at) => (&bytes[..at], &bytes[at + 1..]),
        None => (bytes, &[]),
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

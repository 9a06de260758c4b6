//! The message body container passed through an interceptor stack.

use bytes::BytesMut;

/// A channel message body.
///
/// Interceptors rewrite the body in place: the encryption layer replaces it
/// wholesale with `iv || ciphertext` on the way out and with the recovered
/// plaintext on the way in. Addressing and membership live with the
/// surrounding pipeline, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelMessage {
    body: BytesMut,
}

impl ChannelMessage {
    /// Create a message with the given body.
    pub fn new(body: &[u8]) -> Self {
        Self { body: BytesMut::from(body) }
    }

    /// The current body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body length in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Whether the body is empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Drop the current body contents, keeping the allocation.
    pub fn clear(&mut self) {
        self.body.clear();
    }

    /// Append bytes to the body.
    ///
    /// Together with [`ChannelMessage::clear`] this lets an interceptor
    /// rebuild the body from several buffers without an intermediate
    /// concatenation.
    pub fn append(&mut self, data: &[u8]) {
        self.body.extend_from_slice(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_and_append_rebuild_the_body() {
        let mut msg = ChannelMessage::new(b"original");
        msg.clear();
        msg.append(b"iv..");
        msg.append(b"ciphertext");
        assert_eq!(msg.body(), b"iv..ciphertext");
        assert_eq!(msg.len(), 14);
    }

    #[test]
    fn new_message_owns_a_copy() {
        let source = b"payload".to_vec();
        let msg = ChannelMessage::new(&source);
        drop(source);
        assert_eq!(msg.body(), b"payload");
    }
}

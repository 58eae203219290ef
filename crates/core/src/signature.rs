//! Razorpay checkout signature computation and verification.
//!
//! After a successful checkout the gateway hands the client an order id, a
//! payment id, and a signature equal to
//! `hex(HMAC-SHA256(key_secret, order_id + "|" + payment_id))`. The server
//! recomputes it with its own copy of the key secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Separator placed between the order id and payment id in the signed payload.
pub const SIGNATURE_SEPARATOR: char = '|';

fn payment_mac(secret: &str, order_id: &str, payment_id: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(order_id.as_bytes());
    mac.update(SIGNATURE_SEPARATOR.to_string().as_bytes());
    mac.update(payment_id.as_bytes());
    mac
}

/// Compute the lowercase hex signature the gateway issues for a payment.
pub fn compute_payment_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    let result = payment_mac(secret, order_id, payment_id).finalize();
    hex::encode(result.into_bytes())
}

/// Check a client-submitted signature against the recomputed one.
///
/// The comparison runs in constant time. A signature that is not valid hex
/// (including uppercase hex, which the gateway never emits) is a mismatch.
pub fn verify_payment_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let Some(submitted) = hex::decode_lower(signature) else {
        return false;
    };
    payment_mac(secret, order_id, payment_id)
        .verify_slice(&submitted)
        .is_ok()
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a lowercase hex string. Returns `None` on odd length or any
    /// character outside `[0-9a-f]`.
    pub fn decode_lower(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        s.as_bytes()
            .chunks(2)
            .map(|pair| Some(nibble(pair[0])? << 4 | nibble(pair[1])?))
            .collect()
    }

    fn nibble(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            _ => None,
        }
    }
}

//! Opaque constant byte runs embedded in every request frame.
//!
//! The upstream requires fixed request, workspace and session identifiers
//! in the frame trailer. They carry no meaning on this side of the wire;
//! a protocol-version bump only needs to touch this table.

/// Bytes between the text payload and the model-name field: a request-id
/// shaped token plus a workspace path token.
pub const PRE_MODEL: [u8; 66] = [
    0x10, 0x01, 0x6a, 0x24, 0x32, 0x34, 0x31, 0x63, 0x63, 0x64, 0x35, 0x66,
    0x2d, 0x39, 0x31, 0x62, 0x61, 0x2d, 0x34, 0x31, 0x31, 0x38, 0x2d, 0x39,
    0x32, 0x39, 0x61, 0x2d, 0x39, 0x36, 0x62, 0x63, 0x30, 0x31, 0x36, 0x31,
    0x62, 0x64, 0x32, 0x61, 0x22, 0x00, 0x2a, 0x13, 0x2f, 0x64, 0x3a, 0x2f,
    0x69, 0x64, 0x65, 0x61, 0x50, 0x72, 0x6f, 0x2f, 0x65, 0x64, 0x75, 0x62,
    0x6f, 0x73, 0x73, 0x3a, 0x1e, 0x0a,
];

/// Bytes after the model-name field: two session-shaped tokens followed by
/// the closing flag bytes.
pub const POST_MODEL: [u8; 97] = [
    0x22, 0x00, 0x4a, 0x24, 0x61, 0x38, 0x37, 0x61, 0x39, 0x61, 0x33, 0x34,
    0x2d, 0x32, 0x31, 0x64, 0x64, 0x2d, 0x34, 0x38, 0x63, 0x37, 0x2d, 0x62,
    0x34, 0x34, 0x66, 0x2d, 0x61, 0x66, 0x36, 0x63, 0x33, 0x65, 0x63, 0x65,
    0x36, 0x66, 0x37, 0x65, 0x68, 0x00, 0x70, 0x00, 0x7a, 0x24, 0x36, 0x39,
    0x33, 0x37, 0x37, 0x65, 0x35, 0x61, 0x2d, 0x38, 0x63, 0x32, 0x64, 0x2d,
    0x34, 0x38, 0x35, 0x34, 0x2d, 0x62, 0x35, 0x64, 0x39, 0x2d, 0x65, 0x30,
    0x62, 0x62, 0x32, 0x32, 0x33, 0x61, 0x63, 0x30, 0x30, 0x61, 0x80, 0x01,
    0x01, 0xb0, 0x01, 0x00, 0xc0, 0x01, 0x00, 0xe0, 0x01, 0x00, 0xe8, 0x01,
    0x00,
];

/// Constant trailer bytes counted by the total-length formula. The
/// model-name length byte itself is not part of this figure; the formula's
/// separator accounting absorbs it.
pub const FIXED_SUFFIX_BASE: usize = 0xA3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_runs_add_up_to_the_suffix_base() {
        assert_eq!(PRE_MODEL.len() + POST_MODEL.len(), FIXED_SUFFIX_BASE);
    }
}

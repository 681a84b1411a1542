/// A Generic Block in the PCAP-NG format
///
/// Used for unknown block ids or custom blocks that do not have a specific structure defined in the PCAP-NG specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericBlock<'b> {
    /// The block type as read in the section byte order
    pub block_type: u32,
    /// The body of the block, without framing
    pub body: &'b [u8],
}
impl<'b> GenericBlock<'b> {
    pub fn new(block_type: u32, body: &'b [u8]) -> Self {
        Self { block_type, body }
    }
    /// Custom blocks (`0x00000BAD`, `0x40000BAD`) start with a Private Enterprise Number
    pub fn is_custom(&self) -> bool {
        matches!(self.block_type, 0x0000_0BAD | 0x4000_0BAD)
    }
    /// Total length including the framing
    pub fn block_length(&self) -> usize {
        self.body.len() + super::BLOCK_FRAMING_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_block_types() {
        assert!(GenericBlock::new(0x0BAD, &[]).is_custom());
        assert!(GenericBlock::new(0x4000_0BAD, &[]).is_custom());
        // Decryption secrets
        let secrets = GenericBlock::new(0x0A, &[0; 8]);
        assert!(!secrets.is_custom());
        assert_eq!(secrets.block_length(), 20);
    }
}

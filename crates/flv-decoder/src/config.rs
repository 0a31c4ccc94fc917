/// Optional strictness checks, all off by default.
///
/// Real-world files routinely get both of these wrong, so the default
/// decoder accepts them and leaves the checks to tools that want them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Require every previous-tag-size field to equal 11 plus the data
    /// size of the tag before it. A mismatch is fatal.
    pub strict_tag_sizes: bool,

    /// Reject tags whose stream id is not 0. The offending tag is skipped
    /// and decoding can continue.
    pub require_zero_stream_id: bool,
}

impl DecoderConfig {
    /// Both checks enabled.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_tag_sizes: true,
            require_zero_stream_id: true,
        }
    }
}

//! Decoder backend configuration

/// Configuration for the bundled AV1 decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Whether to apply film grain synthesis
    pub(crate) apply_grain: bool,
    /// Maximum frame size limit in pixels (0 = no limit)
    pub(crate) frame_size_limit: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            apply_grain: true,
            frame_size_limit: 0,
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable film grain synthesis
    ///
    /// When enabled (default), film grain specified in the AV1 stream
    /// will be synthesized and applied to the decoded image.
    pub fn apply_grain(mut self, apply: bool) -> Self {
        self.apply_grain = apply;
        self
    }

    /// Set maximum frame size limit in total pixels
    ///
    /// Frames with more pixels fail to decode. 0 means no limit.
    pub fn frame_size_limit(mut self, limit: u32) -> Self {
        self.frame_size_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = DecoderConfig::new();
        assert!(config.apply_grain);
        assert_eq!(config.frame_size_limit, 0);

        let config = config.apply_grain(false).frame_size_limit(4096 * 4096);
        assert!(!config.apply_grain);
        assert_eq!(config.frame_size_limit, 4096 * 4096);
    }
}

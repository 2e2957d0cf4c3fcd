//! Decoder configuration

/// How block records are located in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Split on every occurrence of the leading 4-byte marker
    #[default]
    Marker,
    /// Follow each record's declared size from one marker to the next
    SizePrefixed,
}

/// Which relation decides the final block order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Previous-hash linkage first; timestamp only among unlinked blocks
    #[default]
    Linkage,
    /// Timestamp first; linkage only among blocks sharing a timestamp
    Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    pub framing: Framing,
    pub ordering: OrderingPolicy,
    /// Abort on the first malformed block instead of skipping it
    pub strict: bool,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

use crate::error::{Error, Result};
use crate::value::Value;

/// Policy knobs the spec leaves as implementation choices (§9), collected
/// into one builder so callers don't thread loose booleans through every
/// `encode`/`decode` call.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// When `true`, a `TypedObject` whose alias has no registered descriptor
    /// fails the parse with `UnresolvedAlias` instead of falling back to an
    /// anonymous dynamic object.
    pub strict_aliases: bool,

    /// Ceiling for a single encode or parse's reference table. Defaults to
    /// the wire format's own limit (a 16-bit slot index), but callers with
    /// smaller cyclic-graph budgets can lower it.
    pub max_references: u16,

    /// Timezone offset, in minutes, the encoder writes for a `Value::Date`
    /// that doesn't carry an explicit offset. The spec leaves this
    /// unresolved; zero matches naive (no-timezone) timestamps.
    pub naive_timezone_offset_minutes: i16,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            strict_aliases: false,
            max_references: u16::MAX,
            naive_timezone_offset_minutes: 0,
        }
    }
}

impl CodecConfig {
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_references == 0 {
            return Err(Error::parse("max_references must be at least 1"));
        }
        Ok(())
    }

    /// Builds a `Value::Date` from epoch milliseconds with no explicit
    /// timezone, using [`Self::naive_timezone_offset_minutes`] as the
    /// offset the encoder will write — the single point where that
    /// unresolved-by-spec default (§9) lives.
    pub fn naive_date(&self, millis: f64) -> Value {
        Value::Date { millis, tz_offset_min: self.naive_timezone_offset_minutes }
    }
}

/// Builder for [`CodecConfig`].
pub struct CodecConfigBuilder {
    config: CodecConfig,
}

impl CodecConfigBuilder {
    pub fn new() -> Self {
        CodecConfigBuilder { config: CodecConfig::default() }
    }

    pub fn strict_aliases(mut self, strict: bool) -> Self {
        self.config.strict_aliases = strict;
        self
    }

    pub fn max_references(mut self, max: u16) -> Self {
        self.config.max_references = max;
        self
    }

    pub fn naive_timezone_offset_minutes(mut self, minutes: i16) -> Self {
        self.config.naive_timezone_offset_minutes = minutes;
        self
    }

    pub fn build(self) -> Result<CodecConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for CodecConfigBuilder {
    fn default() -> Self {
        CodecConfigBuilder::new()
    }
}

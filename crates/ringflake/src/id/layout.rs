use crate::{ConfigError, NodeIdentity, SnowflakeId};

/// Bits shared between the node and sequence fields.
pub const NODE_STEP_BUDGET: u8 = 22;

/// Bit allocation of a [`SnowflakeId`].
///
/// Fields are packed most-significant first:
///
/// ```text
///  Bit Index:  63           63 62                         0
///              +--------------+-----------+------+------+
///  Field:      | reserved (1) | timestamp | node | step |
///              +--------------+-----------+------+------+
///              |<------ MSB ------ 64 bits ----- LSB ---->|
/// ```
///
/// With the [`Default`] layout that is 41 timestamp bits, 10 node bits and 12
/// sequence bits. The sign bit is never set by a generator.
///
/// # Example
///
/// ```
/// use ringflake::Layout;
///
/// let layout = Layout::default();
/// let id = layout.compose(1000, 5, 1);
/// assert_eq!(layout.timestamp(id), 1000);
/// assert_eq!(layout.node(id), 5);
/// assert_eq!(layout.sequence(id), 1);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    time_bits: u8,
    node_bits: u8,
    step_bits: u8,
}

impl Default for Layout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Layout {
    /// 41 timestamp bits, 10 node bits, 12 sequence bits.
    pub const DEFAULT: Self = Self {
        time_bits: 41,
        node_bits: 10,
        step_bits: 12,
    };

    /// Builds a layout, rejecting allocations that break the bit budget.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::LayoutBudget`] if `node_bits + step_bits > 22`
    /// - [`ConfigError::LayoutWidth`] if the three fields need more than 63
    ///   bits
    pub fn new(time_bits: u8, node_bits: u8, step_bits: u8) -> Result<Self, ConfigError> {
        if node_bits as u16 + step_bits as u16 > NODE_STEP_BUDGET as u16 {
            return Err(ConfigError::LayoutBudget {
                node_bits,
                step_bits,
            });
        }
        let total = time_bits as u32 + node_bits as u32 + step_bits as u32;
        if total > 63 {
            return Err(ConfigError::LayoutWidth { total });
        }
        Ok(Self {
            time_bits,
            node_bits,
            step_bits,
        })
    }

    pub const fn time_bits(&self) -> u8 {
        self.time_bits
    }

    pub const fn node_bits(&self) -> u8 {
        self.node_bits
    }

    pub const fn step_bits(&self) -> u8 {
        self.step_bits
    }

    /// Largest value the timestamp field can hold.
    pub const fn max_timestamp(&self) -> i64 {
        mask(self.time_bits) as i64
    }

    /// Returns true if `timestamp` can be stored without wrapping.
    pub const fn contains_timestamp(&self, timestamp: i64) -> bool {
        timestamp >= 0 && timestamp <= self.max_timestamp()
    }

    /// Largest node identity representable by this layout.
    pub const fn max_node(&self) -> u64 {
        mask(self.node_bits)
    }

    /// Largest sequence value representable by this layout.
    pub const fn max_sequence(&self) -> u64 {
        mask(self.step_bits)
    }

    const fn timestamp_shift(&self) -> u32 {
        self.node_bits as u32 + self.step_bits as u32
    }

    /// Packs the three fields into an ID. Out-of-range values are masked;
    /// callers that need ordering check [`Self::contains_timestamp`] first.
    pub const fn compose(&self, timestamp: i64, node: u64, sequence: u64) -> SnowflakeId {
        let ts = (timestamp as u64 & mask(self.time_bits)) << self.timestamp_shift();
        let node = (node & mask(self.node_bits)) << self.step_bits as u32;
        let seq = sequence & mask(self.step_bits);
        SnowflakeId::from_raw((ts | node | seq) as i64)
    }

    /// Milliseconds since the epoch recorded in `id`.
    pub const fn timestamp(&self, id: SnowflakeId) -> i64 {
        ((id.to_raw() as u64 >> self.timestamp_shift()) & mask(self.time_bits)) as i64
    }

    /// Node identity recorded in `id`.
    pub const fn node(&self, id: SnowflakeId) -> u64 {
        (id.to_raw() as u64 >> self.step_bits as u32) & mask(self.node_bits)
    }

    /// Sequence recorded in `id`.
    pub const fn sequence(&self, id: SnowflakeId) -> u64 {
        id.to_raw() as u64 & mask(self.step_bits)
    }

    /// Clamps an arbitrary integer into this layout's node identity space.
    pub const fn node_identity(&self, raw: u64) -> NodeIdentity {
        NodeIdentity::new(raw & mask(self.node_bits))
    }
}

const fn mask(bits: u8) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits as u32) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_twitter_shape() {
        let layout = Layout::default();
        assert_eq!(layout.time_bits(), 41);
        assert_eq!(layout.node_bits(), 10);
        assert_eq!(layout.step_bits(), 12);
        assert_eq!(layout.max_node(), 1023);
        assert_eq!(layout.max_sequence(), 4095);
        assert_eq!(layout.max_timestamp(), (1 << 41) - 1);
    }

    #[test]
    fn fields_and_bounds() {
        let layout = Layout::default();
        let ts = layout.max_timestamp();
        let node = layout.max_node();
        let seq = layout.max_sequence();

        let id = layout.compose(ts, node, seq);
        assert_eq!(layout.timestamp(id), ts);
        assert_eq!(layout.node(id), node);
        assert_eq!(layout.sequence(id), seq);
        assert!(id.to_raw() > 0, "sign bit must stay clear");
    }

    #[test]
    fn timestamp_range_excludes_negative_and_overflow() {
        let layout = Layout::new(32, 10, 12).unwrap();
        assert!(layout.contains_timestamp(0));
        assert!(layout.contains_timestamp(u32::MAX as i64));
        assert!(!layout.contains_timestamp(u32::MAX as i64 + 1));
        assert!(!layout.contains_timestamp(-1));
    }

    #[test]
    fn compose_matches_shift_formula() {
        let layout = Layout::default();
        let id = layout.compose(1000, 5, 7);
        assert_eq!(id.to_raw(), (1000 << 22) | (5 << 12) | 7);
    }

    #[test]
    fn compose_masks_overflowing_fields() {
        let layout = Layout::default();
        let id = layout.compose(0, layout.max_node() + 1, layout.max_sequence() + 2);
        assert_eq!(layout.node(id), 0);
        assert_eq!(layout.sequence(id), 1);
    }

    #[test]
    fn custom_layout_within_budget() {
        let layout = Layout::new(43, 8, 12).unwrap();
        let id = layout.compose(12345, 200, 4000);
        assert_eq!(layout.timestamp(id), 12345);
        assert_eq!(layout.node(id), 200);
        assert_eq!(layout.sequence(id), 4000);
    }

    #[test]
    fn rejects_node_step_budget_overflow() {
        assert_eq!(
            Layout::new(41, 11, 12),
            Err(ConfigError::LayoutBudget {
                node_bits: 11,
                step_bits: 12
            })
        );
    }

    #[test]
    fn rejects_layout_wider_than_i64() {
        assert_eq!(
            Layout::new(42, 10, 12),
            Err(ConfigError::LayoutWidth { total: 64 })
        );
    }

    #[test]
    fn node_identity_is_masked() {
        let layout = Layout::new(41, 4, 12).unwrap();
        assert_eq!(layout.node_identity(17).get(), 1);
        assert_eq!(layout.node_identity(15).get(), 15);
    }
}

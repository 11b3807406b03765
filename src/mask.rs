//! Mask parsing into position templates
//!
//! A mask mixes literal characters with `?X` charset tokens and the `?-`
//! optional marker. Parsing produces a [`Template`]: one [`Slot`] per
//! candidate position, in order.

use crate::charset::{CharsetTable, MASK_SIGIL, OPTIONAL_MARKER};
use crate::error::MaskError;

/// The possible values for one position of a generated candidate.
///
/// Order is significant: it fixes the iteration order within the position.
/// An optional position carries one extra empty-string member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    members: Vec<String>,
}

impl Slot {
    /// One member per character of `set`. `set` must not be empty.
    fn from_chars(set: &str) -> Self {
        debug_assert!(!set.is_empty(), "slot must have at least one member");
        Self {
            members: set.chars().map(String::from).collect(),
        }
    }

    /// A single-member slot holding the literal character
    fn literal(c: char) -> Self {
        Self {
            members: vec![c.to_string()],
        }
    }

    /// Add the empty string as an extra member, marking the position optional
    fn make_optional(&mut self) {
        self.members.push(String::new());
    }

    /// Members in iteration order
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Ordered sequence of slots describing the current search space.
///
/// A template only ever grows: escalation appends slots, it never replaces
/// or reorders existing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    slots: Vec<Slot>,
}

impl Template {
    /// Parse a full mask into a fresh template
    pub fn parse(table: &CharsetTable, mask: &str) -> std::result::Result<Self, MaskError> {
        Ok(Self {
            slots: parse_mask(table, mask)?,
        })
    }

    /// Append copies of the given slots, growing the search space
    pub fn append(&mut self, slots: &[Slot]) {
        self.slots.extend_from_slice(slots);
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

/// Parse a mask into its slots.
///
/// Scans left to right: `?X` resolves a charset token, `?-` marks the next
/// unit (token or literal) optional, anything else is a literal character.
pub fn parse_mask(
    table: &CharsetTable,
    mask: &str,
) -> std::result::Result<Vec<Slot>, MaskError> {
    let chars: Vec<char> = mask.chars().collect();
    let mut slots = Vec::new();
    let mut optional_pending = false;
    let mut i = 0;

    while i < chars.len() {
        let mut slot = if chars[i] == MASK_SIGIL {
            let class = *chars.get(i + 1).ok_or(MaskError::IncompleteCharset)?;
            if class == OPTIONAL_MARKER {
                // applies to exactly one following unit, never stacking
                if optional_pending {
                    return Err(MaskError::DanglingOptional);
                }
                optional_pending = true;
                i += 2;
                continue;
            }
            let set = table.resolve(class)?;
            if set.is_empty() {
                return Err(MaskError::EmptyCharset(class));
            }
            i += 2;
            Slot::from_chars(set)
        } else {
            let slot = Slot::literal(chars[i]);
            i += 1;
            slot
        };

        if optional_pending {
            slot.make_optional();
            optional_pending = false;
        }
        slots.push(slot);
    }

    if optional_pending {
        return Err(MaskError::DanglingOptional);
    }

    Ok(slots)
}

use std::fmt;

/// Stable identity of a body inside an [`Environment`](crate::Environment).
///
/// Ids are handed out in creation order and never reused by the same environment.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "BodyId({})", self.0)
	}
}

//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. `Money` is the
/// main one in this workspace: two amounts with the same number of cents are the same
/// amount.
///
/// ```ignore
/// let a = Money::from_cents(500);
/// let b: Money = "5.00".parse()?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

use std::ops::{Add, Sub};

/// The height of a block is the length of the chain back to the genesis block.
///
/// # Invariants
///
/// Users should not construct block heights greater than `Height::MAX`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Height(pub u32);

impl Height {
    /// The minimum Height.
    ///
    /// Due to the underlying type, it is impossible to construct block heights
    /// less than `Height::MIN`.
    ///
    /// Style note: Sometimes, `Height::MIN` is less readable than
    /// `Height(0)`. Use whichever makes sense in context.
    pub const MIN: Height = Height(0);

    /// The maximum Height.
    ///
    /// Heights are signed 32-bit integers on the reference network, so the
    /// largest height is `i32::MAX`.
    pub const MAX: Height = Height(i32::MAX as u32);

    /// Returns the next [`Height`].
    ///
    /// Returns `None` if the next height would be greater than [`Height::MAX`].
    pub fn next(self) -> Option<Height> {
        self + 1
    }

    /// Returns the previous [`Height`].
    ///
    /// Returns `None` for the genesis height.
    pub fn previous(self) -> Option<Height> {
        self - 1
    }

    /// Returns `true` if this is the genesis height.
    pub fn is_min(self) -> bool {
        self == Self::MIN
    }
}

impl Add<u32> for Height {
    type Output = Option<Height>;

    fn add(self, rhs: u32) -> Option<Height> {
        let result = self.0.checked_add(rhs).map(Height)?;

        if result <= Height::MAX {
            Some(result)
        } else {
            None
        }
    }
}

impl Sub<u32> for Height {
    type Output = Option<Height>;

    fn sub(self, rhs: u32) -> Option<Height> {
        self.0.checked_sub(rhs).map(Height)
    }
}

//! Object permission bit-masks
//!
//! Permissions travel on the wire as plain 32-bit masks, one mask per
//! audience slot (base, owner, group, everyone, next owner).

use serde::{Deserialize, Serialize};

/// A 32-bit permission mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionMask(pub u32);

impl PermissionMask {
    /// No rights
    pub const NONE: PermissionMask = PermissionMask(0);
    /// Object may be given to another agent
    pub const TRANSFER: PermissionMask = PermissionMask(1 << 13);
    /// Object may be modified
    pub const MODIFY: PermissionMask = PermissionMask(1 << 14);
    /// Object may be copied
    pub const COPY: PermissionMask = PermissionMask(1 << 15);
    /// Object may be exported off-grid
    pub const EXPORT: PermissionMask = PermissionMask(1 << 16);
    /// Object may be moved
    pub const MOVE: PermissionMask = PermissionMask(1 << 19);
    /// Object may take damage
    pub const DAMAGE: PermissionMask = PermissionMask(1 << 20);
    /// Every defined right
    pub const ALL: PermissionMask = PermissionMask(0x7FFF_FFFF);

    /// True iff every bit in `other` is set in this mask
    pub fn contains(self, other: PermissionMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of two masks
    pub fn with(self, other: PermissionMask) -> PermissionMask {
        PermissionMask(self.0 | other.0)
    }

    /// This mask with every bit of `other` cleared
    pub fn without(self, other: PermissionMask) -> PermissionMask {
        PermissionMask(self.0 & !other.0)
    }

    /// True iff no bits are set
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for PermissionMask {
    type Output = PermissionMask;

    fn bitor(self, rhs: PermissionMask) -> PermissionMask {
        self.with(rhs)
    }
}

impl std::ops::BitAnd for PermissionMask {
    type Output = PermissionMask;

    fn bitand(self, rhs: PermissionMask) -> PermissionMask {
        PermissionMask(self.0 & rhs.0)
    }
}

/// The full permission record carried by inventory items and world objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions {
    /// Rights the object was created with
    pub base_mask: PermissionMask,
    /// Rights of the current owner
    pub owner_mask: PermissionMask,
    /// Rights of the owning group
    pub group_mask: PermissionMask,
    /// Rights of everyone else
    pub everyone_mask: PermissionMask,
    /// Rights the next owner will receive on transfer
    pub next_owner_mask: PermissionMask,
}

impl Permissions {
    /// A fully open permission record
    pub fn full() -> Self {
        Self {
            base_mask: PermissionMask::ALL,
            owner_mask: PermissionMask::ALL,
            group_mask: PermissionMask::ALL,
            everyone_mask: PermissionMask::ALL,
            next_owner_mask: PermissionMask::ALL,
        }
    }

    /// True iff the owner may both copy and transfer the object
    pub fn is_owner_transferable_copy(&self) -> bool {
        self.owner_mask
            .contains(PermissionMask::COPY.with(PermissionMask::TRANSFER))
    }
}

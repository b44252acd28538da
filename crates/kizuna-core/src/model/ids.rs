use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $inner:ty, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            #[must_use]
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            #[must_use]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(ItemId, u32, "Source identifier of a catalog record.");
define_id!(
    ItemIndex,
    usize,
    "Stable handle to an item inside a [`Catalog`](crate::Catalog).\n\n\
     The catalog is append-only, so a handle stays valid for as long as the \
     catalog that issued it."
);

impl ItemIndex {
    /// Position of the item in the catalog's backing storage.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

//! Stable integer handles identifying mesh entities.
//!
//! Handles index into the graph's arena storage (`Vec<Option<T>>`) and stay
//! valid across retirements within one simplification run; only `compact()`
//! renumbers them.

use std::fmt;

macro_rules! define_handle {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_handle!(VertexId);
define_handle!(EdgeId);
define_handle!(FaceId);

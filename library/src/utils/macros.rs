macro_rules! tests {
    ($($(#[$meta:meta])* $name:ident $(($($(#[$pmeta:meta])* $argn:ident:$argtp:ty),+))? $code:block);* $(;)?) => {
        #[cfg(test)]
        mod tests {
            #![allow(unused_imports)]
            #![allow(clippy::unwrap_used)]
            use super::*;
            use crate::trace;
            use rstest::{rstest,fixture};
            $(
                #[rstest]
                #[allow(unused_variables)]
                $(#[$meta])*
                fn $name(trace:()$($(, $(#[$pmeta])* $argn:$argtp)+)?) $code
            )*

        }
    };
}

pub(crate) use tests;

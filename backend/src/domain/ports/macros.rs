//! `define_port_error!`: error enums for driven ports.
//!
//! Each variant is either a unit or carries `String` fields only. The macro
//! derives `thiserror::Error` and adds a snake_case constructor per variant
//! whose parameters accept anything `Into<String>`.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum LedgerError {
//!         Locked => "ledger locked",
//!         Query { message: String } => "ledger query failed: {message}",
//!     }
//! }
//! let err = LedgerError::query("timeout");
//! ```

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : String),+ $(,)? } )? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field: String),+ } )?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = "Construct [`" $name "::" $variant "`]."]
                    pub fn [<$variant:snake>]($( $($field: impl Into<String>),+ )?) -> Self {
                        Self::$variant $( { $($field: $field.into()),+ } )?
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

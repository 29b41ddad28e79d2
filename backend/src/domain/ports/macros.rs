//! `define_port_error!`: error enums for driven ports.
//!
//! Each variant names its display message and gets a snake_case
//! constructor whose fields take `impl Into<_>`. When every variant also
//! declares `as <kind>`, the enum converts into [`crate::domain::Error`]
//! through the matching constructor, carrying the display message:
//!
//! ```ignore
//! define_port_error! {
//!     pub enum GroupRepositoryError {
//!         Connection { message: String } => "connection failed: {message}" as service_unavailable,
//!         Query { message: String } => "query failed: {message}" as internal,
//!     }
//! }
//! ```
//!
//! Ports whose failures need bespoke treatment (details, fixed wording)
//! omit the clause and map by hand.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? }
                    => $message:literal as $kind:ident
            ),+ $(,)?
        }
    ) => {
        define_port_error! {
            $(#[$outer])*
            pub enum $name {
                $(
                    $(#[$variant_meta])*
                    $variant { $($field : $ty),* } => $message
                ),+
            }
        }

        impl From<$name> for crate::domain::Error {
            fn from(error: $name) -> Self {
                let message = error.to_string();
                match error {
                    $( $name::$variant { .. } => Self::$kind(message), )+
                }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!(
                        "Build [`", stringify!($name), "::", stringify!($variant), "`]."
                    )]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                }
            )+
        }
    };
}

pub(crate) use define_port_error;

//! Declaration macros for records, wire enums and union variant sets.

/// Declares a record type over a [`FieldStore`](crate::FieldStore).
///
/// Each field line is `presence getter, setter: Type = "wire_name";` where
/// presence is one of `required`, `required_nullable`, `optional`,
/// `optional_nullable`. Required setters take `impl Into<T>`; the others
/// take `impl Into<Option<T>>`, so a bare value, `Some(value)` or `None`
/// all work.
///
/// ```
/// json_model::record! {
///     /// A named counter.
///     pub struct Counter {
///         required name, set_name: String = "name";
///         optional_nullable count, set_count: i64 = "count";
///     }
/// }
///
/// let mut c = Counter::new();
/// c.set_name("hits");
/// c.set_count(3);
/// assert_eq!(c.count().unwrap(), Some(3));
/// c.set_count(None);
/// assert!(c.count().unwrap().is_none());
/// assert_eq!(c.to_string(), r#"{"name":"hits","count":null}"#);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $presence:ident $getter:ident, $setter:ident : $ty:ty = $key:literal;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        $vis struct $name {
            store: $crate::FieldStore,
        }

        #[allow(dead_code)]
        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn with_options(options: $crate::CodecOptions) -> Self {
                Self {
                    store: $crate::FieldStore::new(options),
                }
            }

            pub fn to_raw(&self) -> $crate::RawValue {
                self.store.to_raw()
            }

            pub fn validate(&self) -> ::std::result::Result<(), $crate::ModelError> {
                <Self as $crate::Record>::validate_fields(self)
            }

            $(
                $crate::record!(@accessors $presence [$(#[$fmeta])*] $getter $setter ($ty) $key);
            )*
        }

        impl $crate::Record for $name {
            const NAME: &'static str = stringify!($name);
            const FIELDS: &'static [$crate::FieldDescriptor] = &[
                $(
                    $crate::FieldDescriptor::new::<$ty>($key, $crate::record!(@presence $presence)),
                )*
            ];

            fn store(&self) -> &$crate::FieldStore {
                &self.store
            }

            fn store_mut(&mut self) -> &mut $crate::FieldStore {
                &mut self.store
            }

            fn from_store(store: $crate::FieldStore) -> Self {
                Self { store }
            }
        }

        impl $crate::Model for $name {
            fn from_raw_unchecked_with(
                raw: $crate::RawValue,
                options: &$crate::CodecOptions,
            ) -> ::std::result::Result<Self, $crate::ModelError> {
                $crate::record::decode_record(raw, options)
            }

            fn to_raw(&self) -> $crate::RawValue {
                self.store.to_raw()
            }

            fn validate(&self) -> ::std::result::Result<(), $crate::ModelError> {
                <Self as $crate::Record>::validate_fields(self)
            }
        }

        impl $crate::FieldValue for $name {
            fn decode(
                raw: &$crate::RawValue,
                options: &$crate::CodecOptions,
            ) -> ::std::result::Result<Self, $crate::ModelError> {
                $crate::record::decode_record(raw.clone(), options)
            }

            fn encode(&self, _options: &$crate::CodecOptions) -> $crate::RawValue {
                self.store.to_raw()
            }

            fn validate_value(&self) -> ::std::result::Result<(), $crate::ModelError> {
                <Self as $crate::Record>::validate_fields(self)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.store.to_raw())
            }
        }
    };

    (@presence required) => { $crate::Presence::Required };
    (@presence required_nullable) => { $crate::Presence::RequiredNullable };
    (@presence optional) => { $crate::Presence::Optional };
    (@presence optional_nullable) => { $crate::Presence::OptionalNullable };

    (@accessors required [$(#[$fmeta:meta])*] $getter:ident $setter:ident ($ty:ty) $key:literal) => {
        $(#[$fmeta])*
        pub fn $getter(&self) -> ::std::result::Result<$ty, $crate::ModelError> {
            self.store.get::<$ty>($key)
        }

        /// A value encoding to `null`, such as a non-finite float without
        /// named literals, is stored as `null` and fails the getter.
        pub fn $setter(&mut self, value: impl ::std::convert::Into<$ty>) {
            let value: $ty = value.into();
            $crate::record::set_required(&mut self.store, $key, &value);
        }
    };

    (@accessors required_nullable [$(#[$fmeta:meta])*] $getter:ident $setter:ident ($ty:ty) $key:literal) => {
        $(#[$fmeta])*
        pub fn $getter(&self) -> ::std::result::Result<::std::option::Option<$ty>, $crate::ModelError> {
            self.store.get_nullable::<$ty>($key)
        }

        pub fn $setter(&mut self, value: impl ::std::convert::Into<::std::option::Option<$ty>>) {
            let value: ::std::option::Option<$ty> = value.into();
            $crate::record::set_nullable(&mut self.store, $key, value.as_ref());
        }
    };

    (@accessors optional [$(#[$fmeta:meta])*] $getter:ident $setter:ident ($ty:ty) $key:literal) => {
        $(#[$fmeta])*
        pub fn $getter(&self) -> ::std::result::Result<::std::option::Option<$ty>, $crate::ModelError> {
            self.store.get_optional::<$ty>($key)
        }

        /// `None` removes the field; no `null` is ever written.
        pub fn $setter(&mut self, value: impl ::std::convert::Into<::std::option::Option<$ty>>) {
            let value: ::std::option::Option<$ty> = value.into();
            $crate::record::set_optional(&mut self.store, $key, value.as_ref());
        }
    };

    (@accessors optional_nullable [$(#[$fmeta:meta])*] $getter:ident $setter:ident ($ty:ty) $key:literal) => {
        $(#[$fmeta])*
        pub fn $getter(&self) -> ::std::result::Result<::std::option::Option<$ty>, $crate::ModelError> {
            self.store.get_optional_nullable::<$ty>($key)
        }

        /// `None` writes an explicit `null`.
        pub fn $setter(&mut self, value: impl ::std::convert::Into<::std::option::Option<$ty>>) {
            let value: ::std::option::Option<$ty> = value.into();
            $crate::record::set_nullable(&mut self.store, $key, value.as_ref());
        }
    };
}

/// Declares a closed enum with its wire-string table, for use inside
/// [`OpenEnum`](crate::OpenEnum).
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $wire:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::WireEnum for $name {
            const NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [(&'static str, Self)] = &[
                $(($wire, Self::$variant),)+
            ];
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::WireEnum::as_wire_str(*self))
            }
        }
    };
}

/// Declares the ordered candidate set of an [`OpenUnion`](crate::OpenUnion).
///
/// Candidates are tried top to bottom. Each variant type must be distinct
/// since `From` and [`Pick`](crate::Pick) are generated per type. Box a
/// variant that refers back to a record holding this union.
#[macro_export]
macro_rules! union_variants {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($ty:ty)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant($ty),
            )+
        }

        impl $crate::UnionVariants for $name {
            const NAME: &'static str = stringify!($name);
            const CANDIDATES: &'static [$crate::Candidate<Self>] = &[
                $(
                    $crate::Candidate {
                        name: stringify!($variant),
                        decode: |raw, options| {
                            $crate::open_union::try_candidate::<$ty>(raw, options).map(Self::$variant)
                        },
                    },
                )+
            ];

            fn to_raw(&self, options: &$crate::CodecOptions) -> $crate::RawValue {
                match self {
                    $(Self::$variant(v) => $crate::FieldValue::encode(v, options),)+
                }
            }

            fn validate(&self) -> ::std::result::Result<(), $crate::ModelError> {
                match self {
                    $(Self::$variant(v) => $crate::FieldValue::validate_value(v),)+
                }
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => stringify!($variant),)+
                }
            }
        }

        $(
            impl ::std::convert::From<$ty> for $name {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }

            impl $crate::Pick<$ty> for $name {
                fn pick(&self) -> ::std::option::Option<&$ty> {
                    match self {
                        Self::$variant(v) => Some(v),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )+
    };
}

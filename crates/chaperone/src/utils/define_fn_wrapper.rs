// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Generates a clonable, thread-safe wrapper around a user-provided function.
///
/// The generated type holds the function in an `Arc<dyn Fn...>` and provides `new`,
/// `call`, `Clone` and `Debug`. Middleware stores user callbacks this way so shared
/// state stays cheap to clone.
///
/// # Syntax
///
/// ```rust,ignore
/// define_fn_wrapper!(TypeName<Generics>(Fn(name: Type, ...) -> ReturnType));
/// ```
macro_rules! define_fn_wrapper {
    ($name:ident<$($generics:ident),*>(Fn($($param_name:ident: $param_ty:ty),*) -> $return_ty:ty)) => {
        pub(crate) struct $name<$($generics),*>(
            std::sync::Arc<dyn Fn($($param_ty),*) -> $return_ty + Send + Sync>,
        );

        impl<$($generics),*> $name<$($generics),*> {
            pub(crate) fn new<F>(function: F) -> Self
            where
                F: Fn($($param_ty),*) -> $return_ty + Send + Sync + 'static,
            {
                Self(std::sync::Arc::new(function))
            }

            pub(crate) fn call(&self, $($param_name: $param_ty),*) -> $return_ty {
                (self.0)($($param_name),*)
            }
        }

        impl<$($generics),*> Clone for $name<$($generics),*> {
            fn clone(&self) -> Self {
                Self(std::sync::Arc::clone(&self.0))
            }
        }

        impl<$($generics),*> std::fmt::Debug for $name<$($generics),*> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name)).finish()
            }
        }
    };

    // Without a return type, defaults to unit.
    ($name:ident<$($generics:ident),*>(Fn($($param_name:ident: $param_ty:ty),*))) => {
        crate::utils::define_fn_wrapper!($name<$($generics),*>(Fn($($param_name: $param_ty),*) -> ()));
    };
}

pub(crate) use define_fn_wrapper;

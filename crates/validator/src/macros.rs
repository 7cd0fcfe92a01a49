//! Macros for writing and registering validators.
//!
//! # Available Macros
//!
//! - [`ensure!`]: return a violation unless a condition holds
//! - [`fail!`]: return a violation unconditionally
//! - [`register!`]: register a function under its own name, with parameters
//!
//! # Examples
//!
//! ```rust,ignore
//! use arbor_validator::{Failure, Params, Registry, ensure, register};
//!
//! fn has_min_children(group: &Group, params: &Params) -> Result<(), Failure> {
//!     let min_count: usize = params.get("min_count")?;
//!     ensure!(
//!         group.children.len() >= min_count,
//!         "{} has {} children, expected at least {min_count}",
//!         group.name,
//!         group.children.len(),
//!     );
//!     Ok(())
//! }
//!
//! let registry = Registry::new();
//! register!(registry, "tree", GROUP, has_min_children as Group, min_count = 1)?;
//! ```

// ============================================================================
// FAILURE MACROS
// ============================================================================

/// Returns a [`Failure::Violation`](crate::Failure::Violation) from the
/// enclosing function unless `cond` holds.
///
/// Without a message the stringified condition is used.
///
/// ```rust
/// use arbor_validator::{Failure, ensure};
///
/// fn positive(value: i64) -> Result<(), Failure> {
///     ensure!(value > 0, "expected a positive value, got {value}");
///     ensure!(value < 1_000);
///     Ok(())
/// }
///
/// assert_eq!(positive(-1).unwrap_err().message(), "expected a positive value, got -1");
/// assert_eq!(positive(5_000).unwrap_err().message(), "condition failed: value < 1_000");
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err(
                $crate::Failure::violation(concat!("condition failed: ", stringify!($cond))).into(),
            );
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return ::core::result::Result::Err(
                $crate::Failure::violation(format!($($arg)+)).into(),
            );
        }
    };
}

/// Returns a [`Failure::Violation`](crate::Failure::Violation) from the
/// enclosing function.
#[macro_export]
macro_rules! fail {
    ($($arg:tt)+) => {
        return ::core::result::Result::Err($crate::Failure::violation(format!($($arg)+)).into())
    };
}

// ============================================================================
// REGISTRATION MACRO
// ============================================================================

/// Registers a function as a validator named after its last path segment.
///
/// # Variants
///
/// **Node handle** (the function takes `&NodeRef`):
/// ```rust,ignore
/// register!(registry, "ns", Kind::ANY, has_no_comments)?;
/// ```
///
/// **Typed record**, run under a read lock:
/// ```rust,ignore
/// register!(registry, "ns", GROUP, has_min_children as Group, min_count = 1)?;
/// ```
///
/// **Repairing**, run under a write lock:
/// ```rust,ignore
/// register!(registry, "ns", ORIGIN, clamp_depth as mut Origin, max_depth = 700.0)?;
/// ```
///
/// Expands to [`Registry::register`](crate::Registry::register) and
/// evaluates to its `Result`.
#[macro_export]
macro_rules! register {
    (
        $registry:expr, $namespace:expr, $kind:expr,
        $func:path as mut $record:ty
        $(, $param:ident = $default:expr)* $(,)?
    ) => {
        $registry.register(
            $namespace,
            $kind,
            $crate::ValidatorFn::typed_mut::<$record, _>($crate::short_name(stringify!($func)), $func)
                $(.param(stringify!($param), $default))*,
        )
    };
    (
        $registry:expr, $namespace:expr, $kind:expr,
        $func:path as $record:ty
        $(, $param:ident = $default:expr)* $(,)?
    ) => {
        $registry.register(
            $namespace,
            $kind,
            $crate::ValidatorFn::typed::<$record, _>($crate::short_name(stringify!($func)), $func)
                $(.param(stringify!($param), $default))*,
        )
    };
    (
        $registry:expr, $namespace:expr, $kind:expr,
        $func:path
        $(, $param:ident = $default:expr)* $(,)?
    ) => {
        $registry.register(
            $namespace,
            $kind,
            $crate::ValidatorFn::new($crate::short_name(stringify!($func)), $func)
                $(.param(stringify!($param), $default))*,
        )
    };
}

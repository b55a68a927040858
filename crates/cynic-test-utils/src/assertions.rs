//! Assertion macros for terser test bodies.

/// Asserts that two byte-like values are equal, via `AsRef<[u8]>`.
#[macro_export]
macro_rules! assert_bytes_eq {
    ($left:expr, $right:expr) => {
        assert_eq!($left.as_ref(), $right.as_ref());
    };
    ($left:expr, $right:expr, $($arg:tt)+) => {
        assert_eq!($left.as_ref(), $right.as_ref(), $($arg)+);
    };
}

/// Asserts a `Result` is `Ok` and unwraps it, panicking with the `Err`
/// value on failure rather than a generic `unwrap()` message.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("expected Ok, got Err: {:?}", err),
        }
    };
}

/// Asserts a `Result` is `Err` and returns the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(val) => panic!("expected Err, got Ok: {:?}", val),
            Err(err) => err,
        }
    };
}

/// Asserts a value falls within `[min, max]` inclusive.
#[macro_export]
macro_rules! assert_in_range {
    ($value:expr, $min:expr, $max:expr) => {
        assert!(
            $value >= $min && $value <= $max,
            "{} not in range [{}, {}]",
            $value,
            $min,
            $max
        );
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn assert_ok_unwraps_value() {
        let v: Result<i32, &str> = Ok(5);
        assert_eq!(assert_ok!(v), 5);
    }

    #[test]
    fn assert_err_unwraps_error() {
        let v: Result<i32, &str> = Err("boom");
        assert_eq!(assert_err!(v), "boom");
    }

    #[test]
    fn assert_in_range_passes_within_bounds() {
        assert_in_range!(5, 1, 10);
    }
}

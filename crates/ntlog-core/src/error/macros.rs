//! Error macros for ntlog

/// Macro for rejecting an option value
#[macro_export]
macro_rules! bail_invalid {
    ($culprit:expr, $reason:expr) => {
        return Err($crate::error::NtlogError::invalid_option($culprit, $reason))
    };
}

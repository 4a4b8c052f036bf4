//! Custom assertion macros and utilities
//!
//! Provides enhanced assertion macros for better test output and
//! more descriptive error messages.

/// Assert that a result is ok and return the value
///
/// This macro unwraps a Result, providing a better error message
/// if the result is an error.
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that the next queued notification has the given severity and text
#[macro_export]
macro_rules! assert_notified {
    ($rx:expr, $severity:expr, $message:expr) => {
        match $rx.try_recv() {
            Ok(notification) => {
                assert_eq!(notification.severity, $severity);
                assert_eq!(notification.message, $message);
            }
            Err(_) => panic!("Expected a notification: {:?}", $message),
        }
    };
}

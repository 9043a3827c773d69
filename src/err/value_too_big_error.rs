use crate::err::ValueType;

/// Error if a value exceeds the maximum allowed value of its on-wire field.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ValueTooBigError<T: Sized + core::fmt::Display + core::fmt::Debug> {
    /// Value that was passed in.
    pub actual: T,

    /// Maximum allowed value.
    pub max_allowed: T,

    /// Type of the field the value was written to.
    pub value_type: ValueType,
}

impl<T: Sized + core::fmt::Display + core::fmt::Debug> core::fmt::Display for ValueTooBigError<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Error '{}' is too big to be a '{}' (maximum allowed value is '{}')",
            self.actual, self.value_type, self.max_allowed
        )
    }
}

impl<T: Sized + core::fmt::Display + core::fmt::Debug> std::error::Error for ValueTooBigError<T> {}

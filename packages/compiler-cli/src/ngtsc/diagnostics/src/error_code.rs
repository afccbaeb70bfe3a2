/// Error codes raised while analysing constructor dependencies.
///
/// Values match the framework's public `NG` error numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DecoratorArityWrong = 1002,
    DecoratorUnexpected = 1005,

    /// Raised when no token could be found for a constructor parameter: it has no usable type
    /// annotation and no `@Inject()`/`@Attribute()` supplies one.
    ParamMissingToken = 2003,
}

impl ErrorCode {
    pub fn number(self) -> i32 {
        self as i32
    }
}

use super::error_code::ErrorCode;

/// Numeric code of an Angular diagnostic as reported through the TypeScript diagnostics API.
///
/// Angular codes are prefixed with `-99` so formatted output can tell them apart from
/// TypeScript's own (`TS-992003` is later rewritten to `NG2003`).
pub fn ng_error_code(code: ErrorCode) -> i32 {
    -(990_000 + code.number())
}

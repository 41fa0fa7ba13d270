//! Identifier quoting and placeholder translation
//!
//! Converts back-tick quoted identifiers into bracket quoting and `?`
//! positional placeholders into SQL Server ordinal parameters (`@p1`, `@p2`, ...)
//! in one forward scan. Single-quoted string literals are copied untouched,
//! including doubled-quote escapes (`'it''s'`).

/// Scanner state for one call to [`translate`]
#[derive(Debug)]
struct ScanState {
    in_string: bool,
    open_bracket: bool,
    next_param: usize,
}

impl ScanState {
    fn new() -> Self {
        Self {
            in_string: false,
            open_bracket: true,
            next_param: 1,
        }
    }

    fn bracket(&mut self) -> char {
        let bracket = if self.open_bracket { '[' } else { ']' };
        self.open_bracket = !self.open_bracket;
        bracket
    }
}

/// Rewrites back-tick identifiers and `?` placeholders into T-SQL form.
///
/// Never fails. Unbalanced back-ticks or an unterminated literal produce
/// best-effort output: brackets keep alternating and everything after an
/// unterminated quote is copied as literal content.
///
/// # Example
///
/// ```
/// use sqlshim_rewrite::translate;
///
/// assert_eq!(
///     translate("SELECT * FROM `users` WHERE `name` = ?"),
///     "SELECT * FROM [users] WHERE [name] = @p1"
/// );
/// assert_eq!(translate("SELECT 'a?b', ?"), "SELECT 'a?b', @p1");
/// ```
pub fn translate(sql: &str) -> String {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len() + 16);
    let mut state = ScanState::new();
    // Start of the pending run of bytes that are copied verbatim.
    let mut copied_from = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                if state.in_string && bytes.get(i + 1) == Some(&b'\'') {
                    i += 2;
                    continue;
                }
                state.in_string = !state.in_string;
            }
            b'`' if !state.in_string => {
                out.push_str(&sql[copied_from..i]);
                out.push(state.bracket());
                copied_from = i + 1;
            }
            b'?' if !state.in_string => {
                out.push_str(&sql[copied_from..i]);
                out.push_str("@p");
                out.push_str(&state.next_param.to_string());
                state.next_param += 1;
                copied_from = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    out.push_str(&sql[copied_from..]);
    out
}

//! Quote/escape-aware character scanning over candidate JSON text.
//!
//! Truncation recovery and control-character repair both need to know, per
//! character, whether they are inside a string literal. That state machine
//! lives here once; the extraction strategies are thin walks over it.

/// Tracks string-literal and escape state across a forward character walk.
#[derive(Debug, Default, Clone, Copy)]
struct StringState {
    in_string: bool,
    escaped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    /// Part of a backslash escape sequence inside a string.
    Escaped,
    /// A quote that opens or closes a string literal.
    Quote,
    /// Ordinary character inside a string literal.
    InString,
    /// Structural character outside any string literal.
    Outside,
}

impl StringState {
    fn classify(&mut self, c: char) -> CharClass {
        if self.escaped {
            self.escaped = false;
            return CharClass::Escaped;
        }
        match c {
            '\\' if self.in_string => {
                self.escaped = true;
                CharClass::Escaped
            }
            '"' => {
                self.in_string = !self.in_string;
                CharClass::Quote
            }
            _ if self.in_string => CharClass::InString,
            _ => CharClass::Outside,
        }
    }
}

/// Byte offset just past the last syntactically complete top-level value
/// boundary: the closing brace of an array element or the closing bracket
/// of the array itself. `None` when no value ever completed.
pub fn last_complete_boundary(s: &str) -> Option<usize> {
    let mut state = StringState::default();
    let mut depth: i32 = 0;
    let mut boundary = None;
    for (i, c) in s.char_indices() {
        if state.classify(c) != CharClass::Outside {
            continue;
        }
        match c {
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth -= 1;
                if (0..=1).contains(&depth) {
                    boundary = Some(i + c.len_utf8());
                }
                if depth < 0 {
                    depth = 0;
                }
            }
            _ => {}
        }
    }
    boundary
}

/// Every individually complete top-level `{...}` object in `s`, regardless
/// of whether the surrounding array is well formed. Objects are returned as
/// raw slices; callers parse each independently.
pub fn complete_objects(s: &str) -> Vec<&str> {
    let mut state = StringState::default();
    let mut depth: i32 = 0;
    let mut start = None;
    let mut objects = Vec::new();
    for (i, c) in s.char_indices() {
        if state.classify(c) != CharClass::Outside {
            continue;
        }
        match c {
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                depth -= 1;
                if depth == 0
                    && let Some(open) = start.take()
                {
                    objects.push(&s[open..=i]);
                }
                if depth < 0 {
                    depth = 0;
                }
            }
            _ => {}
        }
    }
    objects
}

/// Rewrites raw control characters that appear inside string literals into
/// their JSON escapes (`\n`, `\r`, `\t`) and drops the rest. Characters
/// outside string literals, including legal structural whitespace, pass
/// through untouched.
pub fn escape_control_chars(s: &str) -> String {
    let mut state = StringState::default();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match state.classify(c) {
            CharClass::InString => match c {
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {}
                c => out.push(c),
            },
            _ => out.push(c),
        }
    }
    out
}

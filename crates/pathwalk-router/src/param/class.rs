//! Built-in character-class validators
//!
//! The fixed table consulted when a parameter directory's type token has no
//! user filter. Classes follow the C `ctype` functions in the "C" locale:
//! every byte of the segment must belong to the class, and the empty string
//! never matches.

/// Character class named by a parameter-type token
///
/// # Examples
///
/// ```
/// use pathwalk_router::CharClass;
///
/// let digit = CharClass::from_token("digit").unwrap();
/// assert!(digit.validate("42"));
/// assert!(!digit.validate("4a"));
/// assert!(!digit.validate(""));
///
/// assert_eq!(CharClass::from_token("profile_id"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Letters or digits
    Alnum,
    /// Letters
    Alpha,
    /// Control characters
    Cntrl,
    /// Decimal digits
    Digit,
    /// Printable characters except space
    Graph,
    /// Lowercase letters
    Lower,
    /// Printable characters including space
    Print,
    /// Printable characters that are neither space nor alphanumeric
    Punct,
    /// Whitespace: space, tab, newline, carriage return, vertical tab, form feed
    Space,
    /// Uppercase letters
    Upper,
    /// Hexadecimal digits
    XDigit,
}

impl CharClass {
    pub const ALL: [CharClass; 11] = [
        CharClass::Alnum,
        CharClass::Alpha,
        CharClass::Cntrl,
        CharClass::Digit,
        CharClass::Graph,
        CharClass::Lower,
        CharClass::Print,
        CharClass::Punct,
        CharClass::Space,
        CharClass::Upper,
        CharClass::XDigit,
    ];

    /// Looks up the class for a type token (ASCII case-insensitive)
    pub fn from_token(token: &str) -> Option<Self> {
        CharClass::ALL
            .into_iter()
            .find(|class| class.name().eq_ignore_ascii_case(token))
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharClass::Alnum => "alnum",
            CharClass::Alpha => "alpha",
            CharClass::Cntrl => "cntrl",
            CharClass::Digit => "digit",
            CharClass::Graph => "graph",
            CharClass::Lower => "lower",
            CharClass::Print => "print",
            CharClass::Punct => "punct",
            CharClass::Space => "space",
            CharClass::Upper => "upper",
            CharClass::XDigit => "xdigit",
        }
    }

    /// Returns whether every byte of a non-empty `value` belongs to the class
    pub fn validate(&self, value: &str) -> bool {
        !value.is_empty() && value.bytes().all(|b| self.contains(b))
    }

    fn contains(&self, b: u8) -> bool {
        match self {
            CharClass::Alnum => b.is_ascii_alphanumeric(),
            CharClass::Alpha => b.is_ascii_alphabetic(),
            CharClass::Cntrl => b.is_ascii_control(),
            CharClass::Digit => b.is_ascii_digit(),
            CharClass::Graph => b.is_ascii_graphic(),
            CharClass::Lower => b.is_ascii_lowercase(),
            CharClass::Print => b.is_ascii_graphic() || b == b' ',
            CharClass::Punct => b.is_ascii_punctuation(),
            CharClass::Space => matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c),
            CharClass::Upper => b.is_ascii_uppercase(),
            CharClass::XDigit => b.is_ascii_hexdigit(),
        }
    }
}

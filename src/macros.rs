// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression — literals, consts, borrowed slices
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! malformed {
    // Tokenizer shorthand: which layout piece was missing, and in what text.
    ($field:expr, $text:expr) => {
        $crate::error::Error::MalformedRecord {
            field: $field,
            text: ::std::string::String::from($text),
        }
    };
}

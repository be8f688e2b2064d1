// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // any single expression
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Column list shorthand: `cols!["token_id", "name"]` → `Vec<String>`.
#[macro_export]
macro_rules! cols {
    ($($name:expr),* $(,)?) => {
        ::std::vec![$(::std::string::String::from($name)),*]
    };
}

/// Row shorthand for tables of nullable cells.
/// `_` is a null cell, any other token is converted with `String::from`.
///
/// `row!["7", "Affe mit Waffe #7", _]`
#[macro_export]
macro_rules! row {
    (@cell _) => {
        ::std::option::Option::None
    };
    (@cell $v:tt) => {
        ::std::option::Option::Some(::std::string::String::from($v))
    };
    ($($v:tt),* $(,)?) => {
        ::std::vec![$($crate::row!(@cell $v)),*]
    };
}

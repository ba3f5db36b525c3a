//! Elixir Term Conversion Utilities
//!
//! Converts encoder results and block catalog entries to Elixir terms.

use rustler::{Atom, Encoder, Env, NewBinary, Term};
use crate::filter::blocks;
use crate::filter::UnicodeBlock;

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    unknown_block,
    mutex_poisoned,
    invalid_utf16,
}

/// Copy bytes into a new Elixir binary
pub fn bytes_to_binary<'a>(env: Env<'a>, bytes: &[u8]) -> Term<'a> {
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

/// `{:ok, value}`
pub fn ok_tuple<'a, T: Encoder>(env: Env<'a>, value: T) -> Term<'a> {
    (ok(), value).encode(env)
}

/// `{:error, reason}`
pub fn error_tuple<'a>(env: Env<'a>, reason: Atom) -> Term<'a> {
    (error(), reason).encode(env)
}

/// `{:error, {reason, detail}}`
pub fn error_detail<'a>(env: Env<'a>, reason: Atom, detail: &str) -> Term<'a> {
    (error(), (reason, detail)).encode(env)
}

/// `{name, first_code_point, size}`
pub fn block_to_term<'a>(env: Env<'a>, name: &str, block: UnicodeBlock) -> Term<'a> {
    (name, block.first_code_point(), block.block_size()).encode(env)
}

/// Catalog names in block order
pub fn block_names_to_term<'a>(env: Env<'a>) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    let names: Vec<&'static str> = blocks::all_blocks().map(|(name, _)| name).collect();
    for name in names.into_iter().rev() {
        list = list.list_prepend(name.encode(env));
    }
    list
}

/// Resolve block names, failing on the first one the catalog doesn't know
pub fn resolve_blocks(names: &[&str]) -> Result<Vec<UnicodeBlock>, String> {
    names
        .iter()
        .map(|name| blocks::by_name(name).ok_or_else(|| (*name).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_blocks() {
        let resolved = resolve_blocks(&["BasicLatin", "greek_and_coptic"]).unwrap();
        assert_eq!(resolved, vec![blocks::BASIC_LATIN, blocks::GREEK_AND_COPTIC]);
    }

    #[test]
    fn test_resolve_blocks_unknown() {
        assert_eq!(resolve_blocks(&["BasicLatin", "Klingon"]), Err("Klingon".to_string()));
    }

    #[test]
    fn test_resolve_blocks_empty() {
        assert!(resolve_blocks(&[]).unwrap().is_empty());
    }
}

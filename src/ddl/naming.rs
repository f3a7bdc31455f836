//! Derived constraint and index names, and deterministic identifier shortening.

use crate::constants::{IDENTIFIER_HASH_LENGTH, MAX_IDENTIFIER_LENGTH};
use crate::ddl::index::IndexColumn;

const DICTIONARY: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Longest hash that keeps the rolling arithmetic inside `u128`.
const MAX_HASH_LENGTH: usize = 16;

/// Polynomial rolling hash (base 53) over the code points of `input`, reduced modulo
/// `62^len` and written in base 62, most significant digit first.
///
/// Pure and stable across processes and platforms.
pub fn hash(input: &str, len: usize) -> String {
    let len = len.min(MAX_HASH_LENGTH);
    let dict_len = DICTIONARY.len() as u128;
    let combinations = dict_len.pow(len as u32);
    let p: u128 = 53;
    let mut power: u128 = 1;
    let mut value: u128 = 0;

    for ch in input.chars() {
        value = (value + (ch as u128) * power) % combinations;
        power = (power * p) % combinations;
    }

    let mut digits = Vec::with_capacity(len);
    for _ in 0..len {
        digits.push(DICTIONARY[(value % dict_len) as usize] as char);
        value /= dict_len;
    }
    digits.into_iter().rev().collect()
}

/// Returns `candidate` when it fits in `limit` bytes, otherwise a prefix cut on a
/// char boundary followed by `_` and a hash of the full candidate.
pub fn shorten_identifier(candidate: &str, limit: usize) -> String {
    if candidate.len() <= limit {
        return candidate.to_string();
    }
    let suffix = hash(candidate, IDENTIFIER_HASH_LENGTH);
    if limit <= suffix.len() + 1 {
        return hash(candidate, limit);
    }

    let mut cut = limit - suffix.len() - 1;
    while !candidate.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}_{}", &candidate[..cut], suffix)
}

pub fn default_name_for_pk(table: &str) -> String {
    shorten_identifier(&format!("{}_pkey", table), MAX_IDENTIFIER_LENGTH)
}

/// `<table>_<cols>_<table_to>_<cols_to>_fkey`, or a hashed form past the identifier limit:
/// `<table>_<hash>_fkey` while the table name leaves room, `<hash>_fkey` otherwise.
pub fn default_name_for_fk(
    table: &str,
    columns: &[String],
    table_to: &str,
    columns_to: &[String],
) -> String {
    let desired = format!(
        "{}_{}_{}_{}_fkey",
        table,
        columns.join("_"),
        table_to,
        columns_to.join("_")
    );
    if desired.len() <= MAX_IDENTIFIER_LENGTH {
        return desired;
    }

    let hashed = hash(&desired, IDENTIFIER_HASH_LENGTH);
    if table.len() < MAX_IDENTIFIER_LENGTH - 18 {
        format!("{}_{}_fkey", table, hashed)
    } else {
        format!("{}_fkey", hashed)
    }
}

pub fn default_name_for_unique(table: &str, columns: &[String]) -> String {
    shorten_identifier(
        &format!("{}_{}_key", table, columns.join("_")),
        MAX_IDENTIFIER_LENGTH,
    )
}

pub fn default_name_for_index(table: &str, columns: &[IndexColumn]) -> String {
    let parts: Vec<String> = columns
        .iter()
        .map(|c| {
            if c.is_expression {
                "expr".to_string()
            } else {
                c.value.clone()
            }
        })
        .collect();
    shorten_identifier(
        &format!("{}_{}_idx", table, parts.join("_")),
        MAX_IDENTIFIER_LENGTH,
    )
}

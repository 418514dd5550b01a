//! Splitting of oversized session values across several cookies.
//!
//! A value that fits is stored under `key` itself. Longer values go to
//! `key.0`, `key.1`, ... and are joined back in index order.

use super::cookies::CookieMethods;

/// Largest value stored in a single cookie, leaving room for the name and
/// attributes under the 4096 byte browser limit.
pub const MAX_CHUNK_SIZE: usize = 3180;

pub fn chunk_name(key: &str, index: usize) -> String {
    format!("{key}.{index}")
}

/// Lays `value` out as `(cookie name, cookie value)` pairs.
pub fn create_chunks(key: &str, value: &str) -> Vec<(String, String)> {
    if value.len() <= MAX_CHUNK_SIZE {
        return vec![(key.to_owned(), value.to_owned())];
    }

    let mut chunks = Vec::new();
    let mut current = String::with_capacity(MAX_CHUNK_SIZE);
    for c in value.chars() {
        if current.len() + c.len_utf8() > MAX_CHUNK_SIZE {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| (chunk_name(key, i), chunk))
        .collect()
}

/// Reassembles the value stored under `key`, if any.
pub fn combine_chunks<C: CookieMethods + ?Sized>(key: &str, cookies: &C) -> Option<String> {
    if let Some(value) = cookies.get(key) {
        return Some(value);
    }

    let mut value = String::new();
    let mut found = false;
    for i in 0.. {
        match cookies.get(&chunk_name(key, i)) {
            Some(chunk) => {
                value.push_str(&chunk);
                found = true;
            }
            None => break,
        }
    }

    found.then_some(value)
}

/// Every cookie name currently holding a piece of the value under `key`.
pub fn existing_chunk_names<C: CookieMethods + ?Sized>(key: &str, cookies: &C) -> Vec<String> {
    let mut names = Vec::new();
    if cookies.get(key).is_some() {
        names.push(key.to_owned());
    }
    for i in 0.. {
        let name = chunk_name(key, i);
        if cookies.get(&name).is_none() {
            break;
        }
        names.push(name);
    }
    names
}

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use docnav::model::document::Document;

#[macro_export]
macro_rules! assert_matches (
    ($actual:expr, $expected:pat) => {
        // Only compute actual once
        let actual_value = $actual;
        match actual_value {
            $expected => {},
            _ => panic!("assertion failed: {:?} did not match expectation", actual_value)
        }
    }
);

pub fn names(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|d| d.name.as_str()).collect()
}

pub fn assert_same_set<T: Eq + Hash + Debug>(
    actual: impl IntoIterator<Item = T>, expected: impl IntoIterator<Item = T>,
) {
    let actual: HashSet<T> = actual.into_iter().collect();
    let expected: HashSet<T> = expected.into_iter().collect();
    assert_eq!(actual, expected);
}

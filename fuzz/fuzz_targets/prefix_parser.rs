//! Fuzz target for hostmask and prefix parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_client::{Prefix, User};

fuzz_target!(|input: &str| {
    let user = User::parse(input);
    assert!(input.starts_with(user.nickname()));

    // A full mask re-serializes to the input.
    if !user.username().is_empty() && !user.hostname().is_empty() {
        let mask = user.to_string();
        if input.matches('!').count() == 1 && input.matches('@').count() == 1 {
            assert_eq!(mask, input);
        }
    }

    let _ = Prefix::parse(input).to_user();
});
